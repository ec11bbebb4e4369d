#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flappy_evo::Error;
use flappy_evo::simulation::brain::Brain;
use flappy_evo::simulation::evolution::{EvolutionParams, Population, Trainer};
use flappy_evo::simulation::world::GenerationReport;
use ndarray::Array1;
use std::fs;

fn small_params() -> EvolutionParams {
    EvolutionParams {
        population_size: 4,
        hidden_size: 2,
        elite_fraction: 0.25,
        max_generations: 3,
        fitness_threshold: 1000.0,
        ..EvolutionParams::default()
    }
}

fn report(fitness: Vec<f32>) -> GenerationReport {
    GenerationReport {
        fitness,
        score: 2,
        ticks: 150,
    }
}

#[test]
fn test_default_params_are_valid() {
    let params = EvolutionParams::default();
    assert!(params.validate().is_ok());
    assert_eq!(params.layer_sizes(), vec![3, 4, 1]);

    let direct = EvolutionParams {
        hidden_size: 0,
        ..EvolutionParams::default()
    };
    assert_eq!(direct.layer_sizes(), vec![3, 1]);
}

#[test]
fn test_invalid_params_are_rejected() {
    let cases = [
        EvolutionParams {
            population_size: 0,
            ..EvolutionParams::default()
        },
        EvolutionParams {
            max_generations: 0,
            ..EvolutionParams::default()
        },
        EvolutionParams {
            elite_fraction: 1.5,
            ..EvolutionParams::default()
        },
        EvolutionParams {
            mutation_rate: -0.1,
            ..EvolutionParams::default()
        },
        EvolutionParams {
            weight_scale: 0.0,
            ..EvolutionParams::default()
        },
    ];

    for params in cases {
        assert!(
            matches!(params.validate(), Err(Error::InvalidConfig(_))),
            "{params:?} should be rejected"
        );
    }
}

#[test]
fn test_load_params_fills_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evolution.json");
    fs::write(&path, r#"{ "population_size": 12, "max_generations": 7 }"#).unwrap();

    let params = EvolutionParams::load_from_file(&path).unwrap();
    assert_eq!(params.population_size, 12);
    assert_eq!(params.max_generations, 7);
    assert_eq!(params.hidden_size, EvolutionParams::default().hidden_size);
}

#[test]
fn test_load_params_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = EvolutionParams::load_from_file(dir.path().join("missing.json"));
    assert!(matches!(missing, Err(Error::Io(_))));

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "population_size = 3").unwrap();
    assert!(matches!(
        EvolutionParams::load_from_file(&garbage),
        Err(Error::Json(_))
    ));

    let invalid = dir.path().join("invalid.json");
    fs::write(&invalid, r#"{ "population_size": 0 }"#).unwrap();
    assert!(matches!(
        EvolutionParams::load_from_file(&invalid),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn test_population_shape() {
    let params = small_params();
    let mut population = Population::new(params.clone()).unwrap();

    assert_eq!(population.genomes().len(), 4);
    for genome in population.genomes() {
        assert_eq!(genome.layer_sizes(), vec![3, 2, 1]);
    }
    assert_eq!(population.generation(), 0);
    assert!(population.champion().is_none());
    assert_eq!(population.spawn_generation().len(), params.population_size);
}

#[test]
fn test_evaluate_ranks_and_keeps_elite() {
    let mut population = Population::new(small_params()).unwrap();
    let best = population.genomes()[1].clone();

    let stats = population.evaluate(&report(vec![1.0, 5.0, 3.0, 2.0]));

    assert_eq!(stats.generation, 1);
    assert_eq!(stats.best_fitness, 5.0);
    assert_eq!(stats.mean_fitness, 2.75);
    assert_eq!(stats.score, 2);
    assert_eq!(stats.ticks, 150);

    let (champion, fitness) = population.champion().unwrap();
    assert_eq!(champion, &best);
    assert_eq!(fitness, 5.0);

    // The elite is carried over unchanged, the rest is bred.
    assert_eq!(population.genomes().len(), 4);
    assert_eq!(population.genomes()[0], best);
    assert_eq!(population.history(), &[stats]);
}

#[test]
fn test_champion_only_improves() {
    let mut population = Population::new(small_params()).unwrap();
    population.evaluate(&report(vec![1.0, 8.0, 3.0, 2.0]));
    let first = population.champion().unwrap().0.clone();

    population.evaluate(&report(vec![0.5, 0.5, 0.5, 0.5]));
    let (champion, fitness) = population.champion().unwrap();
    assert_eq!(fitness, 8.0);
    assert_eq!(champion, &first);

    population.evaluate(&report(vec![9.0, 0.5, 0.5, 0.5]));
    assert_eq!(population.champion().unwrap().1, 9.0);
}

#[test]
fn test_finishes_after_max_generations() {
    let mut population = Population::new(small_params()).unwrap();

    for generation in 1..=3 {
        assert!(!population.is_finished());
        let stats = population.evaluate(&report(vec![1.0; 4]));
        assert_eq!(stats.generation, generation);
    }
    assert!(population.is_finished());
}

#[test]
fn test_finishes_on_fitness_threshold() {
    let params = EvolutionParams {
        fitness_threshold: 10.0,
        ..small_params()
    };
    let mut population = Population::new(params).unwrap();

    population.evaluate(&report(vec![1.0, 9.9, 0.0, 0.0]));
    assert!(!population.is_finished());

    population.evaluate(&report(vec![1.0, 10.0, 0.0, 0.0]));
    assert!(population.is_finished());
}

#[test]
fn test_missing_fitness_ranks_last() {
    let mut population = Population::new(small_params()).unwrap();
    let stats = population.evaluate(&report(vec![-3.0, -2.0]));
    assert_eq!(stats.best_fitness, -2.0);
}

#[test]
fn test_brain_output_shape() {
    let brain = Brain::new(&[3, 4, 1], 1.0);
    let output = brain.think(&Array1::from_vec(vec![350.0, 50.0, 150.0]));

    assert_eq!(output.len(), 1);
    assert!(output[0] >= -1.0 && output[0] <= 1.0);
}

#[test]
fn test_crossover_and_mutation() {
    let a = Brain::new(&[3, 4, 1], 1.0);
    let b = Brain::new(&[3, 4, 1], 1.0);

    let child = Brain::crossover_weighted(&a, &b, 1.0);
    assert_eq!(child, a);

    let other_shape = Brain::new(&[3, 1], 1.0);
    assert_eq!(Brain::crossover_weighted(&a, &other_shape, 0.5), a);

    let mut mutant = a.clone();
    mutant.mutate(1.0, 0.5);
    assert_eq!(mutant.layer_sizes(), a.layer_sizes());
    assert_ne!(mutant, a);

    let mut untouched = a.clone();
    untouched.mutate(0.0, 0.5);
    assert_eq!(untouched, a);
}

#[test]
fn test_brain_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("winner.json");

    let brain = Brain::new(&[3, 4, 1], 1.0);
    brain.save_to_file(&path).unwrap();

    let loaded = Brain::load_from_file(&path).unwrap();
    assert_eq!(loaded, brain);
    assert_eq!(loaded.layer_sizes(), vec![3, 4, 1]);

    let inputs = Array1::from_vec(vec![300.0, 20.0, 180.0]);
    assert_eq!(loaded.think(&inputs), brain.think(&inputs));
}

#[test]
fn test_load_rejects_broken_brains() {
    let dir = tempfile::tempdir().unwrap();

    let empty = dir.path().join("empty.json");
    fs::write(&empty, r#"{ "layers": [] }"#).unwrap();
    assert!(matches!(
        Brain::load_from_file(&empty),
        Err(Error::InvalidConfig(_))
    ));

    let mut unchained = Brain::new(&[3, 4, 1], 1.0);
    unchained.layers.insert(1, Brain::new(&[5, 2], 1.0).layers.remove(0));

    let wrong_inputs = Brain::new(&[4, 4, 1], 1.0);
    let no_outputs = Brain::new(&[3, 0], 1.0);

    let mut short_biases = Brain::new(&[3, 4, 1], 1.0);
    short_biases.layers[0].biases = Array1::zeros(2);

    for (name, brain) in [
        ("unchained", unchained),
        ("wrong_inputs", wrong_inputs),
        ("no_outputs", no_outputs),
        ("short_biases", short_biases),
    ] {
        let path = dir.path().join(format!("{name}.json"));
        brain.save_to_file(&path).unwrap();
        assert!(
            matches!(Brain::load_from_file(&path), Err(Error::InvalidConfig(_))),
            "{name} should be rejected"
        );
        assert!(brain.validate().is_err(), "{name} should not validate");
    }

    assert!(Brain::new(&[3, 1], 1.0).validate().is_ok());
    assert!(Brain::new(&[3, 4, 2], 1.0).validate().is_ok());
}

#[test]
fn test_population_rejects_invalid_params() {
    let empty = EvolutionParams {
        population_size: 0,
        ..small_params()
    };
    assert!(matches!(
        Population::new(empty),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn test_equal_seeds_train_identically() {
    let mut a = Population::new(small_params()).unwrap();
    let mut b = Population::new(small_params()).unwrap();
    assert_eq!(a.genomes(), b.genomes());

    for fitness in [vec![1.0, 5.0, 3.0, 2.0], vec![4.0, 0.0, 2.0, 7.0]] {
        a.evaluate(&report(fitness.clone()));
        b.evaluate(&report(fitness));
        assert_eq!(a.genomes(), b.genomes());
    }

    let mut other = Population::new(EvolutionParams {
        seed: 1,
        ..small_params()
    })
    .unwrap();
    assert_ne!(a.genomes(), other.genomes());
    other.evaluate(&report(vec![1.0; 4]));
}
