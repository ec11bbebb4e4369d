//! Generational trainer that breeds the birds' brains.
//!
//! The world only needs controllers and gives back fitness; the [`Trainer`]
//! trait is that boundary. [`Population`] is a compact elitist trainer built on
//! the brain's mutation and crossover operators.

use std::path::Path;

use ndarray_rand::rand::SeedableRng as _;
use ndarray_rand::rand::rngs::StdRng as WeightRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::brain::Brain;
use super::controller::{Controller, SENSOR_COUNT};
use super::world::GenerationReport;
use crate::error::{Error, Result};

/// Trainer hyperparameters, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionParams {
    /// Genomes per generation.
    pub population_size: usize,
    /// Width of the hidden layer. Zero connects inputs straight to the output.
    pub hidden_size: usize,
    /// Initial weights are drawn from `[-weight_scale, weight_scale)`.
    pub weight_scale: f32,
    /// Probability that a single weight is perturbed in an offspring.
    pub mutation_rate: f64,
    /// Largest perturbation applied to a weight.
    pub mutation_scale: f32,
    /// Share of each generation copied unchanged and used as parents.
    pub elite_fraction: f32,
    /// Training stops once a generation's best fitness reaches this value.
    pub fitness_threshold: f32,
    /// Training stops after this many generations.
    pub max_generations: u32,
    /// Seed of the selection RNG.
    pub seed: u64,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            hidden_size: 4,
            weight_scale: 1.0,
            mutation_rate: 0.8,
            mutation_scale: 0.5,
            elite_fraction: 0.2,
            fitness_threshold: 100.0,
            max_generations: 50,
            seed: 0,
        }
    }
}

impl EvolutionParams {
    /// Reads parameters from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Rejects values the trainer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::InvalidConfig("population_size must be positive".into()));
        }
        if self.max_generations == 0 {
            return Err(Error::InvalidConfig("max_generations must be positive".into()));
        }
        if !(self.elite_fraction > 0.0 && self.elite_fraction <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "elite_fraction must be in (0, 1], got {}",
                self.elite_fraction
            )));
        }
        if self.weight_scale <= 0.0 {
            return Err(Error::InvalidConfig("weight_scale must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::InvalidConfig(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        Ok(())
    }

    /// Network shape: three sensors in, one jump signal out.
    pub fn layer_sizes(&self) -> Vec<usize> {
        if self.hidden_size == 0 {
            vec![SENSOR_COUNT, 1]
        } else {
            vec![SENSOR_COUNT, self.hidden_size, 1]
        }
    }

    fn elite_count(&self) -> usize {
        ((self.population_size as f32 * self.elite_fraction).ceil() as usize)
            .clamp(1, self.population_size)
    }
}

/// Summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number, starting at 1.
    pub generation: u32,
    /// Highest fitness of the generation.
    pub best_fitness: f32,
    /// Mean fitness of the generation.
    pub mean_fitness: f32,
    /// Pipes reached.
    pub score: u32,
    /// Ticks the generation lasted.
    pub ticks: u64,
}

/// Supplies controllers for a generation and consumes their fitness.
pub trait Trainer {
    /// Controller type flown by the birds.
    type Controller: Controller;

    /// Controllers for the next generation, one per bird.
    fn spawn_generation(&mut self) -> Vec<Self::Controller>;

    /// Consumes the fitness of the generation spawned last.
    fn evaluate(&mut self, report: &GenerationReport) -> GenerationStats;

    /// Whether training should stop.
    fn is_finished(&self) -> bool;
}

/// Elitist population of brains.
#[derive(Debug, Clone)]
pub struct Population {
    params: EvolutionParams,
    genomes: Vec<Brain>,
    generation: u32,
    history: Vec<GenerationStats>,
    champion: Option<(Brain, f32)>,
    rng: StdRng,
    /// Draws initial weights and mutation noise.
    weight_rng: WeightRng,
}

impl Population {
    /// Creates a population of random brains. Equal seeds give equal runs.
    pub fn new(params: EvolutionParams) -> Result<Self> {
        params.validate()?;

        let layer_sizes = params.layer_sizes();
        let mut weight_rng = WeightRng::seed_from_u64(params.seed);
        let genomes = (0..params.population_size)
            .map(|_| Brain::new_using(&layer_sizes, params.weight_scale, &mut weight_rng))
            .collect();
        let rng = StdRng::seed_from_u64(params.seed);

        Ok(Self {
            params,
            genomes,
            generation: 0,
            history: Vec::new(),
            champion: None,
            rng,
            weight_rng,
        })
    }

    /// Hyperparameters in use.
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    /// Genomes of the current generation.
    pub fn genomes(&self) -> &[Brain] {
        &self.genomes
    }

    /// Number of generations evaluated.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Stats of every evaluated generation, oldest first.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Best brain seen so far with its fitness.
    pub fn champion(&self) -> Option<(&Brain, f32)> {
        self.champion.as_ref().map(|(brain, fitness)| (brain, *fitness))
    }

    /// Builds the next generation from the ranked current one.
    fn breed(&mut self, ranking: &[usize]) {
        let elite_count = self.params.elite_count().min(ranking.len());
        let elites: Vec<Brain> = ranking[..elite_count]
            .iter()
            .map(|&i| self.genomes[i].clone())
            .collect();

        let mut next = Vec::with_capacity(self.params.population_size);
        next.extend(elites.iter().cloned());

        while next.len() < self.params.population_size {
            let parent1 = &elites[self.rng.random_range(0..elites.len())];
            let parent2 = &elites[self.rng.random_range(0..elites.len())];
            let weight1 = self.rng.random::<f32>();

            let mut child = Brain::crossover_weighted(parent1, parent2, weight1);
            child.mutate_using(
                self.params.mutation_rate,
                self.params.mutation_scale,
                &mut self.weight_rng,
            );
            next.push(child);
        }

        self.genomes = next;
    }
}

impl Trainer for Population {
    type Controller = Brain;

    fn spawn_generation(&mut self) -> Vec<Brain> {
        self.genomes.clone()
    }

    fn evaluate(&mut self, report: &GenerationReport) -> GenerationStats {
        self.generation += 1;

        let fitness = |i: usize| report.fitness.get(i).copied().unwrap_or(f32::MIN);
        let mut ranking: Vec<usize> = (0..self.genomes.len()).collect();
        ranking.sort_by(|&a, &b| fitness(b).total_cmp(&fitness(a)));

        let best_fitness = ranking.first().map_or(0.0, |&i| fitness(i));
        let mean_fitness = if report.fitness.is_empty() {
            0.0
        } else {
            report.fitness.iter().sum::<f32>() / report.fitness.len() as f32
        };

        if let Some(&best) = ranking.first() {
            let improved = self
                .champion
                .as_ref()
                .is_none_or(|(_, champion_fitness)| best_fitness > *champion_fitness);
            if improved {
                self.champion = Some((self.genomes[best].clone(), best_fitness));
            }
        }

        let stats = GenerationStats {
            generation: self.generation,
            best_fitness,
            mean_fitness,
            score: report.score,
            ticks: report.ticks,
        };
        info!(
            generation = stats.generation,
            best = stats.best_fitness,
            mean = stats.mean_fitness,
            score = stats.score,
            ticks = stats.ticks,
            "generation evaluated"
        );
        self.history.push(stats);

        self.breed(&ranking);
        stats
    }

    fn is_finished(&self) -> bool {
        let reached = self
            .history
            .last()
            .is_some_and(|stats| stats.best_fitness >= self.params.fitness_threshold);
        reached || self.generation >= self.params.max_generations
    }
}
