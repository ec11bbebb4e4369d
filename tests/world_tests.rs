#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::rc::Rc;

use flappy_evo::simulation::bird::Bird;
use flappy_evo::simulation::controller::Controller;
use flappy_evo::simulation::events::AgentHandle;
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::pipe::Pipe;
use flappy_evo::simulation::scene::DrawCommand;
use flappy_evo::simulation::sprites::{SpriteId, SpriteSheet};
use flappy_evo::simulation::world::{TickOutcome, World};
use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Test controller with a fixed decision.
#[derive(Debug, Clone, Copy)]
enum Pilot {
    Never,
    Always,
}

impl Controller for Pilot {
    fn activate(&mut self, _inputs: &Array1<f32>) -> Array1<f32> {
        match self {
            Pilot::Never => Array1::from_elem(1, 0.0),
            Pilot::Always => Array1::from_elem(1, 1.0),
        }
    }
}

fn create_world(params: Params, pilots: &[Pilot]) -> World<Pilot> {
    World::new(
        params,
        Rc::new(SpriteSheet::new()),
        pilots.iter().copied(),
        StdRng::seed_from_u64(42),
    )
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_new_world_layout() {
    let params = Params::default();
    let world = create_world(params.clone(), &[Pilot::Never; 3]);

    assert_eq!(world.alive(), 3);
    assert_eq!(world.pipes().len(), 1);
    assert_eq!(world.pipes()[0].x, params.pipe_spawn_x);
    assert_eq!(world.score(), 0);
    assert_eq!(world.ticks(), 0);
    assert!(!world.is_complete());
    for (i, agent) in world.agents().iter().enumerate() {
        assert_eq!(agent.handle, AgentHandle(i));
        assert_eq!(agent.bird, Bird::at_start(&params));
        assert_eq!(agent.fitness, 0.0);
    }
}

#[test]
fn test_falling_bird_retires_on_the_ground() {
    let params = Params::default();
    let sheet = SpriteSheet::new();
    let mut world = create_world(params.clone(), &[Pilot::Never]);

    // Replay the same fall on a standalone bird.
    let mut bird = Bird::at_start(&params);
    let mut expected_ticks = 0;
    loop {
        bird.advance_one_tick(&params);
        expected_ticks += 1;
        if bird.y + sheet.bird_height() >= params.floor_y {
            break;
        }
    }
    assert_eq!(expected_ticks, 23);

    for _ in 1..expected_ticks {
        assert_eq!(world.tick(), TickOutcome::Running);
    }
    assert_eq!(world.tick(), TickOutcome::GenerationComplete);
    assert_eq!(world.ticks(), 23);
    assert!(world.is_complete());

    let report = world.report();
    assert_eq!(report.fitness.len(), 1);
    assert_close(report.fitness[0], 2.3);
    assert_eq!(report.score, 0);
    assert_eq!(world.retired()[0].bird, bird);
}

#[test]
fn test_ticking_a_finished_world_changes_nothing() {
    let mut world = create_world(Params::default(), &[Pilot::Never]);
    while world.tick() == TickOutcome::Running {}

    let ticks = world.ticks();
    let report = world.report();
    assert_eq!(world.tick(), TickOutcome::GenerationComplete);
    assert_eq!(world.ticks(), ticks);
    assert_eq!(world.report(), report);
}

#[test]
fn test_agent_records_stay_together() {
    let pilots = [
        Pilot::Never,
        Pilot::Always,
        Pilot::Never,
        Pilot::Always,
        Pilot::Never,
    ];
    let mut world = create_world(Params::default(), &pilots);

    for _ in 0..23 {
        world.tick();
        assert_eq!(world.agents().len() + world.retired().len(), pilots.len());
        assert_eq!(world.report().fitness.len(), pilots.len());
    }

    let alive: Vec<usize> = world.agents().iter().map(|a| a.handle.0).collect();
    let retired: Vec<usize> = world.retired().iter().map(|a| a.handle.0).collect();
    assert_eq!(alive, vec![1, 3]);
    assert_eq!(retired, vec![0, 2, 4]);

    // Each controller still flies its own bird.
    for agent in world.agents() {
        assert!(matches!(agent.controller, Pilot::Always));
        assert_eq!(agent.bird.y, 353.5 - 9.0 * 22.0);
    }
    for agent in world.retired() {
        assert!(matches!(agent.controller, Pilot::Never));
    }
}

#[test]
fn test_jumping_bird_leaves_through_the_top() {
    let mut world = create_world(Params::default(), &[Pilot::Always]);

    let mut ticks = 0;
    while world.tick() == TickOutcome::Running {
        ticks += 1;
    }
    assert_eq!(ticks + 1, 41);
    assert!(world.retired()[0].bird.y < 0.0);
    assert_close(world.retired()[0].fitness, 4.1);
}

#[test]
fn test_pass_scores_once_and_spawns_one_pipe() {
    let params = Params::default();
    let pipe = Pipe::with_gap_center(232.0, 380.0, &params);
    let mut world = create_world(params.clone(), &[Pilot::Never; 3]).with_pipes(vec![pipe]);

    assert_eq!(world.tick(), TickOutcome::Running);
    assert_eq!(world.score(), 0);
    assert_eq!(world.pipes().len(), 1);
    assert_eq!(world.pipes()[0].x, 227.0);

    assert_eq!(world.tick(), TickOutcome::Running);
    assert_eq!(world.score(), 1);
    assert_eq!(world.pipes().len(), 2);
    assert!(world.pipes()[0].passed);
    assert_eq!(world.pipes()[1].x, params.pipe_spawn_x);
    assert!(!world.pipes()[1].passed);
    for agent in world.agents() {
        assert_close(agent.fitness, 0.2 + params.pass_reward);
    }

    world.tick();
    assert_eq!(world.score(), 1);
    assert_eq!(world.pipes().len(), 2);
}

#[test]
fn test_collision_retires_with_penalty() {
    let params = Params::default();
    // Gap far below the bird: it flies into the top pipe.
    let pipe = Pipe::with_gap_center(232.0, 600.0, &params);
    let mut world = create_world(params, &[Pilot::Never; 2]).with_pipes(vec![pipe]);

    assert_eq!(world.tick(), TickOutcome::GenerationComplete);
    assert_eq!(world.score(), 0);
    assert_eq!(world.pipes().len(), 1);
    assert!(!world.pipes()[0].passed);

    let report = world.report();
    assert_eq!(report.fitness.len(), 2);
    for fitness in report.fitness {
        assert_close(fitness, 0.1 - 1.0);
    }
}

#[test]
fn test_expired_pipe_is_removed() {
    let params = Params::default();
    let mut pipe = Pipe::with_gap_center(-95.0, 400.0, &params);
    pipe.passed = true;
    let far = Pipe::with_gap_center(600.0, 400.0, &params);
    let mut world = create_world(params, &[Pilot::Always]).with_pipes(vec![pipe, far]);

    world.tick();
    assert_eq!(world.pipes().len(), 2);
    assert_eq!(world.pipes()[0].x, -100.0);

    world.tick();
    assert_eq!(world.pipes().len(), 1);
    assert_eq!(world.pipes()[0].x, 590.0);
    assert_eq!(world.score(), 0);
}

#[test]
fn test_active_pipe_switches_after_the_bird_clears_it() {
    let params = Params::default();
    let mut behind = Pipe::with_gap_center(100.0, 400.0, &params);
    behind.passed = true;
    let ahead = Pipe::with_gap_center(600.0, 400.0, &params);
    let mut world = create_world(params, &[Pilot::Always]).with_pipes(vec![behind, ahead]);

    // Bird at x=230 is past the right edge of the first pipe (204).
    world.tick();
    assert_eq!(world.active_pipe_index(), 1);

    let mut world =
        create_world(Params::default(), &[Pilot::Always]).with_pipes(vec![Pipe::with_gap_center(
            600.0,
            400.0,
            &Params::default(),
        )]);
    world.tick();
    assert_eq!(world.active_pipe_index(), 0);
}

#[test]
fn test_score_cap_ends_generation() {
    let params = Params {
        max_score: Some(1),
        ..Params::default()
    };
    let pipe = Pipe::with_gap_center(232.0, 380.0, &params);
    let mut world = create_world(params, &[Pilot::Never; 2]).with_pipes(vec![pipe]);

    assert_eq!(world.tick(), TickOutcome::Running);
    assert_eq!(world.tick(), TickOutcome::GenerationComplete);
    assert_eq!(world.score(), 1);
    assert_eq!(world.alive(), 2);

    assert_eq!(world.tick(), TickOutcome::GenerationComplete);
    assert_eq!(world.ticks(), 2);
}

#[test]
fn test_empty_world_is_complete() {
    let mut world = create_world(Params::default(), &[]);
    assert_eq!(world.tick(), TickOutcome::GenerationComplete);
    assert_eq!(world.ticks(), 0);
    assert!(world.report().fitness.is_empty());
}

#[test]
fn test_draw_commands() {
    let params = Params::default();
    let world = create_world(params.clone(), &[Pilot::Never; 3]);
    let commands = world.draw_commands();

    // Two pipe halves, two ground tiles, three birds.
    assert_eq!(commands.len(), 7);

    let pipe = &world.pipes()[0];
    assert_eq!(
        commands[0],
        DrawCommand::at(SpriteId::PipeTop, pipe.x, pipe.gap_top() - 640.0)
    );
    assert_eq!(
        commands[1],
        DrawCommand::at(SpriteId::PipeBottom, pipe.x, pipe.gap_bottom())
    );
    assert_eq!(commands[2].sprite, SpriteId::Base);
    assert_eq!(commands[3].x, 672.0);
    for command in &commands[4..] {
        assert_eq!(command.sprite, SpriteId::Bird { frame: 0 });
        assert_eq!((command.x, command.y), (230.0, 350.0));
        assert_eq!(command.rotation, 0.0);
    }
}
