//! The tick-driven simulation of one generation.
//!
//! A world owns the live agents, the pipes and the ground. Each call to
//! [`World::tick`] runs the fixed update order:
//!
//! 1. pick the pipe every bird senses,
//! 2. move birds, grant survival fitness, consult controllers,
//! 3. scan pipes for collisions and passes (deferred), move pipes,
//! 4. on a pass: score, reward survivors, spawn a pipe,
//! 5. drop expired pipes,
//! 6. retire birds outside the vertical bounds,
//! 7. scroll the ground,
//! 8. report completion once no birds are left.

use std::rc::Rc;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::base::Base;
use super::bird::Bird;
use super::controller::{Controller, sensor_vector};
use super::events::{AgentHandle, EventQueue, Retirement, TickEvent};
use super::params::Params;
use super::pipe::Pipe;
use super::scene::DrawCommand;
use super::sprites::{SpriteId, SpriteSheet};

/// A bird together with the controller flying it and the fitness it earned.
///
/// Keeping the three in one record means retiring a bird can never leave a
/// controller or a fitness value behind.
#[derive(Debug, Clone)]
pub struct Agent<C> {
    /// Stable identifier within the generation.
    pub handle: AgentHandle,
    /// The bird being flown.
    pub bird: Bird,
    /// Decides when to jump.
    pub controller: C,
    /// Accumulated fitness.
    pub fitness: f32,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Birds are still flying.
    Running,
    /// Every bird was retired (or the score cap was reached).
    GenerationComplete,
}

/// What a finished generation hands back to the trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Fitness per agent, indexed by [`AgentHandle`].
    pub fitness: Vec<f32>,
    /// Pipes reached.
    pub score: u32,
    /// Ticks simulated.
    pub ticks: u64,
}

/// Simulation state of one generation.
#[derive(Debug)]
pub struct World<C> {
    params: Params,
    sheet: Rc<SpriteSheet>,
    rng: StdRng,
    agents: Vec<Agent<C>>,
    retired: Vec<Agent<C>>,
    pipes: Vec<Pipe>,
    base: Base,
    score: u32,
    ticks: u64,
    active_pipe: usize,
    complete: bool,
}

impl<C: Controller> World<C> {
    /// Creates a world with one bird per controller and a single pipe at the
    /// spawn position.
    pub fn new(
        params: Params,
        sheet: Rc<SpriteSheet>,
        controllers: impl IntoIterator<Item = C>,
        mut rng: StdRng,
    ) -> Self {
        let agents: Vec<Agent<C>> = controllers
            .into_iter()
            .enumerate()
            .map(|(i, controller)| Agent {
                handle: AgentHandle(i),
                bird: Bird::at_start(&params),
                controller,
                fitness: 0.0,
            })
            .collect();

        let pipes = vec![Pipe::new(params.pipe_spawn_x, &params, &mut rng)];
        let base = Base::new(params.floor_y, sheet.base_width());

        Self {
            params,
            sheet,
            rng,
            agents,
            retired: Vec::new(),
            pipes,
            base,
            score: 0,
            ticks: 0,
            active_pipe: 0,
            complete: false,
        }
    }

    /// Replaces the pipes, e.g. to set up a known layout.
    pub fn with_pipes(mut self, pipes: Vec<Pipe>) -> Self {
        self.pipes = pipes;
        self
    }

    /// Runs one tick of the simulation.
    pub fn tick(&mut self) -> TickOutcome {
        if self.complete || self.agents.is_empty() {
            self.complete = true;
            return TickOutcome::GenerationComplete;
        }
        self.ticks += 1;

        self.active_pipe = self.select_active_pipe();
        self.advance_agents();

        let mut queue = EventQueue::new();
        self.scan_pipes(&mut queue);
        self.apply_events(queue);

        let mut queue = EventQueue::new();
        self.scan_bounds(&mut queue);
        self.apply_events(queue);

        self.base.advance_one_tick(&self.params);

        let capped = self.params.max_score.is_some_and(|cap| self.score >= cap);
        if self.agents.is_empty() || capped {
            self.complete = true;
            debug!(
                score = self.score,
                ticks = self.ticks,
                capped,
                "generation complete"
            );
            TickOutcome::GenerationComplete
        } else {
            TickOutcome::Running
        }
    }

    /// The first pipe until the lead bird is past its right edge, then the next one.
    fn select_active_pipe(&self) -> usize {
        let Some(lead) = self.agents.first() else {
            return 0;
        };
        match self.pipes.first() {
            Some(first)
                if self.pipes.len() > 1 && lead.bird.x > first.right_edge(&self.sheet) =>
            {
                1
            }
            _ => 0,
        }
    }

    fn advance_agents(&mut self) {
        let target = self.pipes.get(self.active_pipe);
        let params = &self.params;

        for agent in &mut self.agents {
            agent.bird.advance_one_tick(params);
            agent.fitness += params.survival_reward;

            let Some(pipe) = target else {
                continue;
            };
            let output = agent.controller.activate(&sensor_vector(&agent.bird, pipe));
            if output
                .get(0)
                .is_some_and(|&value| value > params.activation_threshold)
            {
                trace!(handle = agent.handle.0, "jump");
                agent.bird.jump(params);
            }
        }
    }

    fn scan_pipes(&mut self, queue: &mut EventQueue) {
        for (pipe_index, pipe) in self.pipes.iter_mut().enumerate() {
            for agent in &self.agents {
                if queue.is_retiring(agent.handle) {
                    continue;
                }
                if pipe.collides_with(&agent.bird, &self.sheet) {
                    queue.push(TickEvent::BirdRetired {
                        handle: agent.handle,
                        reason: Retirement::Collision,
                    });
                    continue;
                }
                if !pipe.passed && agent.bird.x > pipe.x {
                    pipe.passed = true;
                    queue.push(TickEvent::PipePassed { pipe_index });
                }
            }

            pipe.advance_one_tick(&self.params);
            if pipe.is_off_screen(&self.sheet) {
                queue.push(TickEvent::PipeExpired { pipe_index });
            }
        }
    }

    fn scan_bounds(&self, queue: &mut EventQueue) {
        let bird_height = self.sheet.bird_height();
        for agent in &self.agents {
            let bird = &agent.bird;
            if bird.y + bird_height >= self.params.floor_y || bird.y < 0.0 {
                queue.push(TickEvent::BirdRetired {
                    handle: agent.handle,
                    reason: Retirement::OutOfBounds,
                });
            }
        }
    }

    /// Applies queued events: retirements first, then the pass reward, then
    /// pipe removal.
    fn apply_events(&mut self, mut queue: EventQueue) {
        let mut retiring = Vec::new();
        let mut passed = false;
        let mut expired = Vec::new();

        for event in queue.drain() {
            match event {
                TickEvent::BirdRetired { handle, reason } => retiring.push((handle, reason)),
                TickEvent::PipePassed { .. } => passed = true,
                TickEvent::PipeExpired { pipe_index } => expired.push(pipe_index),
            }
        }

        if !retiring.is_empty() {
            self.retire(&retiring);
        }

        if passed {
            self.score += 1;
            for agent in &mut self.agents {
                agent.fitness += self.params.pass_reward;
            }
            let pipe = Pipe::new(self.params.pipe_spawn_x, &self.params, &mut self.rng);
            debug!(
                score = self.score,
                gap_center = pipe.gap_center(),
                "pipe passed, spawning next"
            );
            self.pipes.push(pipe);
        }

        // Remove in reverse order so earlier indices stay valid.
        expired.sort_unstable();
        expired.dedup();
        for index in expired.into_iter().rev() {
            if index < self.pipes.len() {
                self.pipes.remove(index);
            }
        }
    }

    /// Moves the listed agents, as whole records, to the retired list.
    fn retire(&mut self, retiring: &[(AgentHandle, Retirement)]) {
        let reason_for = |handle: AgentHandle| {
            retiring
                .iter()
                .find(|(h, _)| *h == handle)
                .map(|(_, reason)| *reason)
        };

        let (gone, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.agents)
            .into_iter()
            .partition(|agent| reason_for(agent.handle).is_some());
        self.agents = live;

        for mut agent in gone {
            let reason = reason_for(agent.handle);
            if reason == Some(Retirement::Collision) {
                agent.fitness += self.params.collision_penalty;
            }
            debug!(
                handle = agent.handle.0,
                ?reason,
                fitness = agent.fitness,
                tick = self.ticks,
                "bird retired"
            );
            self.retired.push(agent);
        }
    }
}

impl<C> World<C> {
    /// Fitness of every agent so far, ordered by handle.
    pub fn report(&self) -> GenerationReport {
        let mut fitness = vec![0.0; self.agents.len() + self.retired.len()];
        for agent in self.agents.iter().chain(&self.retired) {
            if let Some(slot) = fitness.get_mut(agent.handle.0) {
                *slot = agent.fitness;
            }
        }
        GenerationReport {
            fitness,
            score: self.score,
            ticks: self.ticks,
        }
    }

    /// Sprites to draw this frame, back to front.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(self.pipes.len() * 2 + 2 + self.agents.len());

        for pipe in &self.pipes {
            commands.push(DrawCommand::at(
                SpriteId::PipeTop,
                pipe.x,
                pipe.top_y(&self.sheet),
            ));
            commands.push(DrawCommand::at(
                SpriteId::PipeBottom,
                pipe.x,
                pipe.bottom_y(),
            ));
        }

        commands.push(DrawCommand::at(SpriteId::Base, self.base.x1, self.base.y));
        commands.push(DrawCommand::at(SpriteId::Base, self.base.x2, self.base.y));

        for agent in &self.agents {
            commands.push(DrawCommand {
                sprite: SpriteId::Bird {
                    frame: agent.bird.frame(),
                },
                x: agent.bird.x,
                y: agent.bird.y,
                rotation: agent.bird.tilt,
            });
        }

        commands
    }

    /// Live agents in creation order.
    pub fn agents(&self) -> &[Agent<C>] {
        &self.agents
    }

    /// Mutable access to live agents. The set itself cannot change.
    pub fn agents_mut(&mut self) -> &mut [Agent<C>] {
        &mut self.agents
    }

    /// Agents removed so far, in retirement order.
    pub fn retired(&self) -> &[Agent<C>] {
        &self.retired
    }

    /// Pipes in spawn order.
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// The ground.
    pub fn base(&self) -> &Base {
        &self.base
    }

    /// Game constants of this world.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Sprite sheet shared with the renderer.
    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    /// Pipes reached so far.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Index of the pipe birds sensed during the last tick.
    pub fn active_pipe_index(&self) -> usize {
        self.active_pipe
    }

    /// Number of birds still flying.
    pub fn alive(&self) -> usize {
        self.agents.len()
    }

    /// Whether the generation has ended.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
