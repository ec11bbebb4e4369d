use serde::{Deserialize, Serialize};

/// Game constants that control the simulation.
///
/// These are fixed for a session: `Params::default()` holds the values the
/// game is tuned for, and a copy is handed to every world at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Width of the play field.
    pub window_width: f32,
    /// Height of the play field.
    pub window_height: f32,
    /// Ground line. Birds whose bottom edge reaches it are retired.
    pub floor_y: f32,
    /// Horizontal start position of every bird.
    pub bird_start_x: f32,
    /// Vertical start position of every bird.
    pub bird_start_y: f32,
    /// Velocity set by a jump (negative is upwards).
    pub jump_velocity: f32,
    /// Constant downward acceleration per tick squared.
    pub gravity: f32,
    /// Extra downward displacement added once the ascent is over.
    pub fall_bias: f32,
    /// Largest displacement a bird can make in a single tick.
    pub terminal_displacement: f32,
    /// Nose-up tilt in degrees while ascending.
    pub max_rotation: f32,
    /// Nose-down rotation in degrees per tick while falling.
    pub rotation_velocity: f32,
    /// Distance below the last jump height that still counts as ascending.
    pub ascent_window: f32,
    /// Ticks each wing-flap frame is held.
    pub animation_time: u32,
    /// Vertical opening between the top and bottom pipe.
    pub pipe_gap: f32,
    /// Horizontal pipe speed per tick.
    pub pipe_velocity: f32,
    /// Horizontal position new pipes are created at.
    pub pipe_spawn_x: f32,
    /// Lowest possible gap center (inclusive).
    pub gap_center_min: f32,
    /// Highest possible gap center (exclusive).
    pub gap_center_max: f32,
    /// Horizontal ground scroll speed per tick.
    pub base_velocity: f32,
    /// Controller output above which the bird jumps.
    pub activation_threshold: f32,
    /// Fitness granted every tick a bird survives.
    pub survival_reward: f32,
    /// Fitness granted to every live bird when a new pipe is reached.
    pub pass_reward: f32,
    /// Fitness change applied when a bird hits a pipe.
    pub collision_penalty: f32,
    /// Ends the generation early once the score reaches this value.
    pub max_score: Option<u32>,
    /// Simulation rate of the windowed modes.
    pub ticks_per_second: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            window_width: 600.0,
            window_height: 800.0,
            floor_y: 730.0,
            bird_start_x: 230.0,
            bird_start_y: 350.0,
            jump_velocity: -10.5,
            gravity: 3.0,
            fall_bias: 2.0,
            terminal_displacement: 16.0,
            max_rotation: 25.0,
            rotation_velocity: 20.0,
            ascent_window: 50.0,
            animation_time: 5,
            pipe_gap: 200.0,
            pipe_velocity: 5.0,
            pipe_spawn_x: 700.0,
            gap_center_min: 150.0,
            gap_center_max: 550.0,
            base_velocity: 5.0,
            activation_threshold: 0.5,
            survival_reward: 0.1,
            pass_reward: 5.0,
            collision_penalty: -1.0,
            max_score: None,
            ticks_per_second: 30,
        }
    }
}
