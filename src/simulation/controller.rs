//! Decision makers that tell a bird when to jump.

use ndarray::Array1;

use super::bird::Bird;
use super::brain::Brain;
use super::pipe::Pipe;

/// Number of sensor values handed to a controller each tick.
pub const SENSOR_COUNT: usize = 3;

/// Something that maps the bird's sensors to an output vector.
///
/// Only the first output is read; the bird jumps when it exceeds the
/// activation threshold.
pub trait Controller {
    /// Evaluates the controller for one tick.
    fn activate(&mut self, inputs: &Array1<f32>) -> Array1<f32>;
}

impl Controller for Brain {
    fn activate(&mut self, inputs: &Array1<f32>) -> Array1<f32> {
        self.think(inputs)
    }
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn activate(&mut self, inputs: &Array1<f32>) -> Array1<f32> {
        (**self).activate(inputs)
    }
}

/// Sensor vector: bird height and its vertical distance to both gap edges.
pub fn sensor_vector(bird: &Bird, pipe: &Pipe) -> Array1<f32> {
    Array1::from_vec(vec![
        bird.y,
        (bird.y - pipe.gap_top()).abs(),
        (bird.y - pipe.gap_bottom()).abs(),
    ])
}
