//! Feed-forward neural network used as a bird's controller.
//!
//! Supports the genetic operators the trainer needs (mutation and crossover)
//! and JSON persistence for the champion network.

use std::path::Path;

use ndarray::Array1;
use ndarray_rand::rand::Rng;
use serde::{Deserialize, Serialize};

use super::controller::SENSOR_COUNT;
use crate::error::{Error, Result};

pub mod layer;

pub use layer::Layer;

/// Multi-layer perceptron with tanh activations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Layer>,
}

impl Brain {
    /// Creates a network with random weights.
    ///
    /// `layer_sizes` lists the width of every layer including input and output,
    /// e.g. `[3, 4, 1]`.
    pub fn new(layer_sizes: &[usize], scale: f32) -> Self {
        Self::new_using(layer_sizes, scale, &mut ndarray_rand::rand::thread_rng())
    }

    /// Like [`Brain::new`], drawing the weights from `rng`.
    pub fn new_using<R: Rng + ?Sized>(layer_sizes: &[usize], scale: f32, rng: &mut R) -> Self {
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Layer::new_random_using(pair[0], pair[1], scale, rng))
            .collect();

        Self { layers }
    }

    /// Runs a forward pass through the network.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }

    /// Width of every layer including input and output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.layers.first().map(Layer::input_size).into_iter().collect();
        sizes.extend(self.layers.iter().map(Layer::output_size));
        sizes
    }

    /// Creates a new network by blending two parents.
    /// Parents with different shapes yield a copy of `parent1`.
    pub fn crossover_weighted(parent1: &Brain, parent2: &Brain, weight1: f32) -> Self {
        if parent1.layer_sizes() != parent2.layer_sizes() {
            return parent1.clone();
        }
        let layers = parent1
            .layers
            .iter()
            .zip(&parent2.layers)
            .map(|(layer1, layer2)| Layer::crossover_weighted(layer1, layer2, weight1))
            .collect();
        Self { layers }
    }

    /// Mutates parameters of every layer.
    pub fn mutate(&mut self, rate: f64, scale: f32) {
        self.mutate_using(rate, scale, &mut ndarray_rand::rand::thread_rng());
    }

    /// Like [`Brain::mutate`], drawing the noise from `rng`.
    pub fn mutate_using<R: Rng + ?Sized>(&mut self, rate: f64, scale: f32, rng: &mut R) {
        for layer in &mut self.layers {
            layer.mutate_using(rate, scale, rng);
        }
    }

    /// Checks that the network can fly a bird: it reads the sensor vector,
    /// produces at least one output and every layer feeds the next.
    pub fn validate(&self) -> Result<()> {
        let (Some(first), Some(last)) = (self.layers.first(), self.layers.last()) else {
            return Err(Error::InvalidConfig("brain has no layers".into()));
        };
        if first.input_size() != SENSOR_COUNT {
            return Err(Error::InvalidConfig(format!(
                "brain takes {} inputs, expected {}",
                first.input_size(),
                SENSOR_COUNT
            )));
        }
        if last.output_size() == 0 {
            return Err(Error::InvalidConfig("brain has no outputs".into()));
        }
        if let Some(i) = self.layers.iter().position(|layer| !layer.is_consistent()) {
            return Err(Error::InvalidConfig(format!(
                "layer {} has {} biases for {} outputs",
                i,
                self.layers[i].biases.len(),
                self.layers[i].output_size()
            )));
        }
        let chained = self
            .layers
            .windows(2)
            .all(|pair| pair[0].output_size() == pair[1].input_size());
        if !chained {
            return Err(Error::InvalidConfig("brain layer sizes do not chain".into()));
        }
        Ok(())
    }

    /// Saves the network as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a network saved by [`Brain::save_to_file`].
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let brain: Brain = serde_json::from_str(&json)?;
        brain.validate()?;
        Ok(brain)
    }
}
