//! A fully connected layer with tanh activation.

use ndarray::{Array1, Array2, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::{Bernoulli, Uniform};
use serde::{Deserialize, Serialize};

/// One dense layer of a feed-forward network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Layer {
    /// Creates a layer with weights and biases drawn from `[-scale, scale)`.
    pub fn new_random(input_size: usize, output_size: usize, scale: f32) -> Self {
        Self::new_random_using(
            input_size,
            output_size,
            scale,
            &mut ndarray_rand::rand::thread_rng(),
        )
    }

    /// Like [`Layer::new_random`], drawing from `rng`.
    pub fn new_random_using<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        scale: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            weights: Array2::random_using(
                (output_size, input_size),
                Uniform::new(-scale, scale),
                rng,
            ),
            biases: Array1::random_using(output_size, Uniform::new(-scale, scale), rng),
        }
    }

    /// Whether the bias vector matches the weight rows.
    pub fn is_consistent(&self) -> bool {
        self.biases.len() == self.weights.nrows()
    }

    /// Number of inputs the layer expects.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Forward pass: `tanh(W·x + b)`.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(f32::tanh);
        output
    }

    /// Perturbs each parameter with probability `rate` by uniform noise in
    /// `[-scale, scale)`.
    pub fn mutate(&mut self, rate: f64, scale: f32) {
        self.mutate_using(rate, scale, &mut ndarray_rand::rand::thread_rng());
    }

    /// Like [`Layer::mutate`], drawing from `rng`.
    pub fn mutate_using<R: Rng + ?Sized>(&mut self, rate: f64, scale: f32, rng: &mut R) {
        let rate = rate.clamp(0.0, 1.0);
        perturb(&mut self.weights, rate, scale, rng);
        perturb(&mut self.biases, rate, scale, rng);
    }

    /// Blends two parent layers, `weight1` of the first and the rest of the second.
    pub fn crossover_weighted(parent1: &Layer, parent2: &Layer, weight1: f32) -> Self {
        let weight2 = 1.0 - weight1;
        Self {
            weights: &parent1.weights * weight1 + &parent2.weights * weight2,
            biases: &parent1.biases * weight1 + &parent2.biases * weight2,
        }
    }
}

fn perturb<D: ndarray::Dimension, R: Rng + ?Sized>(
    values: &mut ndarray::Array<f32, D>,
    rate: f64,
    scale: f32,
    rng: &mut R,
) {
    if scale <= 0.0 || rate == 0.0 {
        return;
    }
    let Ok(selector) = Bernoulli::new(rate) else {
        return;
    };
    let noise =
        ndarray::Array::<f32, D>::random_using(values.raw_dim(), Uniform::new(-scale, scale), rng);
    let chosen = ndarray::Array::<bool, D>::random_using(values.raw_dim(), selector, rng);
    Zip::from(values)
        .and(&noise)
        .and(&chosen)
        .for_each(|value, &delta, &hit| {
            if hit {
                *value += delta;
            }
        });
}
