//! Sinusoidal positional embedding.

use burn::prelude::*;

use super::sinusoid_table;

/// Fixed sinusoidal positional embedding.
///
/// The table is computed once at construction and held as a constant
/// (non-trainable) tensor of shape `(1, max_len, d_model)`; the forward
/// pass returns the prefix for the requested sequence length, ready to be
/// broadcast-added to a `(B, T, d_model)` tensor.
#[derive(Module, Debug)]
pub struct PositionalEmbedding<B: Backend> {
    table: Tensor<B, 3>,
}

impl<B: Backend> PositionalEmbedding<B> {
    /// Create a positional embedding table.
    ///
    /// # Arguments
    ///
    /// * `d_model` - Model dimension
    /// * `max_len` - Longest sequence length the table will serve
    pub fn new(d_model: usize, max_len: usize, device: &B::Device) -> Self {
        let table = Tensor::<B, 1>::from_floats(sinusoid_table(max_len, d_model).as_slice(), device)
            .reshape([1, max_len, d_model]);
        Self { table }
    }

    /// Return the `(1, len, d_model)` positional table prefix.
    pub fn forward(&self, len: usize) -> Tensor<B, 3> {
        self.table.clone().narrow(1, 0, len)
    }
}
