//! Token embedding via a circular local convolution.

use burn::nn::conv::{Conv1d, Conv1dConfig};
use burn::nn::{Initializer, PaddingConfig1d};
use burn::prelude::*;

/// Projects per-timestep feature vectors into the model dimension.
///
/// A width-3 bias-free 1D convolution along the time axis with circular
/// boundary handling: the sequence wraps around its edges instead of being
/// zero-padded, so the first and last steps see real neighbours. Weights
/// use Kaiming normal init in fan-in mode with leaky-ReLU gain, matching
/// the activation statistics of the downstream blocks.
#[derive(Module, Debug)]
pub struct TokenEmbedding<B: Backend> {
    conv: Conv1d<B>,
}

impl<B: Backend> TokenEmbedding<B> {
    /// Create a token embedding from `c_in` input channels to `d_model`.
    pub fn new(c_in: usize, d_model: usize, device: &B::Device) -> Self {
        let conv = Conv1dConfig::new(c_in, d_model, 3)
            .with_padding(PaddingConfig1d::Valid)
            .with_bias(false)
            .with_initializer(Initializer::KaimingNormal {
                gain: std::f64::consts::SQRT_2,
                fan_out_only: false,
            })
            .init(device);
        Self { conv }
    }

    /// Forward pass: `(B, T, C_in)` to `(B, T, d_model)`.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = x.swap_dims(1, 2);
        let len = x.dims()[2];

        // Wrap one step on each side, then convolve without padding.
        let last = x.clone().narrow(2, len - 1, 1);
        let first = x.clone().narrow(2, 0, 1);
        let wrapped = Tensor::cat(vec![last, x, first], 2);

        self.conv.forward(wrapped).swap_dims(1, 2)
    }
}
