//! Multi-kernel 2D inception block.

use burn::module::Param;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{Initializer, PaddingConfig2d};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for [`InceptionBlock2d`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InceptionBlock2dConfig {
    /// Number of input channels.
    pub in_channels: usize,
    /// Number of output channels.
    pub out_channels: usize,
    /// Number of parallel convolution branches.
    pub num_kernels: usize,
}

impl InceptionBlock2dConfig {
    /// Create a new config.
    pub fn new(in_channels: usize, out_channels: usize) -> Self {
        Self {
            in_channels,
            out_channels,
            num_kernels: 6,
        }
    }

    /// Set the number of parallel branches.
    #[must_use]
    pub fn with_num_kernels(mut self, num_kernels: usize) -> Self {
        self.num_kernels = num_kernels;
        self
    }

    /// Initialize the block.
    pub fn init<B: Backend>(&self, device: &B::Device) -> InceptionBlock2d<B> {
        let branches = (0..self.num_kernels)
            .map(|i| {
                // Odd kernel 2i+1 with padding i keeps H and W intact.
                let kernel = 2 * i + 1;
                let conv = Conv2dConfig::new(
                    [self.in_channels, self.out_channels],
                    [kernel, kernel],
                )
                .with_padding(PaddingConfig2d::Explicit(i, i))
                .with_initializer(Initializer::KaimingNormal {
                    gain: std::f64::consts::SQRT_2,
                    fan_out_only: true,
                })
                .init(device);
                zero_bias(conv)
            })
            .collect();

        InceptionBlock2d { branches }
    }
}

fn zero_bias<B: Backend>(mut conv: Conv2d<B>) -> Conv2d<B> {
    conv.bias = conv
        .bias
        .map(|bias| Param::from_tensor(bias.val().zeros_like()));
    conv
}

/// Multi-scale 2D feature extractor.
///
/// Runs `num_kernels` parallel convolutions with kernel sizes 1, 3, 5, ...
/// over the same input and averages the branch outputs. Every branch pads
/// so that the spatial dimensions are preserved exactly.
#[derive(Module, Debug)]
pub struct InceptionBlock2d<B: Backend> {
    branches: Vec<Conv2d<B>>,
}

impl<B: Backend> InceptionBlock2d<B> {
    /// Forward pass: `(B, C_in, H, W)` to `(B, C_out, H, W)`.
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let outputs: Vec<_> = self
            .branches
            .iter()
            .map(|conv| conv.forward(x.clone()))
            .collect();

        let stacked = Tensor::stack::<5>(outputs, 4);
        let [batch, channels, height, width, _] = stacked.dims();
        stacked
            .mean_dim(4)
            .reshape([batch, channels, height, width])
    }
}
