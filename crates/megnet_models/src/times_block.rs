//! Period-folding residual block.

use burn::nn::Gelu;
use burn::prelude::*;
use burn::tensor::activation::softmax;
use serde::{Deserialize, Serialize};

use crate::inception::{InceptionBlock2d, InceptionBlock2dConfig};
use crate::period::dominant_periods;

/// Configuration for [`TimesBlock`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimesBlockConfig {
    /// Sequence length the block operates on.
    pub seq_len: usize,
    /// Model dimension.
    pub d_model: usize,
    /// Hidden channel width of the inception pair.
    pub d_ff: usize,
    /// Parallel kernel count of each inception block.
    pub num_kernels: usize,
    /// Number of periodicities considered per forward pass.
    pub top_k: usize,
}

impl TimesBlockConfig {
    /// Create a new config.
    pub fn new(seq_len: usize, d_model: usize, d_ff: usize) -> Self {
        Self {
            seq_len,
            d_model,
            d_ff,
            num_kernels: 6,
            top_k: 10,
        }
    }

    /// Set the inception kernel count.
    #[must_use]
    pub fn with_num_kernels(mut self, num_kernels: usize) -> Self {
        self.num_kernels = num_kernels;
        self
    }

    /// Set the number of periodicities considered per forward pass.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Initialize the block.
    pub fn init<B: Backend>(&self, device: &B::Device) -> TimesBlock<B> {
        TimesBlock {
            conv_in: InceptionBlock2dConfig::new(self.d_model, self.d_ff)
                .with_num_kernels(self.num_kernels)
                .init(device),
            activation: Gelu::new(),
            conv_out: InceptionBlock2dConfig::new(self.d_ff, self.d_model)
                .with_num_kernels(self.num_kernels)
                .init(device),
            seq_len: self.seq_len,
            top_k: self.top_k,
        }
    }
}

/// Reshapes the sequence into a 2D (repetition x period) grid for each
/// discovered period, extracts multi-scale features with an inception pair,
/// and adaptively recombines the per-period reconstructions.
///
/// Periods are recomputed from the input on every call; output shape always
/// equals input shape, and the block input is added back as a residual.
#[derive(Module, Debug)]
pub struct TimesBlock<B: Backend> {
    conv_in: InceptionBlock2d<B>,
    activation: Gelu,
    conv_out: InceptionBlock2d<B>,
    seq_len: usize,
    top_k: usize,
}

impl<B: Backend> TimesBlock<B> {
    /// Forward pass: `(B, T, N)` to `(B, T, N)` with `T == seq_len`.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, _, n] = x.dims();
        let device = x.device();
        let (periods, period_weight) = dominant_periods(&x, self.top_k);

        let mut reconstructions = Vec::with_capacity(periods.len());
        for &period in &periods {
            // Pad the tail so the sequence folds into whole cycles.
            let length = if self.seq_len % period == 0 {
                self.seq_len
            } else {
                (self.seq_len / period + 1) * period
            };
            let out = if length > self.seq_len {
                let padding = Tensor::zeros([batch, length - self.seq_len, n], &device);
                Tensor::cat(vec![x.clone(), padding], 1)
            } else {
                x.clone()
            };

            // (B, length, N) -> (B, N, length/period, period): one row per
            // cycle, channel-first for the 2D convolutions.
            let out = out
                .reshape([batch, length / period, period, n])
                .permute([0, 3, 1, 2]);
            let out = self.conv_in.forward(out);
            let out = self.activation.forward(out);
            let out = self.conv_out.forward(out);

            let out = out.permute([0, 2, 3, 1]).reshape([batch, length, n]);
            reconstructions.push(out.narrow(1, 0, self.seq_len));
        }

        // Adaptive aggregation: amplitude-weighted sum over the period axis.
        let k = reconstructions.len();
        let stacked = Tensor::stack::<4>(reconstructions, 3);
        let weight = softmax(period_weight, 1).reshape([batch, 1, 1, k]);
        let aggregated = (stacked * weight)
            .sum_dim(3)
            .reshape([batch, self.seq_len, n]);

        aggregated + x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_config_defaults() {
        let config = TimesBlockConfig::new(64, 32, 32);
        assert_eq!(config.num_kernels, 6);
        assert_eq!(config.top_k, 10);
    }

    #[test]
    fn test_output_shape_matches_input() {
        let device = Default::default();
        let block: TimesBlock<TestBackend> = TimesBlockConfig::new(16, 8, 12)
            .with_num_kernels(2)
            .with_top_k(3)
            .init(&device);

        let x = Tensor::<TestBackend, 3>::random(
            [2, 16, 8],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        assert_eq!(block.forward(x).dims(), [2, 16, 8]);
    }

    #[test]
    fn test_non_dividing_periods_are_padded() {
        // 14 steps yield bins whose periods (e.g. 14 / 3 = 4) do not divide
        // the sequence length, forcing the padding path.
        let device = Default::default();
        let block: TimesBlock<TestBackend> = TimesBlockConfig::new(14, 4, 6)
            .with_num_kernels(2)
            .with_top_k(5)
            .init(&device);

        let x = Tensor::<TestBackend, 3>::random(
            [3, 14, 4],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        assert_eq!(block.forward(x).dims(), [3, 14, 4]);
    }

    #[test]
    fn test_zero_input_is_fixed_point() {
        // Zero input: every reconstruction is zero (zeroed conv biases),
        // the weighted sum of zeros is zero, and the residual adds zero.
        let device = Default::default();
        let block: TimesBlock<TestBackend> = TimesBlockConfig::new(12, 4, 4)
            .with_num_kernels(2)
            .with_top_k(2)
            .init(&device);

        let x = Tensor::<TestBackend, 3>::zeros([2, 12, 4], &device);
        let out: Vec<f32> = block.forward(x).to_data().to_vec().unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }
}
