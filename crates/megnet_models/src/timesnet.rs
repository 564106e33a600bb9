//! TimesNet encoder.
//!
//! Based on the paper "TimesNet: Temporal 2D-Variation Modeling for General
//! Time Series Analysis" by Wu et al. (2023), adapted as an encoder for
//! multichannel brain-signal recordings.

use std::sync::Arc;

use burn::module::Ignored;
use burn::nn::{
    Dropout, DropoutConfig, Gelu, LayerNorm, LayerNormConfig, Linear, LinearConfig,
};
use burn::prelude::*;
use burn::tensor::module::interpolate;
use burn::tensor::ops::{InterpolateMode, InterpolateOptions};
use serde::{Deserialize, Serialize};

use megnet_core::{CoreError, ModalityInputs, RecordingBatch, Result, SignalEncoder};

use crate::collaborators::{ChannelMerger, SubjectAdapter};
use crate::embed::{DataEmbedding, DataEmbeddingConfig};
use crate::times_block::{TimesBlock, TimesBlockConfig};

/// Configuration for [`TimesNet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimesNetConfig {
    /// Number of raw input channels in the magnetometer signal.
    pub in_channels: usize,
    /// Output channel width of the final projection.
    pub flatten_out_channels: usize,
    /// Sequence length the block stack operates on; shorter inputs are
    /// zero-padded and longer inputs truncated before embedding.
    pub sequence_length: usize,
    /// Model dimension.
    pub d_model: usize,
    /// Hidden channel width inside each block's inception pair.
    pub d_ff: usize,
    /// Number of stacked blocks.
    pub depth: usize,
    /// Parallel kernel count of each inception block.
    pub num_kernels: usize,
    /// Number of periodicities considered per forward pass.
    pub top_k: usize,
    /// Dropout rate inside the data embedding.
    pub dropout_embedding: f64,
    /// Dropout rate before the output projection.
    pub dropout_projection: f64,
    /// Longest sequence served by the positional table.
    pub max_position: usize,
}

impl Default for TimesNetConfig {
    fn default() -> Self {
        Self {
            in_channels: 1,
            flatten_out_channels: 1024,
            sequence_length: 361,
            d_model: 32,
            d_ff: 32,
            depth: 2,
            num_kernels: 6,
            top_k: 10,
            dropout_embedding: 0.1,
            dropout_projection: 0.2,
            max_position: 5000,
        }
    }
}

impl TimesNetConfig {
    /// Create a new config with the required dimensions.
    pub fn new(in_channels: usize, sequence_length: usize, flatten_out_channels: usize) -> Self {
        Self {
            in_channels,
            sequence_length,
            flatten_out_channels,
            ..Default::default()
        }
    }

    /// Set the model dimension.
    #[must_use]
    pub fn with_d_model(mut self, d_model: usize) -> Self {
        self.d_model = d_model;
        self
    }

    /// Set the inception hidden width.
    #[must_use]
    pub fn with_d_ff(mut self, d_ff: usize) -> Self {
        self.d_ff = d_ff;
        self
    }

    /// Set the block stack depth.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
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

    /// Set the embedding dropout rate.
    #[must_use]
    pub fn with_dropout_embedding(mut self, dropout: f64) -> Self {
        self.dropout_embedding = dropout;
        self
    }

    /// Set the projection dropout rate.
    #[must_use]
    pub fn with_dropout_projection(mut self, dropout: f64) -> Self {
        self.dropout_projection = dropout;
        self
    }

    /// Check the config for dimension mistakes before building the model.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigError`] when a zero-sized dimension or an
    /// undersized positional table would make the forward pass unbuildable.
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 || self.top_k == 0 || self.num_kernels == 0 {
            return Err(CoreError::ConfigError(
                "depth, top_k, and num_kernels must all be at least 1".into(),
            ));
        }
        if self.sequence_length < 2 {
            return Err(CoreError::ConfigError(format!(
                "sequence_length {} leaves no non-trivial frequency bins",
                self.sequence_length
            )));
        }
        if self.max_position < self.sequence_length {
            return Err(CoreError::ConfigError(format!(
                "positional table of {} cannot cover sequence_length {}",
                self.max_position, self.sequence_length
            )));
        }
        Ok(())
    }

    /// Initialize the model without collaborators.
    pub fn init<B: Backend>(&self, device: &B::Device) -> TimesNet<B> {
        self.init_with(device, None, None)
    }

    /// Initialize the model, wiring in optional collaborators.
    ///
    /// The embedded channel width follows the wiring: the merger's output
    /// width replaces the raw channel count, and the subject adapter's
    /// output width replaces that in turn.
    pub fn init_with<B: Backend>(
        &self,
        device: &B::Device,
        merger: Option<Arc<dyn ChannelMerger<B>>>,
        subject_adapter: Option<Arc<dyn SubjectAdapter<B>>>,
    ) -> TimesNet<B> {
        let mut channels = self.in_channels;
        if let Some(merger) = &merger {
            channels = merger.merged_channels();
        }
        if let Some(adapter) = &subject_adapter {
            channels = adapter.adapted_channels();
        }
        tracing::debug!(
            "TimesNet: {} embedded channels, d_model={}, depth={}, top_k={}",
            channels,
            self.d_model,
            self.depth,
            self.top_k
        );

        let embedding = DataEmbeddingConfig::new(channels, self.d_model)
            .with_dropout(self.dropout_embedding)
            .with_max_position(self.max_position)
            .init(device);
        let blocks = (0..self.depth)
            .map(|_| {
                TimesBlockConfig::new(self.sequence_length, self.d_model, self.d_ff)
                    .with_num_kernels(self.num_kernels)
                    .with_top_k(self.top_k)
                    .init(device)
            })
            .collect();

        TimesNet {
            merger: Ignored(merger),
            subject_adapter: Ignored(subject_adapter),
            embedding,
            blocks,
            norm: LayerNormConfig::new(self.d_model).init(device),
            activation: Gelu::new(),
            dropout: DropoutConfig::new(self.dropout_projection).init(),
            projection: LinearConfig::new(self.d_model, self.flatten_out_channels).init(device),
            sequence_length: self.sequence_length,
        }
    }
}

/// Frequency-domain encoder for multichannel recordings.
///
/// The forward pass crops or pads the input to the configured sequence
/// length, optionally routes it through the channel-merger and
/// subject-adapter collaborators, embeds it, runs the block stack, and
/// projects back to the output channel width, restoring the original
/// temporal length at the end.
#[derive(Module, Debug)]
pub struct TimesNet<B: Backend> {
    merger: Ignored<Option<Arc<dyn ChannelMerger<B>>>>,
    subject_adapter: Ignored<Option<Arc<dyn SubjectAdapter<B>>>>,
    embedding: DataEmbedding<B>,
    blocks: Vec<TimesBlock<B>>,
    norm: LayerNorm<B>,
    activation: Gelu,
    dropout: Dropout,
    projection: Linear<B>,
    sequence_length: usize,
}

impl<B: Backend> TimesNet<B> {
    /// Crop or right-pad the `(B, C, T)` signal to the configured sequence
    /// length, returning the adjusted tensor and the signed length delta.
    fn crop_or_pad(&self, x: Tensor<B, 3>) -> (Tensor<B, 3>, i64) {
        let [batch, channels, len] = x.dims();
        let delta = self.sequence_length as i64 - len as i64;
        if len < self.sequence_length {
            let padding =
                Tensor::zeros([batch, channels, self.sequence_length - len], &x.device());
            (Tensor::cat(vec![x, padding], 2), delta)
        } else if len > self.sequence_length {
            (x.narrow(2, 0, self.sequence_length), delta)
        } else {
            (x, delta)
        }
    }

    /// Forward pass.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Modality tensors; `meg` has shape `(B, C, T)`
    /// * `batch` - Recording metadata for the optional collaborators
    ///
    /// # Returns
    ///
    /// Output tensor of shape `(B, flatten_out_channels, T)` with the input
    /// sequence length restored: sliced back when the input was padded,
    /// linearly interpolated back when it was truncated.
    pub fn forward(&self, inputs: &ModalityInputs<B>, batch: &RecordingBatch<B>) -> Tensor<B, 3> {
        let meg = inputs.meg().clone();
        let original_len = meg.dims()[2];

        let (x, delta) = self.crop_or_pad(meg);
        let x = match self.merger.0.as_ref() {
            Some(merger) => merger.merge(x, batch),
            None => x,
        };
        let x = match self.subject_adapter.0.as_ref() {
            Some(adapter) => adapter.adapt(x, batch.subject_index().clone()),
            None => x,
        };

        // No calendar marks for magnetometer windows: the temporal term is
        // omitted from the embedding sum.
        let x = self.embedding.forward(x.swap_dims(1, 2), None);

        // Every block reads the embedding; only the last block's normalized
        // output survives the loop.
        let mut enc_out = x.clone();
        for block in &self.blocks {
            enc_out = self.norm.forward(block.forward(x.clone()));
        }

        let out = self.activation.forward(enc_out);
        let out = self.dropout.forward(out);
        let out = self.projection.forward(out);
        let out = out.swap_dims(1, 2);

        if delta >= 0 {
            out.narrow(2, 0, original_len)
        } else {
            let [batch_size, channels, len] = out.dims();
            let out = out.reshape([batch_size, channels, 1, len]);
            let out = interpolate(
                out,
                [1, original_len],
                InterpolateOptions::new(InterpolateMode::Bilinear),
            );
            out.reshape([batch_size, channels, original_len])
        }
    }
}

impl<B: Backend> SignalEncoder<B> for TimesNet<B> {
    fn encode(&self, inputs: &ModalityInputs<B>, batch: &RecordingBatch<B>) -> Tensor<B, 3> {
        self.forward(inputs, batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    fn inputs(
        batch: usize,
        channels: usize,
        len: usize,
    ) -> (ModalityInputs<TestBackend>, RecordingBatch<TestBackend>) {
        let device = Default::default();
        let meg = Tensor::<TestBackend, 3>::random(
            [batch, channels, len],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );
        let subjects = Tensor::<TestBackend, 1, Int>::zeros([batch], &device);
        (ModalityInputs::new(meg), RecordingBatch::new(subjects))
    }

    #[test]
    fn test_config_validation() {
        assert!(TimesNetConfig::default().validate().is_ok());
        assert!(small_config().validate().is_ok());

        assert!(TimesNetConfig::default().with_depth(0).validate().is_err());
        assert!(TimesNetConfig::default().with_top_k(0).validate().is_err());
        assert!(TimesNetConfig::new(3, 1, 4).validate().is_err());

        let mut config = TimesNetConfig::default();
        config.max_position = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = TimesNetConfig::default();
        assert_eq!(config.sequence_length, 361);
        assert_eq!(config.d_model, 32);
        assert_eq!(config.d_ff, 32);
        assert_eq!(config.depth, 2);
        assert_eq!(config.num_kernels, 6);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.flatten_out_channels, 1024);
    }

    fn small_config() -> TimesNetConfig {
        TimesNetConfig::new(3, 16, 4)
            .with_d_model(8)
            .with_d_ff(8)
            .with_depth(1)
            .with_num_kernels(2)
            .with_top_k(1)
    }

    #[test]
    fn test_short_input_is_padded_and_sliced_back() {
        let device = Default::default();
        let model: TimesNet<TestBackend> = small_config().init(&device);

        let (inputs, batch) = inputs(2, 3, 12);
        assert_eq!(model.forward(&inputs, &batch).dims(), [2, 4, 12]);
    }

    #[test]
    fn test_exact_length_passes_through() {
        let device = Default::default();
        let model: TimesNet<TestBackend> = small_config().init(&device);

        let (inputs, batch) = inputs(2, 3, 16);
        assert_eq!(model.forward(&inputs, &batch).dims(), [2, 4, 16]);
    }

    #[test]
    fn test_long_input_is_interpolated_back() {
        // 20 > 16 takes the truncate-then-interpolate branch; the batch
        // dimension must survive it.
        let device = Default::default();
        let model: TimesNet<TestBackend> = small_config().init(&device);

        let (inputs, batch) = inputs(2, 3, 20);
        assert_eq!(model.forward(&inputs, &batch).dims(), [2, 4, 20]);
    }

    #[test]
    fn test_deeper_stack_keeps_shape() {
        let device = Default::default();
        let model: TimesNet<TestBackend> = TimesNetConfig::new(3, 16, 6)
            .with_d_model(8)
            .with_d_ff(12)
            .with_depth(3)
            .with_num_kernels(2)
            .with_top_k(2)
            .init(&device);

        let (inputs, batch) = inputs(2, 3, 16);
        assert_eq!(model.forward(&inputs, &batch).dims(), [2, 6, 16]);
    }

    #[test]
    fn test_encode_trait_matches_forward_shape() {
        let device = Default::default();
        let model: TimesNet<TestBackend> = small_config().init(&device);

        let (inputs, batch) = inputs(1, 3, 16);
        let out = SignalEncoder::encode(&model, &inputs, &batch);
        assert_eq!(out.dims(), [1, 4, 16]);
    }
}
