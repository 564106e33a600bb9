//! Composed data embedding.

use burn::nn::{Dropout, DropoutConfig};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    EmbedStrategy, Frequency, PositionalEmbedding, TemporalEmbedding, TokenEmbedding,
};

/// Configuration for [`DataEmbedding`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEmbeddingConfig {
    /// Number of input channels per timestep.
    pub in_channels: usize,
    /// Model dimension.
    pub d_model: usize,
    /// Strategy for the temporal term.
    pub strategy: EmbedStrategy,
    /// Granularity of the calendar marks.
    pub freq: Frequency,
    /// Dropout rate applied to the summed embedding.
    pub dropout: f64,
    /// Longest sequence length served by the positional table.
    pub max_position: usize,
}

impl Default for DataEmbeddingConfig {
    fn default() -> Self {
        Self {
            in_channels: 1,
            d_model: 32,
            strategy: EmbedStrategy::Fixed,
            freq: Frequency::Hourly,
            dropout: 0.1,
            max_position: 5000,
        }
    }
}

impl DataEmbeddingConfig {
    /// Create a new config with the required dimensions.
    pub fn new(in_channels: usize, d_model: usize) -> Self {
        Self {
            in_channels,
            d_model,
            ..Default::default()
        }
    }

    /// Set the temporal embedding strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: EmbedStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the calendar-mark granularity.
    #[must_use]
    pub fn with_freq(mut self, freq: Frequency) -> Self {
        self.freq = freq;
        self
    }

    /// Set the dropout rate.
    #[must_use]
    pub fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }

    /// Set the positional table length.
    #[must_use]
    pub fn with_max_position(mut self, max_position: usize) -> Self {
        self.max_position = max_position;
        self
    }

    /// Initialize the embedding.
    pub fn init<B: Backend>(&self, device: &B::Device) -> DataEmbedding<B> {
        DataEmbedding {
            token: TokenEmbedding::new(self.in_channels, self.d_model, device),
            positional: PositionalEmbedding::new(self.d_model, self.max_position, device),
            temporal: TemporalEmbedding::new(self.d_model, self.strategy, self.freq, device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

/// Token + positional (+ optional temporal) embedding with dropout.
///
/// When no calendar marks are supplied the temporal term is left out of the
/// sum entirely rather than added as zeros.
#[derive(Module, Debug)]
pub struct DataEmbedding<B: Backend> {
    token: TokenEmbedding<B>,
    positional: PositionalEmbedding<B>,
    temporal: TemporalEmbedding<B>,
    dropout: Dropout,
}

impl<B: Backend> DataEmbedding<B> {
    /// Forward pass.
    ///
    /// # Arguments
    ///
    /// * `x` - Value tensor of shape `(B, T, C_in)`
    /// * `marks` - Optional calendar/time-feature tensor of shape `(B, T, F)`
    ///
    /// # Returns
    ///
    /// Embedded tensor of shape `(B, T, d_model)`.
    pub fn forward(&self, x: Tensor<B, 3>, marks: Option<Tensor<B, 3>>) -> Tensor<B, 3> {
        let len = x.dims()[1];
        let embedded = match marks {
            None => self.token.forward(x) + self.positional.forward(len),
            Some(marks) => {
                self.token.forward(x) + self.temporal.forward(marks) + self.positional.forward(len)
            }
        };
        self.dropout.forward(embedded)
    }
}
