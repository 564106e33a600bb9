//! # megnet_models
//!
//! Encoder architectures for multichannel brain-signal recordings.
//!
//! The centerpiece is [`TimesNet`], a frequency-domain encoder that
//! discovers the dominant periodicities of each batch, folds the 1D signal
//! into 2D (period x repetition) grids per period, extracts multi-scale
//! features with inception-style 2D convolutions, and adaptively recombines
//! the per-period reconstructions.
//!
//! ## Components
//!
//! - [`embed`] - token, positional, and calendar/time-feature embeddings
//! - [`period`] - FFT-based dominant-period discovery
//! - [`InceptionBlock2d`] - multi-kernel 2D convolutional feature extractor
//! - [`TimesBlock`] - per-period fold/convolve/unfold with adaptive
//!   aggregation and a residual connection
//! - [`TimesNet`] - the top-level encoder, with optional channel-merger and
//!   subject-adapter collaborators wired in at construction
//!
//! ## Example
//!
//! ```rust,ignore
//! use megnet_core::{ModalityInputs, RecordingBatch};
//! use megnet_models::TimesNetConfig;
//!
//! let config = TimesNetConfig::new(273, 361, 1024);
//! let model = config.init::<Backend>(&device);
//! let out = model.forward(&inputs, &batch); // (B, 1024, T)
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collaborators;
pub mod embed;
mod inception;
pub mod period;
mod times_block;
mod timesnet;

pub use collaborators::{ChannelMerger, SubjectAdapter};
pub use embed::{
    CalendarEmbedding, DataEmbedding, DataEmbeddingConfig, EmbedStrategy, FieldEmbedding,
    FixedEmbedding, Frequency, PositionalEmbedding, TemporalEmbedding, TimeFeatureEmbedding,
    TokenEmbedding,
};
pub use inception::{InceptionBlock2d, InceptionBlock2dConfig};
pub use period::dominant_periods;
pub use times_block::{TimesBlock, TimesBlockConfig};
pub use timesnet::{TimesNet, TimesNetConfig};
