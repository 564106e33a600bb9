//! # megnet_core
//!
//! Core types for megnet, a frequency-domain encoder for multichannel
//! brain-signal recordings.
//!
//! This crate provides:
//! - [`SignalShape`] for recording tensor shape metadata
//! - [`ModalityInputs`] and [`RecordingBatch`] for model inputs
//! - [`SignalEncoder`] as the trait seam between models and training harnesses
//! - [`Seed`] for deterministic random number generation
//! - Error types and common utilities
//!
//! ## Shape Convention
//!
//! Recordings follow the convention `(B, C, T)`:
//! - `B`: Batch size (number of recording windows)
//! - `C`: Sensor channels
//! - `T`: Sequence length (time steps)
//!
//! ## Example
//!
//! ```rust
//! use megnet_core::{Seed, SignalShape};
//!
//! let seed = Seed::new(42);
//! let shape = SignalShape::new(16, 273, 361); // batch=16, channels=273, len=361
//! assert_eq!(shape.channels(), 273);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod batch;
mod error;
mod model_trait;
mod seed;
mod shape;

pub use batch::{ModalityInputs, RecordingBatch};
pub use error::{CoreError, Result};
pub use model_trait::SignalEncoder;
pub use seed::Seed;
pub use shape::SignalShape;
