//! Model traits.
//!
//! Defines the seam between encoder architectures and whatever harness
//! drives them, so downstream code can stay generic over the architecture.

use burn::prelude::*;

use crate::batch::{ModalityInputs, RecordingBatch};

/// Trait for brain-signal encoder models.
pub trait SignalEncoder<B: Backend> {
    /// Encode a batch of recordings.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Modality tensors; the `meg` field has shape `(B, C, T)`
    /// * `batch` - Recording metadata consumed by optional collaborators
    ///
    /// # Returns
    ///
    /// Output tensor of shape `(B, out_channels, T)`, where `T` matches the
    /// input sequence length.
    fn encode(&self, inputs: &ModalityInputs<B>, batch: &RecordingBatch<B>) -> Tensor<B, 3>;
}
