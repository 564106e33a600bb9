//! Model input records.

use burn::prelude::*;

use crate::error::{CoreError, Result};
use crate::shape::SignalShape;

/// Per-modality input tensors for one batch of recordings.
///
/// A recording session can expose several modalities; the encoders in this
/// workspace consume only the magnetometer signal, so the record carries a
/// single required `meg` field of shape `(B, C, T)`. Additional modalities
/// become new named fields rather than a dynamic map, keeping the consumed
/// surface explicit.
#[derive(Debug, Clone)]
pub struct ModalityInputs<B: Backend> {
    meg: Tensor<B, 3>,
}

impl<B: Backend> ModalityInputs<B> {
    /// Create inputs from a `(B, C, T)` magnetometer tensor.
    pub fn new(meg: Tensor<B, 3>) -> Self {
        Self { meg }
    }

    /// Get the magnetometer tensor.
    #[must_use]
    pub const fn meg(&self) -> &Tensor<B, 3> {
        &self.meg
    }

    /// Get the shape metadata of the magnetometer tensor.
    #[must_use]
    pub fn shape(&self) -> SignalShape {
        self.meg.dims().into()
    }

    /// Get the batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.meg.dims()[0]
    }

    /// Get the device the inputs are on.
    pub fn device(&self) -> B::Device {
        self.meg.device()
    }
}

/// Per-batch recording metadata.
///
/// Carries the subject identity of each batch element. The core encoder
/// never reads it directly; it is handed to the optional channel-merger and
/// subject-adapter collaborators.
#[derive(Debug, Clone)]
pub struct RecordingBatch<B: Backend> {
    subject_index: Tensor<B, 1, Int>,
}

impl<B: Backend> RecordingBatch<B> {
    /// Create a batch record from per-element subject ids.
    pub fn new(subject_index: Tensor<B, 1, Int>) -> Self {
        Self { subject_index }
    }

    /// Create a batch record, checking that the subject ids match the
    /// batch size of `inputs`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ShapeMismatch`] if the number of subject ids
    /// differs from the input batch size.
    pub fn for_inputs(inputs: &ModalityInputs<B>, subject_index: Tensor<B, 1, Int>) -> Result<Self> {
        let n_subjects = subject_index.dims()[0];
        let batch_size = inputs.batch_size();
        if n_subjects != batch_size {
            return Err(CoreError::ShapeMismatch(format!(
                "{} subject ids for batch size {}",
                n_subjects, batch_size
            )));
        }
        Ok(Self { subject_index })
    }

    /// Get the per-element subject ids.
    #[must_use]
    pub const fn subject_index(&self) -> &Tensor<B, 1, Int> {
        &self.subject_index
    }

    /// Get the batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.subject_index.dims()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_modality_inputs_shape() {
        let device = Default::default();
        let meg = Tensor::<TestBackend, 3>::zeros([4, 8, 100], &device);
        let inputs = ModalityInputs::new(meg);

        assert_eq!(inputs.batch_size(), 4);
        assert_eq!(inputs.shape(), SignalShape::new(4, 8, 100));
    }

    #[test]
    fn test_recording_batch_for_inputs() {
        let device = Default::default();
        let meg = Tensor::<TestBackend, 3>::zeros([3, 8, 100], &device);
        let inputs = ModalityInputs::new(meg);

        let subjects = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 2], &device);
        let batch = RecordingBatch::for_inputs(&inputs, subjects).unwrap();
        assert_eq!(batch.batch_size(), 3);

        let wrong = Tensor::<TestBackend, 1, Int>::from_ints([0, 1], &device);
        assert!(RecordingBatch::for_inputs(&inputs, wrong).is_err());
    }
}
