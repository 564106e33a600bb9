//! External collaborator contracts.
//!
//! Multi-subject, multi-layout datasets need preprocessing stages that this
//! crate deliberately does not implement: an attention-based channel merger
//! that maps heterogeneous sensor layouts onto a fixed set of channels, and
//! per-subject adaptation layers. Both own their parameters elsewhere; the
//! encoder only consumes their tensor contracts.

use burn::prelude::*;
use megnet_core::RecordingBatch;

/// Merges raw sensor channels into a fixed-width layout.
///
/// Implementations may use the batch metadata (e.g. subject identity) to
/// drive the merge, and may maintain side-channel regularization signals of
/// their own; neither is visible to the encoder.
pub trait ChannelMerger<B: Backend>: Send + Sync + std::fmt::Debug {
    /// Merge `(B, C, T)` input into `(B, merged_channels, T)`.
    fn merge(&self, x: Tensor<B, 3>, batch: &RecordingBatch<B>) -> Tensor<B, 3>;

    /// Channel width of the merged output.
    fn merged_channels(&self) -> usize;
}

/// Adapts the signal per recording subject.
///
/// The output width is the implementation's own configuration (project to
/// the input width, or to a hidden width); an implementation may also map
/// every subject to one shared transform.
pub trait SubjectAdapter<B: Backend>: Send + Sync + std::fmt::Debug {
    /// Adapt `(B, C, T)` input into `(B, adapted_channels, T)` using one
    /// subject id per batch element.
    fn adapt(&self, x: Tensor<B, 3>, subjects: Tensor<B, 1, Int>) -> Tensor<B, 3>;

    /// Channel width of the adapted output.
    fn adapted_channels(&self) -> usize;
}
