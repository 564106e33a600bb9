//! Integration tests for the TimesNet encoder.
//!
//! These tests run the full forward path on synthetic recordings,
//! including the collaborator wiring.

use std::sync::Arc;

use burn::prelude::*;
use burn_ndarray::NdArray;
use rand::Rng;

use megnet_core::{ModalityInputs, RecordingBatch, Seed, SignalEncoder, SignalShape};
use megnet_models::{ChannelMerger, SubjectAdapter, TimesNet, TimesNetConfig};

type TestBackend = NdArray<f32>;

/// Synthetic recording: a per-channel sinusoid plus seeded noise.
fn synthetic_recording(shape: SignalShape, period: usize) -> Tensor<TestBackend, 3> {
    let mut rng = Seed::new(42).derive("recording").to_rng();
    let [batch, channels, len] = shape.as_array();

    let mut values = Vec::with_capacity(shape.numel());
    for _ in 0..batch {
        for c in 0..channels {
            for t in 0..len {
                let phase = 2.0 * std::f32::consts::PI * t as f32 / period as f32;
                let v = (phase + c as f32).sin() + rng.gen::<f32>() * 0.05;
                values.push(v);
            }
        }
    }
    Tensor::<TestBackend, 1>::from_floats(values.as_slice(), &Default::default())
        .reshape([batch, channels, len])
}

fn recording_batch(batch: usize) -> RecordingBatch<TestBackend> {
    let subjects: Vec<i32> = (0..batch as i32).collect();
    RecordingBatch::new(Tensor::from_ints(subjects.as_slice(), &Default::default()))
}

/// Keeps the first `keep` channels, standing in for an attention merger.
#[derive(Debug)]
struct HeadChannels {
    keep: usize,
}

impl ChannelMerger<TestBackend> for HeadChannels {
    fn merge(
        &self,
        x: Tensor<TestBackend, 3>,
        _batch: &RecordingBatch<TestBackend>,
    ) -> Tensor<TestBackend, 3> {
        x.narrow(1, 0, self.keep)
    }

    fn merged_channels(&self) -> usize {
        self.keep
    }
}

/// Scales each element by a subject-dependent factor, width preserved.
#[derive(Debug)]
struct PerSubjectScale {
    channels: usize,
}

impl SubjectAdapter<TestBackend> for PerSubjectScale {
    fn adapt(
        &self,
        x: Tensor<TestBackend, 3>,
        subjects: Tensor<TestBackend, 1, Int>,
    ) -> Tensor<TestBackend, 3> {
        let scale = (subjects.float() + 1.0).reshape([x.dims()[0], 1, 1]);
        x * scale
    }

    fn adapted_channels(&self) -> usize {
        self.channels
    }
}

#[test]
fn test_forward_restores_short_and_long_lengths() {
    let device = Default::default();
    let config = TimesNetConfig::new(6, 32, 8)
        .with_d_model(8)
        .with_d_ff(8)
        .with_depth(2)
        .with_num_kernels(3)
        .with_top_k(2);
    let model: TimesNet<TestBackend> = config.init(&device);

    for len in [20, 32, 48] {
        let shape = SignalShape::new(2, 6, len);
        let inputs = ModalityInputs::new(synthetic_recording(shape, 8));
        let out = model.forward(&inputs, &recording_batch(2));
        assert_eq!(out.dims(), [2, 8, len]);
    }
}

#[test]
fn test_collaborators_drive_embedded_width() {
    let device = Default::default();
    let config = TimesNetConfig::new(6, 32, 8)
        .with_d_model(8)
        .with_d_ff(8)
        .with_depth(1)
        .with_num_kernels(2)
        .with_top_k(2);

    let merger: Arc<dyn ChannelMerger<TestBackend>> = Arc::new(HeadChannels { keep: 4 });
    let adapter: Arc<dyn SubjectAdapter<TestBackend>> = Arc::new(PerSubjectScale { channels: 4 });
    let model = config.init_with(&device, Some(merger), Some(adapter));

    let shape = SignalShape::new(3, 6, 32);
    let inputs = ModalityInputs::new(synthetic_recording(shape, 8));
    let out = model.forward(&inputs, &recording_batch(3));
    assert_eq!(out.dims(), [3, 8, 32]);
}

#[test]
fn test_encoder_trait_object() {
    let device = Default::default();
    let config = TimesNetConfig::new(4, 16, 4)
        .with_d_model(8)
        .with_d_ff(8)
        .with_depth(1)
        .with_num_kernels(2)
        .with_top_k(1);
    let model: TimesNet<TestBackend> = config.init(&device);
    let encoder: &dyn SignalEncoder<TestBackend> = &model;

    let shape = SignalShape::new(2, 4, 16);
    let inputs = ModalityInputs::new(synthetic_recording(shape, 4));
    let out = encoder.encode(&inputs, &recording_batch(2));
    assert_eq!(out.dims(), [2, 4, 16]);
}
