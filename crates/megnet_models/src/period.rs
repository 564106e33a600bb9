//! Dominant-period discovery via frequency analysis.

use burn::prelude::*;
use num_complex::Complex32;
use rustfft::FftPlanner;

/// Find the `k` dominant periodicities of a batch of sequences.
///
/// Computes the real-input DFT along the time axis, averages the amplitude
/// spectrum over batch and channels, zeroes the DC bin so the constant
/// component never wins, and picks the `k` strongest frequency bins. Each
/// bin maps to a period by integer division, `period = T / bin`; callers
/// pad the sequence when the period does not divide `T` evenly.
///
/// The spectrum is computed on the host, so the returned weights enter the
/// graph as constants on `x`'s device.
///
/// # Arguments
///
/// * `x` - Input tensor of shape `(B, T, C)`
/// * `k` - Number of periods to extract (clamped to the available bins)
///
/// # Returns
///
/// The selected periods, and a `(B, k)` tensor of channel-averaged
/// amplitudes at the selected bins, used downstream as raw (pre-softmax)
/// aggregation weights. Ties rank by ascending bin index; when `k` exceeds
/// the distinct nonzero bins the selection may include zero-amplitude bins.
pub fn dominant_periods<B: Backend>(x: &Tensor<B, 3>, k: usize) -> (Vec<usize>, Tensor<B, 2>) {
    let [batch, len, channels] = x.dims();
    let device = x.device();
    let values: Vec<f32> = x.to_data().to_vec().unwrap();

    let n_bins = len / 2 + 1;
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(len);

    // Channel-mean amplitude per (batch, bin).
    let mut amplitudes = vec![0.0f32; batch * n_bins];
    let mut buf = vec![Complex32::new(0.0, 0.0); len];
    for b in 0..batch {
        for c in 0..channels {
            for t in 0..len {
                buf[t] = Complex32::new(values[(b * len + t) * channels + c], 0.0);
            }
            fft.process(&mut buf);
            for f in 0..n_bins {
                amplitudes[b * n_bins + f] += buf[f].norm();
            }
        }
        for f in 0..n_bins {
            amplitudes[b * n_bins + f] /= channels as f32;
        }
    }

    // Batch-mean spectrum, DC excluded from the ranking.
    let mut spectrum = vec![0.0f32; n_bins];
    for b in 0..batch {
        for f in 0..n_bins {
            spectrum[f] += amplitudes[b * n_bins + f];
        }
    }
    for a in &mut spectrum {
        *a /= batch as f32;
    }
    spectrum[0] = 0.0;

    let mut order: Vec<usize> = (0..n_bins).collect();
    order.sort_by(|&a, &b| spectrum[b].total_cmp(&spectrum[a]).then(a.cmp(&b)));
    let selected: Vec<usize> = order.into_iter().take(k).collect();

    let periods: Vec<usize> = selected
        .iter()
        .map(|&f| if f == 0 { len } else { len / f })
        .collect();
    tracing::trace!("dominant periods {:?} from {} bins", periods, n_bins);

    let k = selected.len();
    let mut weights = vec![0.0f32; batch * k];
    for b in 0..batch {
        for (i, &f) in selected.iter().enumerate() {
            weights[b * k + i] = amplitudes[b * n_bins + f];
        }
    }

    let weights = Tensor::<B, 1>::from_floats(weights.as_slice(), &device).reshape([batch, k]);
    (periods, weights)
}
