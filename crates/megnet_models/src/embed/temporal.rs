//! Calendar and time-feature embeddings.
//!
//! Three interchangeable strategies for encoding the time of observation,
//! selected at construction: fixed sinusoidal tables per calendar field,
//! learned tables with the same indexing, or a single linear projection of
//! continuous time features.

use burn::nn::{Embedding, EmbeddingConfig, Linear, LinearConfig};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use super::sinusoid_table;

const MINUTE_SIZE: usize = 4;
const HOUR_SIZE: usize = 24;
const WEEKDAY_SIZE: usize = 7;
const DAY_SIZE: usize = 32;
const MONTH_SIZE: usize = 13;

/// Sampling granularity of the calendar marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// One observation per second.
    Secondly,
    /// One observation per minute.
    Minutely,
    /// One observation per hour.
    Hourly,
    /// One observation per day.
    Daily,
    /// One observation per business day.
    BusinessDaily,
    /// One observation per week.
    Weekly,
    /// One observation per month.
    Monthly,
    /// One observation per year.
    Annually,
}

impl Frequency {
    /// Number of continuous time features carried per step at this
    /// granularity, for the [`TimeFeatureEmbedding`] strategy.
    #[must_use]
    pub const fn time_feature_count(&self) -> usize {
        match self {
            Self::Secondly => 6,
            Self::Minutely => 5,
            Self::Hourly => 4,
            Self::Daily => 3,
            Self::BusinessDaily => 3,
            Self::Weekly => 2,
            Self::Monthly => 1,
            Self::Annually => 1,
        }
    }

    /// Whether calendar marks carry a minute-of-hour field.
    #[must_use]
    pub const fn has_minute_field(&self) -> bool {
        matches!(self, Self::Minutely)
    }
}

/// Strategy for encoding the time of observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbedStrategy {
    /// Non-learned sinusoidal table per calendar field.
    Fixed,
    /// Learned embedding table per calendar field.
    Learned,
    /// Linear projection of continuous time features.
    TimeFeature,
}

/// A non-learned sinusoidal embedding table indexed by field value.
#[derive(Module, Debug)]
pub struct FixedEmbedding<B: Backend> {
    table: Tensor<B, 2>,
}

impl<B: Backend> FixedEmbedding<B> {
    /// Create a fixed table with `vocab` rows of dimension `d_model`.
    pub fn new(vocab: usize, d_model: usize, device: &B::Device) -> Self {
        let table = Tensor::<B, 1>::from_floats(sinusoid_table(vocab, d_model).as_slice(), device)
            .reshape([vocab, d_model]);
        Self { table }
    }

    /// Look up `(B, T)` indices, returning `(B, T, d_model)`.
    pub fn forward(&self, indices: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch, len] = indices.dims();
        let d_model = self.table.dims()[1];
        self.table
            .clone()
            .select(0, indices.reshape([batch * len]))
            .reshape([batch, len, d_model])
    }
}

/// One calendar field's embedding, fixed or learned.
#[derive(Module, Debug)]
pub enum FieldEmbedding<B: Backend> {
    /// Non-learned sinusoidal table.
    Fixed(FixedEmbedding<B>),
    /// Learned table.
    Learned(Embedding<B>),
}

impl<B: Backend> FieldEmbedding<B> {
    fn new(strategy: EmbedStrategy, vocab: usize, d_model: usize, device: &B::Device) -> Self {
        match strategy {
            EmbedStrategy::Learned => {
                Self::Learned(EmbeddingConfig::new(vocab, d_model).init(device))
            }
            _ => Self::Fixed(FixedEmbedding::new(vocab, d_model, device)),
        }
    }

    /// Look up `(B, T)` indices, returning `(B, T, d_model)`.
    pub fn forward(&self, indices: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        match self {
            Self::Fixed(fixed) => fixed.forward(indices),
            Self::Learned(embed) => embed.forward(indices),
        }
    }
}

/// Summed per-field calendar embedding.
///
/// Marks arrive as `(B, T, F)` with fields ordered
/// `[month, day, weekday, hour, minute]` along the trailing axis; the
/// minute column is present only at minutely granularity. Each present
/// field is looked up in its own table and the results are summed; absent
/// fields contribute nothing.
#[derive(Module, Debug)]
pub struct CalendarEmbedding<B: Backend> {
    minute: Option<FieldEmbedding<B>>,
    hour: FieldEmbedding<B>,
    weekday: FieldEmbedding<B>,
    day: FieldEmbedding<B>,
    month: FieldEmbedding<B>,
}

impl<B: Backend> CalendarEmbedding<B> {
    /// Create per-field tables for the given strategy and granularity.
    pub fn new(
        d_model: usize,
        strategy: EmbedStrategy,
        freq: Frequency,
        device: &B::Device,
    ) -> Self {
        let minute = freq
            .has_minute_field()
            .then(|| FieldEmbedding::new(strategy, MINUTE_SIZE, d_model, device));
        Self {
            minute,
            hour: FieldEmbedding::new(strategy, HOUR_SIZE, d_model, device),
            weekday: FieldEmbedding::new(strategy, WEEKDAY_SIZE, d_model, device),
            day: FieldEmbedding::new(strategy, DAY_SIZE, d_model, device),
            month: FieldEmbedding::new(strategy, MONTH_SIZE, d_model, device),
        }
    }

    /// Forward pass: `(B, T, F)` float marks to `(B, T, d_model)`.
    pub fn forward(&self, marks: Tensor<B, 3>) -> Tensor<B, 3> {
        let marks = marks.int();
        let [batch, len, _] = marks.dims();
        let field = |i: usize| marks.clone().narrow(2, i, 1).reshape([batch, len]);

        let mut out = self.month.forward(field(0))
            + self.day.forward(field(1))
            + self.weekday.forward(field(2))
            + self.hour.forward(field(3));
        if let Some(minute) = &self.minute {
            out = out + minute.forward(field(4));
        }
        out
    }
}

/// Linear projection of continuous time features.
#[derive(Module, Debug)]
pub struct TimeFeatureEmbedding<B: Backend> {
    linear: Linear<B>,
}

impl<B: Backend> TimeFeatureEmbedding<B> {
    /// Create a bias-free projection from `freq`'s feature count to `d_model`.
    pub fn new(d_model: usize, freq: Frequency, device: &B::Device) -> Self {
        let linear = LinearConfig::new(freq.time_feature_count(), d_model)
            .with_bias(false)
            .init(device);
        Self { linear }
    }

    /// Forward pass: `(B, T, d_inp)` to `(B, T, d_model)`.
    pub fn forward(&self, marks: Tensor<B, 3>) -> Tensor<B, 3> {
        self.linear.forward(marks)
    }
}

/// Temporal embedding, dispatching on the configured strategy.
#[derive(Module, Debug)]
pub enum TemporalEmbedding<B: Backend> {
    /// Per-field calendar lookup (fixed or learned tables).
    Calendar(CalendarEmbedding<B>),
    /// Linear projection of continuous time features.
    TimeFeature(TimeFeatureEmbedding<B>),
}

impl<B: Backend> TemporalEmbedding<B> {
    /// Create the embedding selected by `strategy`.
    pub fn new(
        d_model: usize,
        strategy: EmbedStrategy,
        freq: Frequency,
        device: &B::Device,
    ) -> Self {
        match strategy {
            EmbedStrategy::TimeFeature => {
                Self::TimeFeature(TimeFeatureEmbedding::new(d_model, freq, device))
            }
            _ => Self::Calendar(CalendarEmbedding::new(d_model, strategy, freq, device)),
        }
    }

    /// Forward pass: `(B, T, F)` marks to `(B, T, d_model)`.
    pub fn forward(&self, marks: Tensor<B, 3>) -> Tensor<B, 3> {
        match self {
            Self::Calendar(calendar) => calendar.forward(marks),
            Self::TimeFeature(time_feature) => time_feature.forward(marks),
        }
    }
}
