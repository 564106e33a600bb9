//! Recording shape metadata.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Shape metadata for recording tensors.
///
/// Follows the convention `(B, C, T)`:
/// - `B`: Batch size (number of recording windows)
/// - `C`: Sensor channels
/// - `T`: Sequence length (time steps)
///
/// # Example
///
/// ```rust
/// use megnet_core::SignalShape;
///
/// let shape = SignalShape::new(16, 273, 361);
/// assert_eq!(shape.batch(), 16);
/// assert_eq!(shape.channels(), 273);
/// assert_eq!(shape.len(), 361);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalShape {
    batch: usize,
    channels: usize,
    len: usize,
}

impl SignalShape {
    /// Create a new SignalShape with the specified dimensions.
    #[must_use]
    pub const fn new(batch: usize, channels: usize, len: usize) -> Self {
        Self {
            batch,
            channels,
            len,
        }
    }

    /// Create a SignalShape from a slice of dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice doesn't contain exactly 3 elements.
    pub fn from_dims(dims: &[usize]) -> Result<Self> {
        if dims.len() != 3 {
            return Err(CoreError::DimensionError {
                expected: 3,
                got: dims.len(),
            });
        }
        Ok(Self::new(dims[0], dims[1], dims[2]))
    }

    /// Get the batch size.
    #[must_use]
    pub const fn batch(&self) -> usize {
        self.batch
    }

    /// Get the number of sensor channels.
    #[must_use]
    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// Get the sequence length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if this is an empty shape (any dimension is zero).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.batch == 0 || self.channels == 0 || self.len == 0
    }

    /// Get the total number of elements.
    #[must_use]
    pub const fn numel(&self) -> usize {
        self.batch * self.channels * self.len
    }

    /// Convert to an array.
    #[must_use]
    pub const fn as_array(&self) -> [usize; 3] {
        [self.batch, self.channels, self.len]
    }

    /// Create a new shape with a different number of channels.
    #[must_use]
    pub const fn with_channels(&self, channels: usize) -> Self {
        Self {
            batch: self.batch,
            channels,
            len: self.len,
        }
    }

    /// Create a new shape with a different sequence length.
    #[must_use]
    pub const fn with_len(&self, len: usize) -> Self {
        Self {
            batch: self.batch,
            channels: self.channels,
            len,
        }
    }
}

impl std::fmt::Display for SignalShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(B={}, C={}, T={})", self.batch, self.channels, self.len)
    }
}

impl From<[usize; 3]> for SignalShape {
    fn from([batch, channels, len]: [usize; 3]) -> Self {
        Self::new(batch, channels, len)
    }
}
