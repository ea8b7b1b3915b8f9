use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An embedding vector as returned by the embedding model.
///
/// Values are stored exactly as received. Nothing in this crate normalizes
/// them, so the magnitude takes part in every score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    /// Raw dot product with another vector.
    ///
    /// Vectors of different length are a configuration problem (the
    /// embedding model changed without reindexing) and are reported as
    /// [`Error::InvalidDimension`] instead of being scored.
    #[inline]
    pub fn dot(&self, other: &Vector) -> Result<f32> {
        if self.dim() != other.dim() {
            return Err(Error::InvalidDimension {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(crate::simd::dot_product_simd(&self.data, &other.data))
    }

    /// Squared length, which is also the score of the vector against itself.
    #[inline]
    pub fn norm_squared(&self) -> f32 {
        crate::simd::norm_squared_simd(&self.data)
    }

    /// Copy scaled by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        Vector::new(self.data.iter().map(|x| x * factor).collect())
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Vector::new(data)
    }
}
