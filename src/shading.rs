//! Normal-to-character shading

use crate::error::{Error, Result};
use nalgebra::Vector3;

/// Maps a surface normal to one character of a brightness ramp.
///
/// Luminance is the normal's component toward the viewer (+z), clamped to
/// `[0, 1]`, so back-facing and empty cells fall on the first ramp entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Shader {
    ramp: Vec<char>,
}

impl Default for Shader {
    fn default() -> Self {
        Self {
            ramp: crate::ASCII_RAMP.chars().collect(),
        }
    }
}

impl Shader {
    /// Create a shader over a ramp ordered sparsest to densest
    pub fn new(ramp: &str) -> Result<Self> {
        let ramp: Vec<char> = ramp.chars().collect();
        if ramp.is_empty() {
            return Err(Error::invalid_param("ramp", "\"\"", "must contain at least one character"));
        }
        Ok(Self { ramp })
    }

    pub fn ramp(&self) -> &[char] {
        &self.ramp
    }

    /// Character drawn for cells no vertex reached
    pub fn blank(&self) -> char {
        self.ramp[0]
    }

    pub fn luminance(normal: &Vector3<f32>) -> f32 {
        normal.z.max(0.0).min(1.0)
    }

    pub fn shade(&self, normal: &Vector3<f32>) -> char {
        let last = self.ramp.len() - 1;
        let index = ((Self::luminance(normal) * last as f32).floor() as usize).min(last);
        self.ramp[index]
    }
}
