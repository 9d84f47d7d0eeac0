//! Per-dimension scaling between native and scaled parameter space.
//!
//! Registration parameters mix units (radians next to millimetres), so the
//! optimizer works in a scaled space where every dimension has a comparable
//! range. The convention is multiplicative:
//!
//! - scaled   = native · s
//! - native   = scaled / s
//! - ∂f/∂scaled = (∂f/∂native) / s
//!
//! The three maps are mutually consistent: if `g(y) = f(y / s)` then
//! `∇g(y) = ∇f(y / s) / s`.
use crate::optimization::{
    errors::{OptError, OptResult},
    types::{DEFAULT_ROTATION_SCALE, Grad, Theta},
};
use ndarray::Array1;

/// Strictly positive scale factors, one per parameter.
///
/// Construction validates every entry; once built a `ScaleVector` is
/// immutable, which keeps the scaling constant for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleVector {
    scales: Array1<f64>,
}

impl ScaleVector {
    /// Build a scale vector from explicit per-parameter factors.
    ///
    /// # Errors
    /// - [`OptError::EmptyParameterSpace`] if `scales` is empty.
    /// - [`OptError::InvalidScale`] for the first non-finite or non-positive entry.
    pub fn new(scales: Array1<f64>) -> OptResult<Self> {
        if scales.is_empty() {
            return Err(OptError::EmptyParameterSpace);
        }
        for (index, &value) in scales.iter().enumerate() {
            if !value.is_finite() {
                return Err(OptError::InvalidScale { index, value, reason: "Scales must be finite." });
            }
            if value <= 0.0 {
                return Err(OptError::InvalidScale {
                    index,
                    value,
                    reason: "Scales must be strictly positive.",
                });
            }
        }
        Ok(Self { scales })
    }

    /// Same factor for every parameter.
    pub fn uniform(dim: usize, value: f64) -> OptResult<Self> {
        Self::new(Array1::from_elem(dim, value))
    }

    /// Default scales for a rigid (Euler) transform.
    ///
    /// Parameter layout is rotations first, then translations: one rotation in
    /// 2-D (3 parameters total), three rotations in 3-D (6 parameters total).
    /// Rotations receive `rotation_scale` (default [`DEFAULT_ROTATION_SCALE`]),
    /// translations receive 1.
    ///
    /// # Errors
    /// - [`OptError::UnsupportedSpaceDimension`] unless `space_dimension` is 2 or 3.
    /// - [`OptError::InvalidScale`] if `rotation_scale` is not finite and positive.
    pub fn rigid(space_dimension: usize, rotation_scale: Option<f64>) -> OptResult<Self> {
        let rotations = match space_dimension {
            2 => 1,
            3 => 3,
            dimension => return Err(OptError::UnsupportedSpaceDimension { dimension }),
        };
        let n_params = rotations + space_dimension;
        let rotation_scale = rotation_scale.unwrap_or(DEFAULT_ROTATION_SCALE);
        let scales =
            Array1::from_shape_fn(n_params, |i| if i < rotations { rotation_scale } else { 1.0 });
        Self::new(scales)
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn as_array(&self) -> &Array1<f64> {
        &self.scales
    }

    /// Native → scaled: `native · s`.
    pub fn scale(&self, native: &Theta) -> Theta {
        native * &self.scales
    }

    /// Scaled → native: `scaled / s`.
    pub fn unscale(&self, scaled: &Theta) -> Theta {
        scaled / &self.scales
    }

    /// Native-space derivative → scaled-space derivative: `grad / s`.
    pub fn derivative_to_scaled(&self, native_derivative: &Grad) -> Grad {
        native_derivative / &self.scales
    }

    /// Check that the scales cover exactly `dim` parameters.
    ///
    /// # Errors
    /// Returns [`OptError::ScaleDimMismatch`] on a length mismatch.
    pub fn check_dimension(&self, dim: usize) -> OptResult<()> {
        if self.len() != dim {
            return Err(OptError::ScaleDimMismatch { expected: dim, found: self.len() });
        }
        Ok(())
    }
}
