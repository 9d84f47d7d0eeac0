//! Scaled cost function: composes a [`ScaleVector`] around any cost function.
//!
//! The optimizer only ever sees scaled coordinates. This wrapper converts a
//! scaled position to native space (`native = scaled / s`), delegates to the
//! wrapped function, and maps the derivative back (`grad / s`). Errors from
//! the wrapped function are returned untouched.
use crate::optimization::{
    cost_function::traits::CostFunction,
    errors::{OptError, OptResult},
    numerical_stability::ScaleVector,
    types::{Cost, Grad, Theta},
};
use std::borrow::Cow;

/// A cost function evaluated in scaled space.
///
/// With `scales == None` the transform is the identity and positions are
/// passed through without copying.
#[derive(Debug, Clone)]
pub struct ScaledCostFunction<F> {
    inner: F,
    scales: Option<ScaleVector>,
}

impl<F: CostFunction> ScaledCostFunction<F> {
    /// Wrap `inner` with the identity scaling.
    pub fn new(inner: F) -> Self {
        Self { inner, scales: None }
    }

    /// Wrap `inner` with the given scales.
    ///
    /// # Errors
    /// Returns [`crate::optimization::errors::OptError::ScaleDimMismatch`] if
    /// the scales do not cover `inner.number_of_parameters()` entries.
    pub fn with_scales(inner: F, scales: ScaleVector) -> OptResult<Self> {
        scales.check_dimension(inner.number_of_parameters())?;
        Ok(Self { inner, scales: Some(scales) })
    }

    /// Replace (or clear) the scales.
    ///
    /// # Errors
    /// Same dimension check as [`Self::with_scales`]; on error the previous
    /// scales are kept.
    pub fn set_scales(&mut self, scales: Option<ScaleVector>) -> OptResult<()> {
        if let Some(s) = &scales {
            s.check_dimension(self.inner.number_of_parameters())?;
        }
        self.scales = scales;
        Ok(())
    }

    pub fn scales(&self) -> Option<&ScaleVector> {
        self.scales.as_ref()
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn into_inner(self) -> F {
        self.inner
    }

    /// Map a native-space position into scaled space.
    ///
    /// # Errors
    /// [`OptError::PositionDimMismatch`] if `native` does not match the scales.
    pub fn to_scaled_parameters(&self, native: &Theta) -> OptResult<Theta> {
        match &self.scales {
            Some(s) => {
                check_position(s, native)?;
                Ok(s.scale(native))
            }
            None => Ok(native.clone()),
        }
    }

    /// Map a scaled-space position into native space.
    ///
    /// # Errors
    /// [`OptError::PositionDimMismatch`] if `scaled` does not match the scales.
    pub fn to_native_parameters(&self, scaled: &Theta) -> OptResult<Theta> {
        Ok(self.native(scaled)?.into_owned())
    }

    fn native<'a>(&self, scaled: &'a Theta) -> OptResult<Cow<'a, Theta>> {
        match &self.scales {
            Some(s) => {
                check_position(s, scaled)?;
                Ok(Cow::Owned(s.unscale(scaled)))
            }
            None => Ok(Cow::Borrowed(scaled)),
        }
    }

    fn derivative_to_scaled(&self, native_derivative: Grad) -> OptResult<Grad> {
        match &self.scales {
            Some(s) => {
                if native_derivative.len() != s.len() {
                    return Err(OptError::GradientDimMismatch {
                        expected: s.len(),
                        found: native_derivative.len(),
                    });
                }
                Ok(s.derivative_to_scaled(&native_derivative))
            }
            None => Ok(native_derivative),
        }
    }
}

impl<F: CostFunction> CostFunction for ScaledCostFunction<F> {
    fn number_of_parameters(&self) -> usize {
        self.inner.number_of_parameters()
    }

    fn value(&self, position: &Theta) -> OptResult<Cost> {
        self.inner.value(&*self.native(position)?)
    }

    fn derivative(&self, position: &Theta) -> OptResult<Grad> {
        let derivative = self.inner.derivative(&*self.native(position)?)?;
        self.derivative_to_scaled(derivative)
    }

    fn value_and_derivative(&self, position: &Theta) -> OptResult<(Cost, Grad)> {
        let (value, derivative) = self.inner.value_and_derivative(&*self.native(position)?)?;
        Ok((value, self.derivative_to_scaled(derivative)?))
    }
}

fn check_position(scales: &ScaleVector, position: &Theta) -> OptResult<()> {
    if position.len() != scales.len() {
        return Err(OptError::PositionDimMismatch { expected: scales.len(), found: position.len() });
    }
    Ok(())
}
