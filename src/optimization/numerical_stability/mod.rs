//! numerical_stability: keeping the search space numerically homogeneous.
//!
//! Purpose
//! -------
//! Registration parameter vectors mix quantities of very different magnitude
//! (rotation angles in radians, translations in millimetres). A single
//! learning rate or SPSA gain only makes sense once every dimension lives in
//! a comparable range. This module owns the per-dimension scale factors and
//! the pure transforms between native and scaled space.
//!
//! Key behaviors
//! -------------
//! - [`ScaleVector`] validates that every factor is finite and strictly
//!   positive and stays immutable afterwards.
//! - `scale`, `unscale` and `derivative_to_scaled` are pure functions; the
//!   composition with a cost function lives in
//!   [`crate::optimization::cost_function::scaled`].
//! - [`ScaleVector::rigid`] provides the default scales for rigid (Euler)
//!   transforms, boosting the rotation dimensions.
//!
//! Conventions
//! -----------
//! - scaled = native · s, native = scaled / s.
//! - This module never logs or touches global state.

pub mod scales;

pub use self::scales::ScaleVector;

pub mod prelude {
    pub use super::scales::ScaleVector;
}
