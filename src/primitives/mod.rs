//! Core compute primitives.
//!
//! A dense row-major [`Matrix`] backs every quadratic form the compiler
//! produces, numeric or symbolic.

mod matrix;

pub use matrix::Matrix;
