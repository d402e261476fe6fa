//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use qubify::prelude::*;
//! ```

pub use crate::compiler::{Coefficients, SamplingCompiler};
pub use crate::config::CompilerConfig;
pub use crate::error::{QubifyError, Result};
pub use crate::penalty::{PenaltyMethod, PenaltyWeight};
pub use crate::primitives::Matrix;
pub use crate::qubo::{CompiledQubo, Qubo};
pub use crate::scalar::{Expr, Scalar};
pub use crate::search_space::{Binarization, SearchSpace};
pub use crate::verify::FidelityVerifier;
