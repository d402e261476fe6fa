//! Qubify: compile black-box pseudo-Boolean functions into QUBO form.
//!
//! A function `f: {0,1}ⁿ → ℝ` is evaluated on the `1 + n + n(n-1)/2`
//! binary vectors of Hamming weight at most two. Truncated Möbius inversion
//! turns those outputs into a constant, `n` linear and `n(n-1)/2` pairwise
//! coefficients, which are laid out as an upper-triangular matrix `Q` and an
//! offset `c` such that `f(x) = xᵀQx + c` whenever `f` is at most quadratic.
//!
//! # Quick Start
//!
//! ```
//! use qubify::prelude::*;
//!
//! let f = |x: &[u8]| {
//!     let (a, b) = (f64::from(x[0]), f64::from(x[1]));
//!     1.0 + 2.0 * a + 3.0 * b + 4.0 * a * b
//! };
//!
//! let compiler = SamplingCompiler::new();
//! let q = compiler.compile_numeric(&f, 2).unwrap();
//! assert_eq!(q.energy(&[1, 1]).unwrap(), 10.0);
//!
//! // Training samples never reveal cubic terms; test samples can.
//! assert!(compiler.verifier().verify(&f, &q));
//! ```
//!
//! # Modules
//!
//! - [`sampling`]: Canonical subset order, training and test samples
//! - [`compiler`]: Coefficient extraction and matrix assembly
//! - [`qubo`]: Quadratic forms and their energies
//! - [`scalar`]: Numeric and symbolic coefficient types
//! - [`verify`]: Empirical fidelity check on heavy samples
//! - [`penalty`]: Penalty weights for constrained problems
//! - [`search_space`]: Typed integer variables on bit strings
//! - [`config`]: Compiler configuration
//! - [`primitives`]: Dense matrix storage
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.

pub mod compiler;
pub mod config;
pub mod error;
pub mod penalty;
pub mod prelude;
pub mod primitives;
pub mod qubo;
pub mod sampling;
pub mod scalar;
pub mod search_space;
pub mod verify;

pub use compiler::{Coefficients, SamplingCompiler};
pub use config::CompilerConfig;
pub use error::{QubifyError, Result};
pub use primitives::Matrix;
pub use qubo::{CompiledQubo, Qubo};
pub use verify::FidelityVerifier;
