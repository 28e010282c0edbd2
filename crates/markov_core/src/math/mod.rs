//! Linear algebra for transition matrices.
//!
//! - `linalg`: fallible wrappers over `nalgebra` decompositions
//! - `spectral`: the fault-isolated spectral property bundle

pub mod linalg;
pub mod spectral;

pub use spectral::{
    analyze_spectrum, EigenDecomposition, EigenvalueSummary, EigenvectorSummary, MatrixNorms,
    MatrixPower, SpectralProperties, SvdSummary, POWER_EXPONENTS,
};
