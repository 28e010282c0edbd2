//! Markov-chain analysis.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 analysis                         │
//! ├──────────────────────────────────────────────────┤
//! │  properties     - stochasticity, irreducibility, │
//! │                   periodicity, ergodicity        │
//! │  classification - absorbing/transient/recurrent, │
//! │                   fundamental matrix             │
//! │  stationary     - power iteration + eigenvector  │
//! │                   fallback                       │
//! └──────────────────────────────────────────────────┘
//! ```

mod classification;
mod properties;
mod stationary;

pub use classification::{
    classify_states, fundamental_matrix, AbsorbingState, RecurrentState, StateClassification,
    TransientState,
};
pub use properties::{
    analyze_properties, reachability, state_period, MarkovProperties, MAX_CYCLE_LENGTH,
};
pub use stationary::{
    dominant_left_eigenvector, stationary_distribution, StationaryConfig, StationaryMethod,
    StationaryResult,
};
