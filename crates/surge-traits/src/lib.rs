#![doc(issue_tracker_base_url = "https://github.com/factordynamics/surge/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the Surge momentum ranking engine.
//!
//! This crate provides the shared vocabulary of the workspace: the price and
//! score matrices, validated momentum parameters, the error type, `NaN`-aware
//! statistics, and the traits behind which data acquisition lives.

/// The version of the surge-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod params;
pub mod provider;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{Result, SurgeError};
pub use params::MomentumParameters;
pub use provider::{PriceProvider, UniverseProvider};
pub use types::{Date, PriceMatrix, ScoreMatrix, Symbol};
