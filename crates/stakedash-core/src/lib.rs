//! Core staking domain logic for the dashboard.
//!
//! This crate provides:
//! - Core domain types (`types` module)
//! - Planck/DOT conversion and formatting (`units` module)
//! - Validator records and sorting (`validator` and `sort` modules)
//! - Nominator and bags-list derivations (`nominator` and `bags` modules)
//! - The pending nomination set (`selection` module)
//! - The per-era validator cache (`cache` module)
//! - Era window helpers (`era` module)
//!
//! With the `config` feature enabled:
//! - Configuration management (`config` module)

pub mod bags;
pub mod cache;
pub mod era;
pub mod nominator;
pub mod selection;
pub mod sort;
pub mod types;
pub mod units;
pub mod validator;

#[cfg(feature = "config")]
pub mod config;

pub use bags::*;
pub use cache::*;
pub use era::*;
pub use nominator::*;
pub use selection::*;
pub use sort::*;
pub use types::*;
pub use units::*;
pub use validator::*;

#[cfg(feature = "config")]
pub use config::{AppConfig, ConfigError, NetworkConfig};
