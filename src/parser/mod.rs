//! C-ADL Parser
//!
//! Deliberately shallow: the only structure pulled out of a model file is
//! its probability distribution declarations. Everything else in the
//! document is left alone.

pub mod distribution;
pub mod number;

pub use distribution::{DistributionMatch, distribution_at, scan_distributions};
pub use number::{format_probability, parse_probability};
