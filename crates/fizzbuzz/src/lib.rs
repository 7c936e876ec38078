//! Parameterized fizzbuzz sequence generation.
//!
//! A sequence covers an inclusive range of positive integers. Each number is
//! replaced by the token of every rule whose multiple divides it (fizz first, then
//! buzz), or written in decimal when no rule matches.
//!
//! # Example
//!
//! ```rust
//! use fizzbuzz::{Options, to_string};
//!
//! let options = Options::default().to(5);
//! assert_eq!(to_string(&options).unwrap(), "1,2,fizz,4,buzz");
//! ```

mod config;
mod error;
mod sequence;

// Public re-exports
pub use config::{Options, Rule};
pub use error::{FizzbuzzError, Result};
pub use sequence::{to_string, write};
