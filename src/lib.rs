//! This crate evaluates closed-form telecommunications engineering formulas and serves them over
//! a stateless HTTP/JSON API. The formula families are the bit error rate of M-PSK over an AWGN
//! channel, Erlang-B blocking probability with a required-channel search, the transmit power
//! required by a link budget, OFDM resource-block throughput, the bit-rate chain of a digital
//! communication system, and hexagonal cellular network sizing. Each evaluation returns its
//! numeric results together with a short narrative explanation.
//!
//! The numeric primitives shared by the formulas (complementary error function, Q-function, dB
//! conversions) live in [`utils`]. The closed-form BER can be cross-checked by Monte Carlo
//! simulation over a BPSK-AWGN channel (see [`sim`]).
//!
//! # Examples
//!
//! ```
//! use telcalc::erlang::{self, ErlangParams};
//!
//! let params = ErlangParams { traffic: 10.0, channels: 15.0, max_blocking: 0.02 };
//! let results = erlang::evaluate(&params)?;
//! assert_eq!(results.required_channels, 17);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

pub mod api;
pub mod ber;
pub mod cellular;
pub mod comm_system;
mod common;
mod config;
pub mod cors;
pub mod erlang;
pub mod link_budget;
pub mod ofdm;
pub mod sim;
pub mod utils;

pub use common::{Bit, Error};
pub use config::{ServerConfig, DEFAULT_PORT};
pub use cors::CorsPolicy;
