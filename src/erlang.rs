//! Erlang-B blocking probability and required-channel search

use serde::{Deserialize, Serialize};

use crate::common::{check_nonnegative, check_positive};
use crate::Error;

/// Largest channel count examined by [`required_channels`]
pub const MAX_CHANNELS: u32 = 1000;

/// Parameters for Erlang-B evaluation
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErlangParams {
    /// Offered traffic (Erlangs)
    pub traffic: f64,
    /// Number of channels
    pub channels: f64,
    /// Target blocking probability for the required-channel search
    pub max_blocking: f64,
}

/// Result of Erlang-B evaluation
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErlangResults {
    /// Blocking probability with the given number of channels
    pub blocking_probability: f64,
    /// Smallest number of channels meeting the target blocking probability
    pub required_channels: u32,
    /// Whether the search found a channel count within [`MAX_CHANNELS`]
    pub search_converged: bool,
    /// Narrative summary of the result
    pub explanation: String,
}

/// Outcome of the required-channel search
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub enum ChannelSearch {
    /// Smallest channel count meeting the target
    Found(u32),
    /// Target not met by [`MAX_CHANNELS`] channels
    Capped(u32),
}

impl ChannelSearch {
    /// Returns the channel count held in the variant.
    #[must_use]
    pub fn channels(self) -> u32 {
        match self {
            ChannelSearch::Found(n) | ChannelSearch::Capped(n) => n,
        }
    }
}

/// Returns `n!`, or the sentinel `-1.0` for negative `n`.
///
/// The result overflows to infinity for `n > 170`.
#[must_use]
pub fn factorial(n: i64) -> f64 {
    if n < 0 {
        return -1.0;
    }
    let mut result = 1f64;
    let mut i = 2;
    while i <= n {
        #[allow(clippy::cast_precision_loss)]
        let factor = i as f64;
        result *= factor;
        i += 1;
    }
    result
}

/// Returns Erlang-B blocking probability by direct evaluation of the factorial ratio
/// `(A^N / N!) / sum_{i=0}^{N} A^i / i!`.
///
/// Powers and factorials overflow for channel counts beyond about 170, after which the ratio
/// becomes `NaN`; [`blocking_probability`] should be preferred.
///
/// # Errors
///
/// Returns an error if any factorial in the ratio is not positive.
pub fn blocking_probability_direct(traffic: f64, channels: u32) -> Result<f64, Error> {
    let mut sum = 0.0;
    let mut last_term = 0.0;
    for i in 0 ..= channels {
        let fact = factorial(i64::from(i));
        if fact <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Factorial of {i} is not positive"
            )));
        }
        #[allow(clippy::cast_possible_wrap)]
        let term = traffic.powi(i as i32) / fact;
        sum += term;
        last_term = term;
    }
    Ok(last_term / sum)
}

/// Returns Erlang-B blocking probability using the recursion
/// `B(0) = 1`, `B(n) = A * B(n-1) / (n + A * B(n-1))`.
///
/// Zero offered traffic is never blocked, so the result is `0.0` for `traffic == 0.0` at every
/// channel count. Once `B(n)` underflows to `0.0` it stays there, so the recursion stops early.
///
/// # Examples
///
/// ```
/// use telcalc::erlang;
///
/// let blocking = erlang::blocking_probability(10.0, 15);
/// assert!((blocking - 0.0365).abs() < 1e-4);
/// ```
#[must_use]
pub fn blocking_probability(traffic: f64, channels: u32) -> f64 {
    if traffic == 0.0 {
        return 0.0;
    }
    let mut blocking = 1.0;
    for n in 1 ..= channels {
        if blocking == 0.0 {
            break;
        }
        blocking = next_blocking(traffic, blocking, n);
    }
    blocking
}

/// Returns `B(n)` given `B(n-1)`.
fn next_blocking(traffic: f64, prev: f64, n: u32) -> f64 {
    traffic * prev / (f64::from(n) + traffic * prev)
}

/// Returns the smallest channel count `c >= 1` with `B(traffic, c) <= max_blocking`, searching up
/// to [`MAX_CHANNELS`].
#[must_use]
pub fn required_channels(traffic: f64, max_blocking: f64) -> ChannelSearch {
    let mut blocking = if traffic == 0.0 { 0.0 } else { 1.0 };
    for channels in 1 ..= MAX_CHANNELS {
        blocking = next_blocking(traffic, blocking, channels);
        if blocking <= max_blocking {
            return ChannelSearch::Found(channels);
        }
    }
    ChannelSearch::Capped(MAX_CHANNELS)
}

/// Checks validity of Erlang-B parameters and returns the channel count as an integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn check_erlang_params(params: &ErlangParams) -> Result<u32, Error> {
    check_nonnegative("traffic", params.traffic)?;
    check_nonnegative("channels", params.channels)?;
    if params.channels.fract() != 0.0 || params.channels > f64::from(u32::MAX) {
        return Err(Error::InvalidInput(format!(
            "channels must be a nonnegative integer (found {})",
            params.channels
        )));
    }
    check_positive("maxBlocking", params.max_blocking)?;
    if params.max_blocking > 1.0 {
        return Err(Error::InvalidInput(format!(
            "maxBlocking must not exceed 1 (found {})",
            params.max_blocking
        )));
    }
    Ok(params.channels as u32)
}

/// Returns narrative summary of an Erlang-B result.
fn explanation(params: &ErlangParams, blocking: f64, search: ChannelSearch) -> String {
    let mut text = format!(
        "With {:.2} Erlangs of offered traffic on {} channels, the probability that a call is \
         blocked is {:.2}%. ",
        params.traffic,
        params.channels,
        blocking * 100.0
    );
    match search {
        ChannelSearch::Found(n) => text.push_str(&format!(
            "To keep blocking at or below {:.2}%, at least {n} channels are required.",
            params.max_blocking * 100.0
        )),
        ChannelSearch::Capped(n) => text.push_str(&format!(
            "No channel count up to {n} keeps blocking at or below {:.2}%; the search stopped \
             at {n} channels and the result is approximate.",
            params.max_blocking * 100.0
        )),
    }
    text
}

/// Returns blocking probability, required channels, and narrative summary.
///
/// # Errors
///
/// Returns an error if `traffic` is negative, if `channels` is not a nonnegative integer, or if
/// `max_blocking` is not in `(0, 1]`.
pub fn evaluate(params: &ErlangParams) -> Result<ErlangResults, Error> {
    let channels = check_erlang_params(params)?;
    let blocking = blocking_probability(params.traffic, channels);
    let search = required_channels(params.traffic, params.max_blocking);
    if let ChannelSearch::Capped(n) = search {
        tracing::warn!(
            traffic = params.traffic,
            max_blocking = params.max_blocking,
            "Required-channel search stopped at {n} channels"
        );
    }
    Ok(ErlangResults {
        blocking_probability: blocking,
        required_channels: search.channels(),
        search_converged: matches!(search, ChannelSearch::Found(_)),
        explanation: explanation(params, blocking, search),
    })
}
