//! Monte Carlo estimate of BPSK bit error rate over an AWGN channel

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::check_finite;
use crate::{ber, utils, Error};

/// Largest number of bits accepted for one simulation
pub const MAX_SIM_BITS: u64 = 10_000_000;

/// Number of bits simulated by one parallel task
const BITS_PER_CHUNK: u64 = 10_000;

/// Parameters for BPSK-AWGN simulation
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimParams {
    /// Ratio (dB) of bit energy to noise power spectral density
    pub eb_no_db: f64,
    /// Number of bits to be transmitted
    pub num_bits: u64,
}

/// Results of BPSK-AWGN simulation
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimResults {
    /// Number of bits transmitted
    pub num_bits: u64,
    /// Number of bits received in error
    pub num_bit_errors: u64,
    /// Simulated bit error rate
    pub simulated_ber: f64,
    /// Closed-form bit error rate
    pub theoretical_ber: f64,
    /// Narrative summary of the result
    pub explanation: String,
}

/// Checks validity of simulation parameters.
fn check_sim_params(params: &SimParams) -> Result<(), Error> {
    check_finite("ebNoDb", params.eb_no_db)?;
    if params.num_bits == 0 || params.num_bits > MAX_SIM_BITS {
        return Err(Error::InvalidInput(format!(
            "numBits must be in the range [1, {MAX_SIM_BITS}] (found {})",
            params.num_bits
        )));
    }
    Ok(())
}

/// Returns number of bit errors in one chunk of BPSK-AWGN transmission.
#[allow(clippy::cast_possible_truncation)]
fn bit_errors_in_chunk(num_bits: u64, eb_no_db: f64) -> u64 {
    let mut rng = rand::rng();
    let bits = utils::random_bits(num_bits as usize, &mut rng);
    let bits_llr = utils::bpsk_awgn_channel(&bits, eb_no_db, &mut rng);
    let bits_hat = utils::bpsk_slicer(&bits_llr);
    utils::error_count(&bits_hat, &bits) as u64
}

/// Runs a BPSK-AWGN simulation and compares the result with the closed-form BER.
///
/// The bits are split into chunks that are simulated in parallel, each with its own thread-local
/// random number generator. The call blocks until all chunks are done.
///
/// # Errors
///
/// Returns an error if `eb_no_db` is not finite or if `num_bits` is not in
/// `[1, MAX_SIM_BITS]`.
///
/// # Examples
///
/// ```
/// use telcalc::sim::{self, SimParams};
///
/// let results = sim::run_bpsk_awgn_sim(&SimParams { eb_no_db: 0.0, num_bits: 100_000 })?;
/// assert!((results.simulated_ber - results.theoretical_ber).abs() < 0.01);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn run_bpsk_awgn_sim(params: &SimParams) -> Result<SimResults, Error> {
    check_sim_params(params)?;
    let num_chunks = params.num_bits.div_ceil(BITS_PER_CHUNK);
    let num_bit_errors: u64 = (0 .. num_chunks)
        .into_par_iter()
        .map(|chunk| {
            let first_bit = chunk * BITS_PER_CHUNK;
            let chunk_len = BITS_PER_CHUNK.min(params.num_bits - first_bit);
            bit_errors_in_chunk(chunk_len, params.eb_no_db)
        })
        .sum();
    let simulated_ber = num_bit_errors as f64 / params.num_bits as f64;
    let theoretical_ber = ber::ber_mpsk(utils::db_to_linear(params.eb_no_db), 2);
    tracing::debug!(
        num_bits = params.num_bits,
        num_bit_errors,
        "BPSK-AWGN simulation complete"
    );
    let explanation = format!(
        "Transmitting {} BPSK bits at an Eb/No of {:.1} dB produced {num_bit_errors} bit errors, \
         a simulated BER of {} against a theoretical BER of {}.",
        params.num_bits,
        params.eb_no_db,
        ber::scientific(simulated_ber),
        ber::scientific(theoretical_ber)
    );
    Ok(SimResults {
        num_bits: params.num_bits,
        num_bit_errors,
        simulated_ber,
        theoretical_ber,
        explanation,
    })
}
