//! Peak throughput of an OFDM system organized in resource blocks

use serde::{Deserialize, Serialize};

use crate::common::{check_positive, check_result, modulation_order};
use crate::Error;

/// Parameters for OFDM throughput evaluation
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfdmParams {
    /// Modulation order (a power of two)
    pub mod_order: f64,
    /// Resource-block bandwidth (Hz)
    pub rb_bw: f64,
    /// Subcarrier spacing (Hz)
    pub subcarrier_spacing: f64,
    /// OFDM symbols per resource block
    pub symbols_per_rb: f64,
    /// Resource-block duration (s)
    pub rb_duration: f64,
    /// Number of resource blocks transmitted in parallel
    pub parallel_rbs: f64,
}

/// Result of OFDM throughput evaluation
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfdmResults {
    /// Bits carried by each modulation symbol
    pub bits_per_symbol: f64,
    /// Subcarriers in a resource block
    pub subcarriers_per_rb: f64,
    /// Bits carried by a resource block
    pub bits_per_rb: f64,
    /// Peak data rate (bit/s)
    pub max_data_rate: f64,
    /// Occupied bandwidth (Hz)
    pub total_bandwidth: f64,
    /// Peak spectral efficiency (bit/s/Hz)
    pub spectral_efficiency: f64,
    /// Narrative summary of the result
    pub explanation: String,
}

/// Checks validity of OFDM parameters and returns the modulation order as an integer.
fn check_ofdm_params(params: &OfdmParams) -> Result<u32, Error> {
    let order = modulation_order("modOrder", params.mod_order)?;
    check_positive("rbBw", params.rb_bw)?;
    check_positive("subcarrierSpacing", params.subcarrier_spacing)?;
    check_positive("symbolsPerRb", params.symbols_per_rb)?;
    check_positive("rbDuration", params.rb_duration)?;
    check_positive("parallelRbs", params.parallel_rbs)?;
    Ok(order)
}

/// Returns peak data rate and spectral efficiency of an OFDM system.
///
/// # Errors
///
/// Returns an error if `mod_order` is not a power of two no less than `2`, if any other
/// parameter is not positive, or if a computed rate overflows.
///
/// # Examples
///
/// ```
/// use telcalc::ofdm::{self, OfdmParams};
///
/// // LTE-like: 64-QAM-sized constellation, 12 subcarriers of 15 kHz, 7 symbols per 0.5 ms slot
/// let params = OfdmParams {
///     mod_order: 64.0,
///     rb_bw: 180e3,
///     subcarrier_spacing: 15e3,
///     symbols_per_rb: 7.0,
///     rb_duration: 0.5e-3,
///     parallel_rbs: 100.0,
/// };
/// let results = ofdm::evaluate(&params)?;
/// assert!((results.max_data_rate - 100.8e6).abs() < 1.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn evaluate(params: &OfdmParams) -> Result<OfdmResults, Error> {
    let order = check_ofdm_params(params)?;
    let bits_per_symbol = f64::from(order).log2();
    let subcarriers_per_rb = params.rb_bw / params.subcarrier_spacing;
    let bits_per_rb = bits_per_symbol * subcarriers_per_rb * params.symbols_per_rb;
    let max_data_rate = params.parallel_rbs * bits_per_rb / params.rb_duration;
    let total_bandwidth = params.parallel_rbs * params.rb_bw;
    let spectral_efficiency = max_data_rate / total_bandwidth;
    for (name, value) in [
        ("subcarriersPerRb", subcarriers_per_rb),
        ("bitsPerRb", bits_per_rb),
        ("maxDataRate", max_data_rate),
        ("totalBandwidth", total_bandwidth),
        ("spectralEfficiency", spectral_efficiency),
    ] {
        check_result(name, value)?;
    }
    let explanation = format!(
        "Each symbol carries {:.2} bits and each resource block holds {:.2} subcarriers over \
         {:.2} symbols, i.e. {:.2} bits per {:.2} microseconds. With {:.2} resource blocks in \
         parallel, the peak data rate is {:.2} Mbps over {:.2} MHz, a spectral efficiency of \
         {:.2} bps/Hz.",
        bits_per_symbol,
        subcarriers_per_rb,
        params.symbols_per_rb,
        bits_per_rb,
        params.rb_duration * 1e6,
        params.parallel_rbs,
        max_data_rate / 1e6,
        total_bandwidth / 1e6,
        spectral_efficiency
    );
    Ok(OfdmResults {
        bits_per_symbol,
        subcarriers_per_rb,
        bits_per_rb,
        max_data_rate,
        total_bandwidth,
        spectral_efficiency,
        explanation,
    })
}
