//! Bit-rate chain of a digital communication system: sampler, quantizer, source encoder, channel
//! encoder and burst transmission

use serde::{Deserialize, Serialize};

use crate::common::{check_nonnegative, check_positive, check_result};
use crate::Error;

/// Parameters for rate-chain evaluation
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommSystemParams {
    /// Analog signal bandwidth (Hz)
    pub bandwidth: f64,
    /// Bits per quantized sample
    pub quantizer_bits: f64,
    /// Source encoder compression rate (output bits per input bit)
    pub source_encoder_rate: f64,
    /// Channel encoder code rate (information bits per coded bit)
    pub channel_encoder_rate: f64,
    /// Bits per transmitted burst
    pub burst_size: f64,
}

/// Result of rate-chain evaluation
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommSystemResults {
    /// Nyquist sampling frequency (samples/s)
    pub sampling_frequency: f64,
    /// Quantizer output rate (bit/s)
    pub quantizer_rate: f64,
    /// Source encoder output rate (bit/s)
    pub source_encoder_out_rate: f64,
    /// Channel encoder output rate (bit/s)
    pub channel_encoder_out_rate: f64,
    /// Duration of a burst (s)
    pub burst_duration: f64,
    /// Narrative summary of the result
    pub explanation: String,
}

/// Checks validity of rate-chain parameters.
fn check_comm_system_params(params: &CommSystemParams) -> Result<(), Error> {
    check_positive("bandwidth", params.bandwidth)?;
    check_positive("quantizerBits", params.quantizer_bits)?;
    check_positive("sourceEncoderRate", params.source_encoder_rate)?;
    check_positive("channelEncoderRate", params.channel_encoder_rate)?;
    if params.channel_encoder_rate > 1.0 {
        return Err(Error::InvalidInput(format!(
            "channelEncoderRate must not exceed 1 (found {})",
            params.channel_encoder_rate
        )));
    }
    check_nonnegative("burstSize", params.burst_size)
}

/// Returns the bit rate at each stage of the chain and the resulting burst duration.
///
/// # Errors
///
/// Returns an error if `burst_size` is negative, if `channel_encoder_rate` is not in `(0, 1]`, if
/// any other parameter is not positive, or if a computed rate overflows.
pub fn evaluate(params: &CommSystemParams) -> Result<CommSystemResults, Error> {
    check_comm_system_params(params)?;
    let sampling_frequency = 2.0 * params.bandwidth;
    let quantizer_rate = sampling_frequency * params.quantizer_bits;
    let source_encoder_out_rate = quantizer_rate * params.source_encoder_rate;
    let channel_encoder_out_rate = source_encoder_out_rate / params.channel_encoder_rate;
    let burst_duration = params.burst_size / channel_encoder_out_rate;
    for (name, value) in [
        ("samplingFrequency", sampling_frequency),
        ("quantizerRate", quantizer_rate),
        ("sourceEncoderOutRate", source_encoder_out_rate),
        ("channelEncoderOutRate", channel_encoder_out_rate),
        ("burstDuration", burst_duration),
    ] {
        check_result(name, value)?;
    }
    let explanation = format!(
        "Sampling a {:.2} MHz signal at the Nyquist rate gives {:.2} Msps; {:.2}-bit \
         quantization produces {:.2} Mbps, the source encoder reduces this to {:.2} Mbps, and \
         the rate-{:.2} channel encoder raises it to {:.2} Mbps. A {:.2}-bit burst therefore \
         lasts {:.2} microseconds.",
        params.bandwidth / 1e6,
        sampling_frequency / 1e6,
        params.quantizer_bits,
        quantizer_rate / 1e6,
        source_encoder_out_rate / 1e6,
        params.channel_encoder_rate,
        channel_encoder_out_rate / 1e6,
        params.burst_size,
        burst_duration * 1e6
    );
    Ok(CommSystemResults {
        sampling_frequency,
        quantizer_rate,
        source_encoder_out_rate,
        channel_encoder_out_rate,
        burst_duration,
        explanation,
    })
}
