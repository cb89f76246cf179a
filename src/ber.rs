//! Bit error rate of M-PSK modulation over an AWGN channel

use serde::{Deserialize, Serialize};

use crate::common::{check_finite, check_positive, modulation_order};
use crate::utils::{db_to_linear, erfc, linear_to_db, q_function};
use crate::Error;

/// BER above which the error rate is classified as high
const HIGH_BER_THRESHOLD: f64 = 0.01;

/// BER above which the error rate is classified as moderate
const MODERATE_BER_THRESHOLD: f64 = 1e-6;

/// Parameters for BER evaluation
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BerParams {
    /// Ratio (dB) of bit energy to noise power spectral density
    pub eb_no_db: f64,
    /// Number of constellation points (a power of two)
    pub modulation_order: f64,
}

/// Result of BER evaluation
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BerResults {
    /// Bit error rate
    pub ber: f64,
    /// Narrative summary of the result
    pub explanation: String,
}

/// Severity band for an error rate
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub enum Severity {
    /// `BER > 0.01`
    High,
    /// `1e-6 < BER <= 0.01`
    Moderate,
    /// `BER <= 1e-6`
    Low,
}

impl Severity {
    /// Returns the severity band for a given BER.
    #[must_use]
    pub fn from_ber(ber: f64) -> Self {
        if ber > HIGH_BER_THRESHOLD {
            Severity::High
        } else if ber > MODERATE_BER_THRESHOLD {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    /// Returns the narrative sentence for the band.
    fn message(self) -> &'static str {
        match self {
            Severity::High => {
                "This is a high error rate, indicating a poor quality signal, likely resulting in \
                 significant data loss. Increasing the Eb/No (signal power) is recommended."
            }
            Severity::Moderate => {
                "This is a moderate error rate. The connection would be functional but might \
                 require error correction codes for reliable data transmission."
            }
            Severity::Low => {
                "This is a low error rate, indicating a high-quality, reliable signal. Data \
                 transmission should be very stable."
            }
        }
    }
}

/// Returns the name of the M-PSK modulation with `modulation_order` constellation points.
///
/// Orders `2` and `4` are named `BPSK` and `QPSK`; every other order `M` is named `M-PSK`.
#[must_use]
pub fn modulation_name(modulation_order: u32) -> String {
    match modulation_order {
        2 => "BPSK".to_string(),
        4 => "QPSK".to_string(),
        m => format!("{m}-PSK"),
    }
}

/// Returns BER of M-PSK over an AWGN channel.
///
/// # Parameters
///
/// - `eb_over_n0`: Linear ratio of bit energy to noise power spectral density.
///
/// - `modulation_order`: Number of constellation points `M`. Only powers of two are meaningful;
///   the value is not checked here (see [`evaluate`]).
///
/// # Returns
///
/// - `ber`: For `M <= 4`, the exact value `Q(sqrt(2 * Eb/N0)) = 0.5 * erfc(sqrt(Eb/N0))`. For
///   larger `M`, the
///   nearest-neighbor symbol error rate `erfc(sqrt(k * Eb/N0) * sin(pi/M))` divided by the number
///   of bits per symbol `k = log2(M)` (Gray mapping).
///
/// # Examples
///
/// ```
/// use telcalc::ber;
///
/// let ber = ber::ber_mpsk(1.0, 2);
/// assert!((ber - 0.078_65).abs() < 1e-4);
/// ```
#[must_use]
pub fn ber_mpsk(eb_over_n0: f64, modulation_order: u32) -> f64 {
    if modulation_order <= 4 {
        return q_function((2.0 * eb_over_n0).sqrt());
    }
    let m = f64::from(modulation_order);
    let bits_per_sym = m.log2();
    let ser = erfc((bits_per_sym * eb_over_n0).sqrt() * (std::f64::consts::PI / m).sin());
    ser / bits_per_sym
}

/// Returns `value` in scientific notation with two decimals and a signed exponent, e.g.
/// `3.87e-6` or `0.00e+0`.
pub(crate) fn scientific(value: f64) -> String {
    let text = format!("{value:.2e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

/// Returns narrative summary of a BER result.
#[must_use]
pub fn explanation(ber: f64, eb_no_db: f64, modulation_order: u32) -> String {
    format!(
        "For a {} signal with an Eb/No of {:.1} dB, the calculated Bit Error Rate (BER) is \
         approximately {}. {}",
        modulation_name(modulation_order),
        eb_no_db,
        scientific(ber),
        Severity::from_ber(ber).message()
    )
}

/// Returns BER and its narrative summary for Eb/N0 given in dB.
///
/// # Errors
///
/// Returns an error if `eb_no_db` is not finite or if `modulation_order` is not a power of two
/// no less than `2`.
///
/// # Examples
///
/// ```
/// use telcalc::ber::{self, BerParams};
///
/// let results = ber::evaluate(&BerParams { eb_no_db: 10.0, modulation_order: 4.0 })?;
/// assert!((results.ber - 3.87e-6).abs() < 1e-8);
/// assert!(results.explanation.contains("QPSK"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn evaluate(params: &BerParams) -> Result<BerResults, Error> {
    check_finite("ebNoDb", params.eb_no_db)?;
    let order = modulation_order("modulationOrder", params.modulation_order)?;
    let ber = ber_mpsk(db_to_linear(params.eb_no_db), order);
    Ok(BerResults {
        ber,
        explanation: explanation(ber, params.eb_no_db, order),
    })
}

/// Returns BER and its narrative summary for a linear Eb/N0.
///
/// # Errors
///
/// Returns an error if `eb_no_linear` is not positive or if `modulation_order` is not a power of
/// two no less than `2`.
pub fn evaluate_linear(eb_no_linear: f64, modulation_order_value: f64) -> Result<BerResults, Error> {
    check_positive("ebNoLinear", eb_no_linear)?;
    let order = modulation_order("modulationOrder", modulation_order_value)?;
    let ber = ber_mpsk(eb_no_linear, order);
    Ok(BerResults {
        ber,
        explanation: explanation(ber, linear_to_db(eb_no_linear), order),
    })
}

#[cfg(test)]
mod tests_of_functions {
    use float_eq::assert_float_eq;

    use super::*;

    #[test]
    fn test_severity_from_ber() {
        assert_eq!(Severity::from_ber(0.5), Severity::High);
        assert_eq!(Severity::from_ber(0.010_000_1), Severity::High);
        assert_eq!(Severity::from_ber(0.01), Severity::Moderate);
        assert_eq!(Severity::from_ber(1.1e-6), Severity::Moderate);
        assert_eq!(Severity::from_ber(1e-6), Severity::Low);
        assert_eq!(Severity::from_ber(0.0), Severity::Low);
    }

    #[test]
    fn test_modulation_name() {
        assert_eq!(modulation_name(2), "BPSK");
        assert_eq!(modulation_name(4), "QPSK");
        assert_eq!(modulation_name(8), "8-PSK");
        assert_eq!(modulation_name(16), "16-PSK");
        assert_eq!(modulation_name(64), "64-PSK");
    }

    #[test]
    fn test_ber_mpsk() {
        // BPSK and QPSK share the same BER
        assert_float_eq!(ber_mpsk(1.0, 2), 0.078_649_6, abs <= 1e-7);
        assert_float_eq!(ber_mpsk(1.0, 4), ber_mpsk(1.0, 2), abs <= 1e-15);
        for eb_over_n0 in [0.1, 1.0, 4.0, 10.0] {
            assert_float_eq!(
                ber_mpsk(eb_over_n0, 2),
                0.5 * erfc(eb_over_n0.sqrt()),
                rmax <= 1e-12
            );
        }
        assert_float_eq!(ber_mpsk(10.0, 4), 3.872_108e-6, rmax <= 1e-4);
        // 8-PSK at 10 dB
        let expected = erfc((3.0 * 10f64).sqrt() * (std::f64::consts::PI / 8.0).sin()) / 3.0;
        assert_float_eq!(ber_mpsk(10.0, 8), expected, rmax <= 1e-12);
        // Higher orders are worse at the same Eb/N0
        assert!(ber_mpsk(10.0, 8) > ber_mpsk(10.0, 4));
        assert!(ber_mpsk(10.0, 16) > ber_mpsk(10.0, 8));
    }

    #[test]
    fn test_ber_mpsk_nonincreasing_in_snr() {
        for order in [2, 4, 8, 16, 32] {
            let mut prev = ber_mpsk(db_to_linear(-10.0), order);
            for n in 1 ..= 300 {
                let ber = ber_mpsk(db_to_linear(-10.0 + 0.1 * f64::from(n)), order);
                assert!(ber <= prev, "BER increased at order {order}, step {n}");
                prev = ber;
            }
        }
    }

    #[test]
    fn test_scientific() {
        assert_eq!(scientific(3.872_108e-6), "3.87e-6");
        assert_eq!(scientific(0.0), "0.00e+0");
        assert_eq!(scientific(0.2), "2.00e-1");
        assert_eq!(scientific(1.5), "1.50e+0");
        assert_eq!(scientific(12_000.0), "1.20e+4");
    }

    #[test]
    fn test_explanation_at_very_high_snr() {
        let results = evaluate(&BerParams {
            eb_no_db: 40.0,
            modulation_order: 2.0,
        })
        .unwrap();
        assert!(results.ber < 1e-300);
        assert!(results.explanation.contains("approximately 0.00e+0."));
        assert!(results.explanation.contains("low error rate"));
    }

    #[test]
    fn test_explanation() {
        let text = explanation(3.87e-6, 10.0, 4);
        assert!(text.starts_with("For a QPSK signal with an Eb/No of 10.0 dB"));
        assert!(text.contains("approximately 3.87e-6."));
        assert!(text.contains("moderate error rate"));
        assert!(explanation(0.2, 0.0, 2).contains("high error rate"));
        assert!(explanation(1e-9, 12.0, 8).contains("low error rate"));
    }

    #[test]
    fn test_evaluate() {
        // Invalid input
        let params = BerParams {
            eb_no_db: 10.0,
            modulation_order: 6.0,
        };
        assert!(evaluate(&params).is_err());
        let params = BerParams {
            eb_no_db: f64::NAN,
            modulation_order: 4.0,
        };
        assert!(evaluate(&params).is_err());
        // Valid input
        let params = BerParams {
            eb_no_db: 0.0,
            modulation_order: 2.0,
        };
        let results = evaluate(&params).unwrap();
        assert_float_eq!(results.ber, 0.0786, abs <= 1e-4);
        assert!(results.explanation.contains("BPSK"));
    }

    #[test]
    fn test_evaluate_linear() {
        assert!(evaluate_linear(0.0, 2.0).is_err());
        assert!(evaluate_linear(-1.0, 2.0).is_err());
        assert!(evaluate_linear(10.0, 5.0).is_err());
        let results = evaluate_linear(10.0, 4.0).unwrap();
        assert_float_eq!(results.ber, 3.872e-6, rmax <= 1e-3);
        assert!(results.explanation.contains("Eb/No of 10.0 dB"));
    }
}
