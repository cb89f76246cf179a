//! Required transmit power from a link budget

use serde::{Deserialize, Serialize};

use crate::common::{check_finite, check_positive, check_result};
use crate::utils::{db_to_linear, linear_to_db};
use crate::Error;

/// Boltzmann constant (dBW/K/Hz)
pub const BOLTZMANN_DBW: f64 = -228.6;

/// Parameters for link-budget evaluation (all logarithmic quantities in dB)
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBudgetParams {
    /// System noise temperature (K)
    pub temp: f64,
    /// Data rate (bit/s)
    pub data_rate: f64,
    /// Receiver noise figure (dB)
    pub noise_figure: f64,
    /// Eb/N0 required for the target error rate (dB)
    pub required_eb_no: f64,
    /// Fade margin (dB)
    pub fade_margin: f64,
    /// Path loss (dB)
    pub path_loss: f64,
    /// Other losses (dB)
    pub other_losses: f64,
    /// Transmit antenna gain (dBi)
    pub tx_gain: f64,
    /// Receive antenna gain (dBi)
    pub rx_gain: f64,
}

/// Result of link-budget evaluation
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBudgetResults {
    /// Noise power in the signal bandwidth (dBW)
    pub noise_power: f64,
    /// Receiver sensitivity (dBW)
    pub sensitivity: f64,
    /// Required received power including fade margin (dBW)
    pub required_rx_power: f64,
    /// Required transmit power (dBW)
    pub required_tx_power_dbw: f64,
    /// Required transmit power (W)
    pub required_tx_power_w: f64,
    /// Narrative summary of the result
    pub explanation: String,
}

/// Checks validity of link-budget parameters.
fn check_link_budget_params(params: &LinkBudgetParams) -> Result<(), Error> {
    check_positive("temp", params.temp)?;
    check_positive("dataRate", params.data_rate)?;
    for (name, value) in [
        ("noiseFigure", params.noise_figure),
        ("requiredEbNo", params.required_eb_no),
        ("fadeMargin", params.fade_margin),
        ("pathLoss", params.path_loss),
        ("otherLosses", params.other_losses),
        ("txGain", params.tx_gain),
        ("rxGain", params.rx_gain),
    ] {
        check_finite(name, value)?;
    }
    Ok(())
}

/// Returns required transmit power and intermediate link-budget quantities.
///
/// # Errors
///
/// Returns an error if `temp` or `data_rate` is not positive, if any other parameter is not
/// finite, or if a computed power overflows.
///
/// # Examples
///
/// ```
/// use telcalc::link_budget::{self, LinkBudgetParams};
///
/// let params = LinkBudgetParams {
///     temp: 290.0,
///     data_rate: 1e6,
///     noise_figure: 5.0,
///     required_eb_no: 10.0,
///     fade_margin: 3.0,
///     path_loss: 120.0,
///     other_losses: 2.0,
///     tx_gain: 10.0,
///     rx_gain: 10.0,
/// };
/// let results = link_budget::evaluate(&params)?;
/// assert!((results.noise_power + 143.976).abs() < 1e-3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn evaluate(params: &LinkBudgetParams) -> Result<LinkBudgetResults, Error> {
    check_link_budget_params(params)?;
    let noise_power =
        BOLTZMANN_DBW + linear_to_db(params.temp) + linear_to_db(params.data_rate);
    let sensitivity = noise_power + params.noise_figure + params.required_eb_no;
    let required_rx_power = sensitivity + params.fade_margin;
    let required_tx_power_dbw = required_rx_power + params.path_loss + params.other_losses
        - params.tx_gain
        - params.rx_gain;
    let required_tx_power_w = db_to_linear(required_tx_power_dbw);
    for (name, value) in [
        ("noisePower", noise_power),
        ("sensitivity", sensitivity),
        ("requiredRxPower", required_rx_power),
        ("requiredTxPowerDbw", required_tx_power_dbw),
        ("requiredTxPowerW", required_tx_power_w),
    ] {
        check_result(name, value)?;
    }
    let explanation = format!(
        "The noise power for a {:.2} K system at {:.2} Mbps is {:.2} dBW, so the receiver \
         sensitivity is {:.2} dBW and, with a {:.2} dB fade margin, the required received power \
         is {:.2} dBW. Accounting for {:.2} dB of path loss, {:.2} dB of other losses and \
         {:.2} dBi of combined antenna gain, the transmitter must deliver {:.2} dBW ({:.2} W).",
        params.temp,
        params.data_rate / 1e6,
        noise_power,
        sensitivity,
        params.fade_margin,
        required_rx_power,
        params.path_loss,
        params.other_losses,
        params.tx_gain + params.rx_gain,
        required_tx_power_dbw,
        required_tx_power_w
    );
    Ok(LinkBudgetResults {
        noise_power,
        sensitivity,
        required_rx_power,
        required_tx_power_dbw,
        required_tx_power_w,
        explanation,
    })
}

#[cfg(test)]
mod tests_of_functions {
    use float_eq::assert_float_eq;

    use super::*;

    fn params_for_test() -> LinkBudgetParams {
        LinkBudgetParams {
            temp: 290.0,
            data_rate: 1e6,
            noise_figure: 5.0,
            required_eb_no: 10.0,
            fade_margin: 3.0,
            path_loss: 120.0,
            other_losses: 2.0,
            tx_gain: 10.0,
            rx_gain: 10.0,
        }
    }

    #[test]
    fn test_check_link_budget_params() {
        assert!(check_link_budget_params(&params_for_test()).is_ok());
        let params = LinkBudgetParams {
            temp: 0.0,
            ..params_for_test()
        };
        assert!(check_link_budget_params(&params).is_err());
        let params = LinkBudgetParams {
            data_rate: -1.0,
            ..params_for_test()
        };
        assert!(check_link_budget_params(&params).is_err());
        let params = LinkBudgetParams {
            path_loss: f64::INFINITY,
            ..params_for_test()
        };
        assert!(check_link_budget_params(&params).is_err());
    }

    #[test]
    fn test_evaluate() {
        let results = evaluate(&params_for_test()).unwrap();
        let noise_power = -228.6 + 10.0 * 290f64.log10() + 60.0;
        assert_float_eq!(results.noise_power, noise_power, abs <= 1e-12);
        assert_float_eq!(results.sensitivity, noise_power + 15.0, abs <= 1e-12);
        assert_float_eq!(results.required_rx_power, noise_power + 18.0, abs <= 1e-12);
        assert_float_eq!(
            results.required_tx_power_dbw,
            noise_power + 18.0 + 122.0 - 20.0,
            abs <= 1e-9
        );
        assert!(results.explanation.contains("-143.98 dBW"));
        assert!(results.explanation.contains("1.00 Mbps"));
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_tx_power_watts() {
        let results = evaluate(&params_for_test()).unwrap();
        assert_eq!(
            results.required_tx_power_w,
            10f64.powf(results.required_tx_power_dbw / 10.0)
        );
    }

    #[test]
    fn test_path_loss_additivity() {
        let base = evaluate(&params_for_test()).unwrap();
        for extra_db in [0.5, 3.0, 17.25, -6.0] {
            let params = LinkBudgetParams {
                path_loss: params_for_test().path_loss + extra_db,
                ..params_for_test()
            };
            let results = evaluate(&params).unwrap();
            assert_float_eq!(
                results.required_tx_power_dbw - base.required_tx_power_dbw,
                extra_db,
                abs <= 1e-9
            );
        }
    }

    #[test]
    fn test_evaluate_overflow() {
        let params = LinkBudgetParams {
            path_loss: 4000.0,
            ..params_for_test()
        };
        let err = evaluate(&params).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("requiredTxPowerW"));
        let params = LinkBudgetParams {
            path_loss: f64::MAX,
            other_losses: f64::MAX,
            ..params_for_test()
        };
        assert!(evaluate(&params)
            .unwrap_err()
            .to_string()
            .contains("requiredTxPowerDbw"));
    }
}
