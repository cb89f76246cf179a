//! Hexagonal-cell network sizing: cell count, traffic per cell and frequency-reuse cluster size

use serde::{Deserialize, Serialize};

use crate::common::{check_finite, check_nonnegative, check_positive, check_result};
use crate::utils::db_to_linear;
use crate::Error;

/// Number of first-tier co-channel interferers in a hexagonal layout
const NUM_INTERFERERS: f64 = 6.0;

/// Parameters for cellular sizing
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellularParams {
    /// Cell radius
    pub cell_radius: f64,
    /// Area to be covered (same length unit as `cell_radius`, squared)
    pub coverage_area: f64,
    /// Number of subscribers
    pub subscribers: f64,
    /// Calls per subscriber per hour
    pub calls_per_hour: f64,
    /// Mean call duration (minutes)
    pub call_duration: f64,
    /// Required signal-to-interference ratio (dB)
    pub required_sir: f64,
    /// Path loss exponent
    pub path_loss_exp: f64,
}

/// Result of cellular sizing
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellularResults {
    /// Area of one hexagonal cell
    pub cell_area: f64,
    /// Number of cells needed to cover the area
    pub num_cells: f64,
    /// Traffic offered by one subscriber (Erlangs)
    pub traffic_per_user: f64,
    /// Traffic offered by all subscribers (Erlangs)
    pub total_traffic: f64,
    /// Traffic offered per cell (Erlangs)
    pub traffic_per_cell: f64,
    /// Required signal-to-interference ratio (linear)
    pub sir_linear: f64,
    /// Frequency-reuse cluster size
    pub cluster_size: f64,
    /// Narrative summary of the result
    pub explanation: String,
}

/// Returns area of a regular hexagon with given circumradius.
#[must_use]
pub fn hexagon_area(radius: f64) -> f64 {
    1.5 * 3f64.sqrt() * radius * radius
}

/// Returns smallest cluster size meeting a required SIR with six first-tier interferers.
///
/// # Parameters
///
/// - `sir_linear`: Required signal-to-interference ratio (linear).
///
/// - `path_loss_exp`: Path loss exponent.
///
/// # Returns
///
/// - `cluster_size`: `ceil((6 * sir_linear)^(2 / path_loss_exp) / 3)`.
#[must_use]
pub fn cluster_size(sir_linear: f64, path_loss_exp: f64) -> f64 {
    ((NUM_INTERFERERS * sir_linear).powf(2.0 / path_loss_exp) / 3.0).ceil()
}

/// Checks validity of cellular sizing parameters.
fn check_cellular_params(params: &CellularParams) -> Result<(), Error> {
    check_positive("cellRadius", params.cell_radius)?;
    check_positive("coverageArea", params.coverage_area)?;
    check_nonnegative("subscribers", params.subscribers)?;
    check_nonnegative("callsPerHour", params.calls_per_hour)?;
    check_nonnegative("callDuration", params.call_duration)?;
    check_finite("requiredSir", params.required_sir)?;
    check_positive("pathLossExp", params.path_loss_exp)
}

/// Returns cell count, traffic per cell and cluster size for a cellular network.
///
/// # Errors
///
/// Returns an error if `cell_radius`, `coverage_area` or `path_loss_exp` is not positive, if
/// `subscribers`, `calls_per_hour` or `call_duration` is negative, if `required_sir` is not
/// finite, or if a computed quantity overflows.
///
/// # Examples
///
/// ```
/// use telcalc::cellular::{self, CellularParams};
///
/// let params = CellularParams {
///     cell_radius: 1.0,
///     coverage_area: 100.0,
///     subscribers: 10_000.0,
///     calls_per_hour: 1.0,
///     call_duration: 3.0,
///     required_sir: 18.0,
///     path_loss_exp: 4.0,
/// };
/// let results = cellular::evaluate(&params)?;
/// assert_eq!(results.cluster_size, 7.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn evaluate(params: &CellularParams) -> Result<CellularResults, Error> {
    check_cellular_params(params)?;
    let cell_area = hexagon_area(params.cell_radius);
    let num_cells = (params.coverage_area / cell_area).ceil();
    let traffic_per_user = params.calls_per_hour * params.call_duration / 60.0;
    let total_traffic = params.subscribers * traffic_per_user;
    let traffic_per_cell = total_traffic / num_cells;
    let sir_linear = db_to_linear(params.required_sir);
    let cluster_size = cluster_size(sir_linear, params.path_loss_exp);
    for (name, value) in [
        ("cellArea", cell_area),
        ("numCells", num_cells),
        ("trafficPerUser", traffic_per_user),
        ("totalTraffic", total_traffic),
        ("trafficPerCell", traffic_per_cell),
        ("sirLinear", sir_linear),
        ("clusterSize", cluster_size),
    ] {
        check_result(name, value)?;
    }
    let explanation = format!(
        "Each hexagonal cell of radius {:.2} covers {:.2} square units, so {num_cells} cells are \
         needed for {:.2} square units. Each subscriber offers {:.2} Erlangs, for {:.2} Erlangs \
         in total and {:.2} Erlangs per cell. Meeting an SIR of {:.2} dB ({:.2} linear) with a \
         path loss exponent of {:.2} requires a cluster size of {cluster_size}.",
        params.cell_radius,
        cell_area,
        params.coverage_area,
        traffic_per_user,
        total_traffic,
        traffic_per_cell,
        params.required_sir,
        sir_linear,
        params.path_loss_exp
    );
    Ok(CellularResults {
        cell_area,
        num_cells,
        traffic_per_user,
        total_traffic,
        traffic_per_cell,
        sir_linear,
        cluster_size,
        explanation,
    })
}
