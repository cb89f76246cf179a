//! # Numeric primitives shared by the formula modules
//!
//! The [`erfc`] function approximates the complementary error function; [`q_function`] is the
//! Gaussian tail probability built on it; [`db_to_linear`] and [`linear_to_db`] convert power
//! ratios. The remaining functions support Monte Carlo simulation over a BPSK-AWGN channel:
//! [`random_bits`] draws random bits, [`bpsk_awgn_channel`] returns the LLR values at the channel
//! output, [`bpsk_slicer`] slices LLR values to bits, and [`error_count`] counts mismatches.
//!
//! # Examples
//!
//! ```
//! use telcalc::utils;
//!
//! let mut rng = rand::rng();
//! let bits = utils::random_bits(40, &mut rng);
//! let bits_llr = utils::bpsk_awgn_channel(&bits, 10.0, &mut rng);
//! let bits_hat = utils::bpsk_slicer(&bits_llr);
//! let err_count = utils::error_count(&bits_hat, &bits);
//! assert!(err_count <= bits.len());
//! assert!((utils::erfc(0.0) - 1.0).abs() < 1.2e-7);
//! ```

use rand::Rng;
use rand_distr::StandardNormal;

use crate::Bit;

/// Coefficients of the correction series in [`erfc`], lowest order first
const ERFC_COEFFS: [f64; 10] = [
    -1.265_512_23,
    1.000_023_68,
    0.374_091_96,
    0.096_784_18,
    -0.186_288_06,
    0.278_868_07,
    -1.135_203_98,
    1.488_515_87,
    -0.822_152_23,
    0.170_872_77,
];

/// Returns an approximation of the complementary error function.
///
/// The fractional error is below `1.2e-7` for all finite `x`. With `z = |x|` and
/// `t = 1 / (1 + z/2)`, the value for nonnegative arguments is `t * exp(-z^2 + P(t))`, where `P`
/// is a degree-9 polynomial evaluated by Horner's method; negative arguments use the reflection
/// `erfc(x) = 2 - erfc(-x)`.
///
/// # Examples
///
/// ```
/// use telcalc::utils::erfc;
///
/// assert!((erfc(1.0) - 0.157_299_2).abs() < 1e-7);
/// assert!((erfc(-1.0) + erfc(1.0) - 2.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = ERFC_COEFFS.iter().rev().fold(0.0, |acc, &c| acc * t + c);
    let value = t * (-z * z + poly).exp();
    if x >= 0.0 {
        value
    } else {
        2.0 - value
    }
}

/// Returns the tail probability `Q(x) = 0.5 * erfc(x / sqrt(2))` of the standard normal
/// distribution.
#[must_use]
pub fn q_function(x: f64) -> f64 {
    0.5 * erfc(x / std::f64::consts::SQRT_2)
}

/// Returns the linear power ratio corresponding to a value in dB.
#[must_use]
pub fn db_to_linear(value_db: f64) -> f64 {
    10f64.powf(value_db / 10.0)
}

/// Returns the value in dB corresponding to a linear power ratio.
#[must_use]
pub fn linear_to_db(value: f64) -> f64 {
    10.0 * value.log10()
}

/// Returns given number of random bits.
///
/// # Parameters
///
/// - `num_bits`: Number of random bits to be generated.
///
/// - `rng`: Random number generator to be used.
///
/// # Returns
///
/// - `bits`: Random bits.
pub fn random_bits<R: Rng>(num_bits: usize, rng: &mut R) -> Vec<Bit> {
    (0 .. num_bits)
        .map(|_| {
            if rng.random_bool(0.5) {
                Bit::One
            } else {
                Bit::Zero
            }
        })
        .collect()
}

/// Returns LLR values at BPSK-AWGN channel output corresponding to given input bits.
///
/// # Parameters
///
/// - `bits`: Bits to be transmitted over the BPSK-AWGN channel.
///
/// - `eb_over_n0_db`: Ratio (dB) of bit energy to noise power spectral density at the channel
///   output. Each BPSK symbol carries one bit, so with symbols `+1.0` and `-1.0` the noise
///   variance is `0.5 / 10f64.powf(0.1 * eb_over_n0_db)`.
///
/// - `rng`: Random number generator to be used.
///
/// # Returns
///
/// - `bits_llr`: Log-likelihood-ratio (LLR) values at the channel output, with positive values
///   indicating that `Zero` is more likely.
pub fn bpsk_awgn_channel<R: Rng>(bits: &[Bit], eb_over_n0_db: f64, rng: &mut R) -> Vec<f64> {
    let eb_over_n0 = db_to_linear(eb_over_n0_db);
    let noise_std = (0.5 / eb_over_n0).sqrt();
    bits.iter()
        .map(|b| match b {
            Bit::Zero => 1f64,
            Bit::One => -1f64,
        })
        .map(|x| 4.0 * eb_over_n0 * (x + noise_std * rng.sample::<f64, _>(StandardNormal)))
        .collect()
}

/// Returns BPSK slicer output: nonnegative values map to `Zero`, negative values to `One`.
#[must_use]
pub fn bpsk_slicer(syms: &[f64]) -> Vec<Bit> {
    syms.iter()
        .map(|&x| if x >= 0.0 { Bit::Zero } else { Bit::One })
        .collect()
}

/// Returns number of positions in which two sequences differ.
///
/// If the sequences are of different lengths, then the longer one is effectively truncated to the
/// length of the shorter one.
pub fn error_count<T: PartialEq>(seq: &[T], ref_seq: &[T]) -> usize {
    ref_seq
        .iter()
        .zip(seq.iter())
        .filter(|&(x, y)| x != y)
        .count()
}

#[cfg(test)]
mod tests_of_functions {
    use float_eq::assert_float_eq;

    use super::*;
    use Bit::{One, Zero};

    #[test]
    fn test_erfc() {
        assert_float_eq!(erfc(0.0), 1.0, abs <= 1.2e-7);
        assert_float_eq!(erfc(0.5), 0.479_500_122, abs <= 1.2e-7);
        assert_float_eq!(erfc(1.0), 0.157_299_207, abs <= 1.2e-7);
        assert_float_eq!(erfc(2.0), 4.677_734_98e-3, rmax <= 1.2e-7);
        assert_float_eq!(erfc(-1.0), 1.842_700_793, abs <= 1.2e-7);
        assert!(erfc(10.0) < 1e-40);
        assert!(erfc(30.0) >= 0.0);
        assert_float_eq!(erfc(-30.0), 2.0, abs <= 1e-12);
    }

    #[test]
    fn test_erfc_reflection() {
        for n in 0 .. 200 {
            let x = -5.0 + 0.05 * f64::from(n);
            assert_float_eq!(erfc(x) + erfc(-x), 2.0, abs <= 1e-12);
        }
    }

    #[test]
    fn test_erfc_decreasing() {
        let mut prev = erfc(-4.0);
        for n in 1 ..= 800 {
            let x = -4.0 + 0.01 * f64::from(n);
            let value = erfc(x);
            assert!(value < prev, "erfc not decreasing at {x}");
            prev = value;
        }
    }

    #[test]
    fn test_q_function() {
        assert_float_eq!(q_function(0.0), 0.5, abs <= 1e-7);
        assert_float_eq!(q_function(1.0), 0.158_655_254, abs <= 1e-7);
        assert_float_eq!(q_function(3.0), 1.349_898e-3, rmax <= 1e-6);
    }

    #[test]
    fn test_db_conversions() {
        assert_float_eq!(db_to_linear(0.0), 1.0, abs <= 1e-12);
        assert_float_eq!(db_to_linear(10.0), 10.0, abs <= 1e-12);
        assert_float_eq!(db_to_linear(-3.0), 0.501_187_234, abs <= 1e-9);
        assert_float_eq!(linear_to_db(100.0), 20.0, abs <= 1e-12);
        assert_float_eq!(linear_to_db(db_to_linear(7.3)), 7.3, abs <= 1e-12);
    }

    #[test]
    fn test_random_bits() {
        let mut rng = rand::rng();
        assert!(random_bits(0, &mut rng).is_empty());
        let num_bits = 10000;
        let bits = random_bits(num_bits, &mut rng);
        let num_zeros = bits.iter().filter(|&b| *b == Zero).count();
        let num_ones = bits.iter().filter(|&b| *b == One).count();
        assert!(num_zeros > 9 * num_bits / 20 && num_ones > 9 * num_bits / 20);
    }

    #[test]
    fn test_bpsk_awgn_channel() {
        let mut rng = rand::rng();
        assert!(bpsk_awgn_channel(&[], 0.0, &mut rng).is_empty());
        let eb_over_n0_db = 20f64;
        let num_bits = 10000;
        let bits = random_bits(num_bits, &mut rng);
        let bits_llr = bpsk_awgn_channel(&bits, eb_over_n0_db, &mut rng);
        let eb_over_n0 = db_to_linear(eb_over_n0_db);
        let noise_var_est = bits_llr
            .iter()
            .zip(bits)
            .map(|(y, b)| match b {
                Zero => y - 4.0 * eb_over_n0,
                One => y + 4.0 * eb_over_n0,
            })
            .map(|x| x * x)
            .sum::<f64>()
            / f64::from(u32::try_from(num_bits).unwrap());
        assert!(noise_var_est > 7.2 * eb_over_n0 && noise_var_est < 8.8 * eb_over_n0);
    }

    #[test]
    fn test_bpsk_slicer() {
        assert!(bpsk_slicer(&[]).is_empty());
        assert_eq!(bpsk_slicer(&[0.0, 0.01, -0.01]), [Zero, Zero, One]);
    }

    #[test]
    fn test_error_count() {
        assert_eq!(error_count(&[], &[One, Zero]), 0);
        let ref_seq = [One, Zero, Zero, One, One, One, Zero, Zero];
        let seq = [One, One, Zero, Zero, One, One, Zero, Zero, Zero, One];
        assert_eq!(error_count(&seq, &ref_seq), 2);
    }
}
