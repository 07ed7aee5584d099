//! Numeric primitives: statistics, number theory, random numbers.

use num_bigint::BigUint;
use rand::Rng;

use super::error::{FeatureError, FeatureResult};

/// Sum of a non-empty sequence.
pub fn sum(numbers: &[f64]) -> FeatureResult<f64> {
    non_empty(numbers, "sum")?;
    Ok(numbers.iter().sum())
}

/// Arithmetic mean of a non-empty sequence.
pub fn mean(numbers: &[f64]) -> FeatureResult<f64> {
    Ok(sum(numbers).map_err(|_| FeatureError::EmptySequence { op: "mean" })? / numbers.len() as f64)
}

pub fn min(numbers: &[f64]) -> FeatureResult<f64> {
    numbers
        .iter()
        .copied()
        .reduce(f64::min)
        .ok_or(FeatureError::EmptySequence { op: "min" })
}

pub fn max(numbers: &[f64]) -> FeatureResult<f64> {
    numbers
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or(FeatureError::EmptySequence { op: "max" })
}

/// Median; NaN values sort last.
pub fn median(numbers: &[f64]) -> FeatureResult<f64> {
    non_empty(numbers, "median")?;
    let mut sorted = numbers.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Population standard deviation.
pub fn std_dev(numbers: &[f64]) -> FeatureResult<f64> {
    let mean = mean(numbers).map_err(|_| FeatureError::EmptySequence { op: "std_dev" })?;
    let variance =
        numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / numbers.len() as f64;
    Ok(variance.sqrt())
}

pub fn sqrt(x: f64) -> FeatureResult<f64> {
    if x < 0.0 {
        Err(FeatureError::NegativeSqrt(x))
    } else {
        Ok(x.sqrt())
    }
}

/// `n!` as a decimal string of arbitrary length.
pub fn factorial(n: u64) -> String {
    (2..=n)
        .fold(BigUint::from(1u32), |acc, i| acc * i)
        .to_str_radix(10)
}

/// Trial division over odd divisors up to `sqrt(n)`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut i = 3u64;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Uniform float in `[0, 1)`.
pub fn random() -> f64 {
    rand::thread_rng().gen()
}

/// Uniform integer in `[lo, hi]`, both ends inclusive.
pub fn random_range(lo: i64, hi: i64) -> FeatureResult<i64> {
    if lo > hi {
        return Err(FeatureError::InvalidRange { lo, hi });
    }
    Ok(rand::thread_rng().gen_range(lo..=hi))
}

fn non_empty(numbers: &[f64], op: &'static str) -> FeatureResult<()> {
    if numbers.is_empty() {
        Err(FeatureError::EmptySequence { op })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_is_prime(n: u64) -> bool {
        n >= 2 && (2..n).all(|d| n % d != 0)
    }

    #[test]
    fn sum_and_mean_of_simple_sequences() {
        assert_eq!(sum(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), 15.0);
        assert_eq!(mean(&[10.0, 20.0, 30.0]).unwrap(), 20.0);
    }

    #[test]
    fn mean_equals_sum_over_len() {
        let samples: [&[f64]; 4] = [
            &[1.0],
            &[2.5, -1.5, 7.25],
            &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
            &[-100.0, 100.0, 42.0, 1e6],
        ];
        for xs in samples {
            let expected = sum(xs).unwrap() / xs.len() as f64;
            assert!((mean(xs).unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn sum_is_permutation_invariant() {
        let xs = [3.0, 1.5, -2.0, 8.25, 0.5, 13.0];
        let mut reversed = xs;
        reversed.reverse();
        let mut rotated = xs;
        rotated.rotate_left(2);
        let base = sum(&xs).unwrap();
        assert!((sum(&reversed).unwrap() - base).abs() < 1e-9);
        assert!((sum(&rotated).unwrap() - base).abs() < 1e-9);
    }

    #[test]
    fn empty_sequences_are_input_errors() {
        for err in [
            mean(&[]).unwrap_err(),
            sum(&[]).unwrap_err(),
            min(&[]).unwrap_err(),
            median(&[]).unwrap_err(),
        ] {
            assert!(err.is_input_error());
        }
        assert!(matches!(mean(&[]), Err(FeatureError::EmptySequence { op: "mean" })));
    }

    #[test]
    fn sqrt_rejects_only_negative_input() {
        assert_eq!(sqrt(16.0).unwrap(), 4.0);
        assert_eq!(sqrt(0.0).unwrap(), 0.0);
        assert!(matches!(sqrt(-1.0), Err(FeatureError::NegativeSqrt(_))));
    }

    #[test]
    fn factorial_small_values() {
        assert_eq!(factorial(0), "1");
        assert_eq!(factorial(1), "1");
        assert_eq!(factorial(5), "120");
        assert_eq!(factorial(20), "2432902008176640000");
        assert_eq!(factorial(20).len(), 19);
    }

    #[test]
    fn factorial_length_is_monotonic() {
        let mut previous = 0;
        for n in 0..200 {
            let len = factorial(n).len();
            assert!(len >= previous, "len({n}!) shrank");
            previous = len;
        }
        assert_eq!(factorial(100).len(), 158);
    }

    #[test]
    fn is_prime_known_values() {
        for n in [2, 3, 5, 17, 7919] {
            assert!(is_prime(n), "{n} is prime");
        }
        for n in [0, 1, 4, 9, 15, 7917] {
            assert!(!is_prime(n), "{n} is composite");
        }
    }

    #[test]
    fn is_prime_matches_trial_division_up_to_10000() {
        for n in 0..=10_000 {
            assert_eq!(is_prime(n), naive_is_prime(n), "mismatch at {n}");
        }
    }

    #[test]
    fn is_prime_handles_large_inputs() {
        assert!(is_prime(1_000_000_007));
        assert!(!is_prime(u64::MAX));
    }

    #[test]
    fn random_stays_in_unit_interval() {
        for _ in 0..1000 {
            let r = random();
            assert!((0.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn random_range_is_inclusive() {
        for _ in 0..1000 {
            let r = random_range(1, 100).unwrap();
            assert!((1..=100).contains(&r));
        }
        assert_eq!(random_range(7, 7).unwrap(), 7);
        assert!(random_range(5, 1).unwrap_err().is_input_error());
    }

    #[test]
    fn descriptive_statistics() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(min(&xs).unwrap(), 2.0);
        assert_eq!(max(&xs).unwrap(), 9.0);
        assert_eq!(median(&xs).unwrap(), 4.5);
        assert!((std_dev(&xs).unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
    }
}
