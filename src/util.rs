/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// assert_interval!(alpha, 0.0, 1.0);
/// ```
/// This will panic with the message "Invalid value for \`alpha\`. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Index of the first maximum, so ties resolve to the lowest index
///
/// **Panics** if `values` is empty
pub fn argmax(values: &[f32]) -> usize {
    assert!(!values.is_empty(), "Cannot take the argmax of an empty slice.");
    values
        .iter()
        .enumerate()
        .skip(1)
        .fold(0, |best, (i, &v)| if v > values[best] { i } else { best })
}

/// Largest value in a non-empty slice
pub fn max(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_first_max() {
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax(&[-1.0, -0.5]), 1);
    }

    #[test]
    fn max_functional() {
        assert_eq!(max(&[1.0, -2.0, 4.5]), 4.5);
    }

    #[test]
    #[should_panic(expected = "Invalid value for `x`")]
    fn assert_interval_panics() {
        let x = 1.5;
        assert_interval!(x, 0.0, 1.0);
    }
}
