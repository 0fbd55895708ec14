//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Get the signed angular distance between two angles given in degrees.
///
/// The result is the shortest rotation taking `a` onto `b`, in the range
/// [-180, 180]. Inputs do not need to be normalised.
pub fn get_ang_dist_deg<T>(a: T, b: T) -> T
where
    T: Float
{
    wrapped_dist(a, b, T::from(360.0).unwrap())
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Shortest signed distance from `a` to `b` on a circle of circumference
/// `period`.
fn wrapped_dist<T>(a: T, b: T, period: T) -> T
where
    T: Float
{
    let c = rem_euclid(a - b, period);
    let d = rem_euclid(b - a, period);

    if c < d {
        -c
    }
    else {
        d
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_ang_dist_deg() {
        assert_eq!(get_ang_dist_deg(350f64, 0f64), 10f64);
        assert_eq!(get_ang_dist_deg(0f64, 350f64), -10f64);
        assert_eq!(get_ang_dist_deg(90f64, 75f64), -15f64);
        assert_eq!(get_ang_dist_deg(-90f64, 270f64), 0f64);
        assert_eq!(get_ang_dist_deg(720f64, 5f64), 5f64);
    }

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 4095f64), (1f64, 10f64), 0f64), 1f64);
        assert_eq!(lin_map((0f64, 4095f64), (1f64, 10f64), 4095f64), 10f64);
        assert_eq!(lin_map((0f64, 10f64), (-1f64, 1f64), 5f64), 0f64);
    }
}
