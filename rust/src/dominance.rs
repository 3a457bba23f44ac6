//! Strict dominance between performance vectors.

/// A relation deciding whether one performance vector dominates another.
///
/// Implementations must describe a strict partial order: irreflexive and
/// transitive (`a > b` and `b > c` imply `a > c`). A relation with cycles is
/// reported as [`crate::SelectionError::CycleDetected`]. A relation that is
/// not transitive can yield more pairwise incomparable devices than chains
/// and is reported as [`crate::SelectionError::NotTransitive`].
pub trait DominanceOracle {
    fn dominates(&self, a: &[f64], b: &[f64]) -> bool;
}

/// Default relation: `a` wins strictly in every coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrictDominance;

impl DominanceOracle for StrictDominance {
    #[inline]
    fn dominates(&self, a: &[f64], b: &[f64]) -> bool {
        dominates(a, b)
    }
}

impl<F> DominanceOracle for F
where
    F: Fn(&[f64], &[f64]) -> bool,
{
    #[inline]
    fn dominates(&self, a: &[f64], b: &[f64]) -> bool {
        self(a, b)
    }
}

/// Returns true iff `a[i] > b[i]` for every coordinate.
///
/// Equal values or NaN in any coordinate rule dominance out. Both slices must
/// have the same length.
#[inline]
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len(), "performance vectors differ in length");
    a.iter().zip(b).all(|(x, y)| x > y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_in_every_coordinate() {
        assert!(dominates(&[3.0, 3.0], &[2.0, 2.0]));
        assert!(!dominates(&[2.0, 2.0], &[3.0, 3.0]));
        assert!(!dominates(&[5.0, 1.0], &[3.0, 3.0]));
        assert!(!dominates(&[3.0, 3.0], &[5.0, 1.0]));
    }

    #[test]
    fn test_tie_in_one_coordinate_disqualifies() {
        assert!(!dominates(&[3.0, 2.0], &[2.0, 2.0]));
        assert!(!dominates(&[1.0, 1.0], &[1.0, 1.0]));
    }

    #[test]
    fn test_nan_never_dominates() {
        assert!(!dominates(&[f64::NAN, 5.0], &[1.0, 1.0]));
        assert!(!dominates(&[5.0, 5.0], &[f64::NAN, 1.0]));
    }

    #[test]
    fn test_closure_oracle() {
        let first_only = |a: &[f64], b: &[f64]| a[0] > b[0];
        assert!(first_only.dominates(&[2.0, 0.0], &[1.0, 9.0]));
        assert!(!StrictDominance.dominates(&[2.0, 0.0], &[1.0, 9.0]));
    }
}
