use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::deviates::Deviates;

/// How out-of-range trial elements are brought back into the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Clip to the violated bound.
    #[default]
    Clip,
    /// Redraw at random. A lower violation lands in `[lo, hi)`; an upper
    /// violation uses `lo - U * (hi - lo)` and therefore lands at or below
    /// `lo`, where the objective proxy scores it `+inf`.
    BounceBack,
    /// Symmetric redraw: lower violations as in `BounceBack`, upper
    /// violations land in `(lo, hi]` via `hi - U * (hi - lo)`.
    Reflect,
}

impl BoundaryPolicy {
    /// `BounceBack` when `bounce_back` is set, `Clip` otherwise.
    pub fn from_bounce_back(bounce_back: bool) -> Self {
        if bounce_back { BoundaryPolicy::BounceBack } else { BoundaryPolicy::Clip }
    }

    /// Whether a repaired element is guaranteed to lie inside `[lo, hi]`.
    pub fn is_feasible(self) -> bool {
        !matches!(self, BoundaryPolicy::BounceBack)
    }
}

/// Repair a single element `v` against `[lo, hi]`.
pub fn repair_element<D: Deviates + ?Sized>(
    v: f64,
    lo: f64,
    hi: f64,
    policy: BoundaryPolicy,
    deviates: &mut D,
) -> f64 {
    if v < lo {
        match policy {
            BoundaryPolicy::Clip => lo,
            BoundaryPolicy::BounceBack | BoundaryPolicy::Reflect => {
                lo + deviates.uniform() * (hi - lo)
            }
        }
    } else if v > hi {
        match policy {
            BoundaryPolicy::Clip => hi,
            BoundaryPolicy::BounceBack => lo - deviates.uniform() * (hi - lo),
            BoundaryPolicy::Reflect => hi - deviates.uniform() * (hi - lo),
        }
    } else {
        v
    }
}

/// Repair every element of `x` in place, in index order.
pub(crate) fn repair_bounds_inplace<D: Deviates + ?Sized>(
    x: &mut Array1<f64>,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    policy: BoundaryPolicy,
    deviates: &mut D,
) {
    for i in 0..x.len() {
        x[i] = repair_element(x[i], lower[i], upper[i], policy, deviates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deviates::SeededDeviates;
    use proptest::prelude::*;

    /// Deviates returning a fixed uniform value.
    struct FixedUniform(f64);

    impl Deviates for FixedUniform {
        fn uniform(&mut self) -> f64 {
            self.0
        }
        fn normal(&mut self, mean: f64, _sd: f64) -> f64 {
            mean
        }
        fn cauchy(&mut self, location: f64, _scale: f64) -> f64 {
            location
        }
        fn distinct_indices(&mut self, _pool: usize, count: usize, _exclude: usize) -> Vec<usize> {
            (0..count).collect()
        }
        fn index(&mut self, _n: usize) -> usize {
            0
        }
    }

    #[test]
    fn test_clip() {
        let mut d = FixedUniform(0.5);
        assert_eq!(repair_element(-7.0, -5.0, 5.0, BoundaryPolicy::Clip, &mut d), -5.0);
        assert_eq!(repair_element(9.0, -5.0, 5.0, BoundaryPolicy::Clip, &mut d), 5.0);
        assert_eq!(repair_element(1.5, -5.0, 5.0, BoundaryPolicy::Clip, &mut d), 1.5);
    }

    #[test]
    fn test_bounce_back_lower_violation_lands_in_range() {
        let mut d = FixedUniform(0.25);
        let v = repair_element(-7.0, -5.0, 5.0, BoundaryPolicy::BounceBack, &mut d);
        assert_eq!(v, -5.0 + 0.25 * 10.0);
    }

    #[test]
    fn test_bounce_back_upper_violation_is_asymmetric() {
        let mut d = FixedUniform(0.25);
        let v = repair_element(7.0, -5.0, 5.0, BoundaryPolicy::BounceBack, &mut d);
        // lo - U * (hi - lo): below the lower bound
        assert_eq!(v, -5.0 - 0.25 * 10.0);
        assert!(v < -5.0);
    }

    #[test]
    fn test_reflect_upper_violation_lands_in_range() {
        let mut d = FixedUniform(0.25);
        let v = repair_element(7.0, -5.0, 5.0, BoundaryPolicy::Reflect, &mut d);
        assert_eq!(v, 5.0 - 0.25 * 10.0);
        let v = repair_element(-7.0, -5.0, 5.0, BoundaryPolicy::Reflect, &mut d);
        assert_eq!(v, -5.0 + 0.25 * 10.0);
    }

    #[test]
    fn test_in_range_values_draw_nothing() {
        let mut a = SeededDeviates::seeded(11);
        let mut b = SeededDeviates::seeded(11);
        let mut x = Array1::from(vec![0.1, -0.2, 0.3]);
        let lower = Array1::from(vec![-1.0; 3]);
        let upper = Array1::from(vec![1.0; 3]);
        repair_bounds_inplace(&mut x, &lower, &upper, BoundaryPolicy::BounceBack, &mut a);
        assert_eq!(x, Array1::from(vec![0.1, -0.2, 0.3]));
        assert_eq!(a.uniform(), b.uniform());
    }

    #[test]
    fn test_from_bounce_back() {
        assert_eq!(BoundaryPolicy::from_bounce_back(true), BoundaryPolicy::BounceBack);
        assert_eq!(BoundaryPolicy::from_bounce_back(false), BoundaryPolicy::Clip);
        assert!(BoundaryPolicy::Clip.is_feasible());
        assert!(BoundaryPolicy::Reflect.is_feasible());
        assert!(!BoundaryPolicy::BounceBack.is_feasible());
    }

    proptest! {
        #[test]
        fn prop_feasible_policies_stay_in_box(
            v in -100.0f64..100.0,
            lo in -10.0f64..0.0,
            width in 0.0f64..10.0,
            seed in any::<u64>(),
        ) {
            let hi = lo + width;
            let mut d = SeededDeviates::seeded(seed);
            for policy in [BoundaryPolicy::Clip, BoundaryPolicy::Reflect] {
                let r = repair_element(v, lo, hi, policy, &mut d);
                prop_assert!(r >= lo && r <= hi, "{:?} gave {} outside [{}, {}]", policy, r, lo, hi);
            }
        }
    }
}
