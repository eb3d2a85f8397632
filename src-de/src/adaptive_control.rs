//! Self-adaptive control of the crossover rate and mutation factor.
//!
//! Each candidate draws its own `CR ~ N(mean_cr, 0.1)` and
//! `F ~ Cauchy(mean_f, 0.1)`. Parameters of accepted trials are collected in a
//! [`SuccessAccumulator`] and folded into the means once per generation:
//! `mean_cr` moves toward a running average of successful CR values,
//! `mean_f` toward the Lehmer mean `sum(F^2) / sum(F)` of successful F values.

use crate::deviates::Deviates;
use crate::error::{DEError, Result};

/// Standard deviation of the normal CR draw.
pub const CR_SCALE: f64 = 0.1;
/// Scale of the Cauchy F draw.
pub const F_SCALE: f64 = 0.1;
/// Upper bound on Cauchy redraws before giving up.
pub const MAX_CAUCHY_ATTEMPTS: usize = 10_000;

/// Crossover rate and mutation factor used for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialParams {
    pub cr: f64,
    pub f: f64,
}

/// Running means seeding the per-candidate parameter draws.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveController {
    /// Adaptation speed; zero makes the controller inert.
    c: f64,
    base: (f64, f64),
    mean_cr: f64,
    mean_f: f64,
}

impl AdaptiveController {
    pub fn new(cr: f64, f: f64, c: f64) -> Self {
        Self { c, base: (cr, f), mean_cr: cr, mean_f: f }
    }

    pub fn is_active(&self) -> bool {
        self.c > 0.0
    }

    pub fn mean_cr(&self) -> f64 {
        self.mean_cr
    }

    pub fn mean_f(&self) -> f64 {
        self.mean_f
    }

    /// Parameters for the next candidate.
    ///
    /// Inert controllers return the base values without touching `deviates`.
    pub fn draw<D: Deviates + ?Sized>(&self, deviates: &mut D) -> Result<TrialParams> {
        if !self.is_active() {
            return Ok(TrialParams { cr: self.base.0, f: self.base.1 });
        }

        let cr = deviates.normal(self.mean_cr, CR_SCALE).clamp(0.0, 1.0);

        for _ in 0..MAX_CAUCHY_ATTEMPTS {
            let f = deviates.cauchy(self.mean_f, F_SCALE).min(1.0);
            if f > 0.0 {
                return Ok(TrialParams { cr, f });
            }
        }
        Err(DEError::MutationDrawExhausted { attempts: MAX_CAUCHY_ATTEMPTS, mean_f: self.mean_f })
    }

    /// Fold one generation of successes into the means.
    ///
    /// No-op when the controller is inert or nothing was accepted.
    pub fn update(&mut self, successes: &SuccessAccumulator) {
        if !self.is_active() || successes.good_f == 0.0 {
            return;
        }
        let c = self.c;
        self.mean_cr = (1.0 - c) * self.mean_cr + c * successes.good_cr;
        self.mean_f = (1.0 - c) * self.mean_f + c * (successes.good_f2 / successes.good_f);
    }
}

/// Statistics of accepted trials within one generation.
///
/// Must be fed in candidate-index order: `good_cr` adds `cr / count` with the
/// count at the time of insertion, so the order changes the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuccessAccumulator {
    pub count: usize,
    pub good_cr: f64,
    pub good_f: f64,
    pub good_f2: f64,
}

impl SuccessAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, params: TrialParams) {
        self.count += 1;
        self.good_cr += params.cr / self.count as f64;
        self.good_f += params.f;
        self.good_f2 += params.f * params.f;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deviates::SeededDeviates;

    /// Replays scripted normal/Cauchy draws.
    struct Scripted {
        normals: Vec<f64>,
        cauchys: Vec<f64>,
    }

    impl Deviates for Scripted {
        fn uniform(&mut self) -> f64 {
            0.5
        }
        fn normal(&mut self, _mean: f64, _sd: f64) -> f64 {
            self.normals.remove(0)
        }
        fn cauchy(&mut self, _location: f64, _scale: f64) -> f64 {
            if self.cauchys.is_empty() { -1.0 } else { self.cauchys.remove(0) }
        }
        fn distinct_indices(&mut self, _pool: usize, count: usize, _exclude: usize) -> Vec<usize> {
            (0..count).collect()
        }
        fn index(&mut self, _n: usize) -> usize {
            0
        }
    }

    #[test]
    fn test_inert_controller_uses_base_values() {
        let ctl = AdaptiveController::new(0.7, 0.5, 0.0);
        let mut a = SeededDeviates::seeded(1);
        let mut b = SeededDeviates::seeded(1);
        let p = ctl.draw(&mut a).unwrap();
        assert_eq!(p, TrialParams { cr: 0.7, f: 0.5 });
        // no deviates consumed
        assert_eq!(a.uniform(), b.uniform());
    }

    #[test]
    fn test_draw_clamps_and_rejects() {
        let ctl = AdaptiveController::new(0.5, 0.5, 0.1);
        let mut d = Scripted { normals: vec![1.7], cauchys: vec![-0.3, 0.0, 2.5] };
        let p = ctl.draw(&mut d).unwrap();
        assert_eq!(p.cr, 1.0);
        // -0.3 and 0.0 are rejected, 2.5 is clamped to 1
        assert_eq!(p.f, 1.0);

        let mut d = Scripted { normals: vec![-0.2], cauchys: vec![0.4] };
        let p = ctl.draw(&mut d).unwrap();
        assert_eq!(p, TrialParams { cr: 0.0, f: 0.4 });
    }

    #[test]
    fn test_draw_gives_up_after_cap() {
        let ctl = AdaptiveController::new(0.5, 0.5, 0.1);
        let mut d = Scripted { normals: vec![0.5], cauchys: vec![] };
        let err = ctl.draw(&mut d).unwrap_err();
        assert!(matches!(err, DEError::MutationDrawExhausted { attempts: MAX_CAUCHY_ATTEMPTS, .. }));
    }

    #[test]
    fn test_draws_stay_in_range() {
        let ctl = AdaptiveController::new(0.9, 0.8, 0.1);
        let mut d = SeededDeviates::seeded(77);
        for _ in 0..2000 {
            let p = ctl.draw(&mut d).unwrap();
            assert!((0.0..=1.0).contains(&p.cr));
            assert!(p.f > 0.0 && p.f <= 1.0);
        }
    }

    #[test]
    fn test_accumulator_incremental_cr() {
        let mut acc = SuccessAccumulator::new();
        acc.record(TrialParams { cr: 0.6, f: 0.5 });
        acc.record(TrialParams { cr: 0.8, f: 1.0 });
        acc.record(TrialParams { cr: 0.3, f: 0.25 });
        assert_eq!(acc.count, 3);
        let expected_cr = 0.6 / 1.0 + 0.8 / 2.0 + 0.3 / 3.0;
        assert!((acc.good_cr - expected_cr).abs() < 1e-15);
        assert!((acc.good_f - 1.75).abs() < 1e-15);
        assert!((acc.good_f2 - (0.25 + 1.0 + 0.0625)).abs() < 1e-15);
    }

    #[test]
    fn test_update_lehmer_mean() {
        let mut ctl = AdaptiveController::new(0.5, 0.5, 0.2);
        let mut acc = SuccessAccumulator::new();
        acc.record(TrialParams { cr: 0.9, f: 0.5 });
        acc.record(TrialParams { cr: 0.7, f: 1.0 });
        ctl.update(&acc);

        let good_cr = 0.9 + 0.7 / 2.0;
        let lehmer = (0.25 + 1.0) / 1.5;
        assert!((ctl.mean_cr() - (0.8 * 0.5 + 0.2 * good_cr)).abs() < 1e-12);
        assert!((ctl.mean_f() - (0.8 * 0.5 + 0.2 * lehmer)).abs() < 1e-12);
    }

    #[test]
    fn test_update_skipped_without_successes_or_when_inert() {
        let mut ctl = AdaptiveController::new(0.5, 0.5, 0.2);
        ctl.update(&SuccessAccumulator::new());
        assert_eq!((ctl.mean_cr(), ctl.mean_f()), (0.5, 0.5));

        let mut inert = AdaptiveController::new(0.5, 0.5, 0.0);
        let mut acc = SuccessAccumulator::new();
        acc.record(TrialParams { cr: 1.0, f: 1.0 });
        inert.update(&acc);
        assert_eq!((inert.mean_cr(), inert.mean_f()), (0.5, 0.5));
    }
}
