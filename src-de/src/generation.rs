//! One generation of the evolution loop.
//!
//! Every candidate builds its trial from the frozen previous population and
//! the best member known at the start of the sweep. Trials are scored in
//! index order, then a second pass over the outcomes does selection, feeds
//! the success accumulator and tracks the running best.

use ndarray::{Array1, Array2};

use crate::Strategy;
use crate::adaptive_control::{AdaptiveController, SuccessAccumulator, TrialParams};
use crate::apply_precision::apply_precision;
use crate::bounded_objective::BoundedObjective;
use crate::crossover_binomial::binomial_crossover;
use crate::deviates::Deviates;
use crate::error::Result;
use crate::history::GenerationRecord;
use crate::mutant_classic::mutant_classic;
use crate::repair_bounds::{BoundaryPolicy, repair_bounds_inplace};
use crate::trial_best1_jitter::{midpoint_if_degenerate, trial_best1_jitter};

/// Per-run settings that shape trial construction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TrialSettings {
    pub strategy: Strategy,
    pub jitter: f64,
    pub boundary: BoundaryPolicy,
    pub precision: f64,
}

struct Outcome {
    trial: Array1<f64>,
    score: f64,
    params: TrialParams,
}

#[allow(clippy::too_many_arguments)]
fn build_trial<D: Deviates + ?Sized>(
    i: usize,
    pop: &Array2<f64>,
    best: &Array1<f64>,
    params: TrialParams,
    settings: &TrialSettings,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    deviates: &mut D,
) -> Array1<f64> {
    match settings.strategy {
        Strategy::JitterBest => {
            trial_best1_jitter(i, pop, best, params, settings.jitter, lower, upper, deviates)
        }
        Strategy::Classic { base, pairs } => {
            let mut mutant = mutant_classic(i, pop, best, base, pairs, params.f, deviates);
            for j in 0..mutant.len() {
                mutant[j] = midpoint_if_degenerate(mutant[j], lower[j], upper[j]);
            }
            binomial_crossover(&pop.row(i).to_owned(), &mutant, params.cr, deviates)
        }
    }
}

/// Compute generation `prev.generation + 1` from `prev`.
///
/// Fails only when the objective fails or the adaptive draw gives up; no
/// partial generation is returned in that case.
pub(crate) fn next_generation<F, D>(
    prev: &GenerationRecord,
    settings: &TrialSettings,
    controller: &mut AdaptiveController,
    objective: &mut BoundedObjective<'_, F>,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    deviates: &mut D,
) -> Result<GenerationRecord>
where
    F: Fn(&Array1<f64>) -> f64,
    D: Deviates + ?Sized,
{
    let pop = &prev.population;
    let best = &prev.best_member;
    let npop = pop.nrows();

    let mut outcomes = Vec::with_capacity(npop);
    let mut escaped = 0usize;
    for i in 0..npop {
        let params = controller.draw(deviates)?;
        let mut trial = build_trial(i, pop, best, params, settings, lower, upper, deviates);
        apply_precision(&mut trial, settings.precision);
        repair_bounds_inplace(&mut trial, lower, upper, settings.boundary, deviates);
        if !settings.boundary.is_feasible() && !objective.in_bounds(&trial) {
            escaped += 1;
        }
        let score = objective.evaluate(&trial)?;
        outcomes.push(Outcome { trial, score, params });
    }
    if escaped > 0 {
        log::warn!(
            "generation {}: {} bounced trial(s) landed outside the bounds",
            prev.generation + 1,
            escaped
        );
    }

    let mut population = pop.clone();
    let mut scores = prev.scores.clone();
    let mut best_member = prev.best_member.clone();
    let mut best_score = prev.best_score;
    let mut successes = SuccessAccumulator::new();

    for (i, Outcome { trial, score, params }) in outcomes.into_iter().enumerate() {
        if score < scores[i] {
            population.row_mut(i).assign(&trial);
            scores[i] = score;
            successes.record(params);
            if score < best_score {
                best_score = score;
                best_member = trial;
            }
        }
    }

    controller.update(&successes);

    log::debug!(
        "generation {:4}  best={:.6e}  accepted={}/{}  mean_cr={:.4}  mean_f={:.4}",
        prev.generation + 1,
        best_score,
        successes.count,
        npop,
        controller.mean_cr(),
        controller.mean_f()
    );

    Ok(GenerationRecord {
        generation: prev.generation + 1,
        population,
        scores,
        best_member,
        best_score,
        mean_cr: controller.mean_cr(),
        mean_f: controller.mean_f(),
        accepted: successes.count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argmin;
    use crate::deviates::SeededDeviates;

    fn sphere(x: &Array1<f64>) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    fn seed_record(pop: Array2<f64>, scores: Array1<f64>) -> GenerationRecord {
        let (bi, bs) = argmin(&scores);
        GenerationRecord {
            generation: 0,
            best_member: pop.row(bi).to_owned(),
            population: pop,
            scores,
            best_score: bs,
            mean_cr: 0.9,
            mean_f: 0.8,
            accepted: 0,
        }
    }

    fn settings(strategy: Strategy) -> TrialSettings {
        TrialSettings { strategy, jitter: 0.0, boundary: BoundaryPolicy::Clip, precision: 0.0 }
    }

    #[test]
    fn test_selection_never_worsens() {
        let lower = Array1::from(vec![-5.0; 3]);
        let upper = Array1::from(vec![5.0; 3]);
        let pop = Array2::from_shape_fn((8, 3), |(i, j)| ((i * 3 + j) as f64 * 0.37).sin() * 4.0);
        let mut obj = BoundedObjective::new(&sphere, &lower, &upper);
        let scores = obj.evaluate_population(&pop).unwrap();
        let mut rec = seed_record(pop, scores);
        let mut ctl = AdaptiveController::new(0.9, 0.8, 0.1);
        let mut d = SeededDeviates::seeded(3);

        for _ in 0..20 {
            let next = next_generation(
                &rec,
                &settings(Strategy::JitterBest),
                &mut ctl,
                &mut obj,
                &lower,
                &upper,
                &mut d,
            )
            .unwrap();
            for i in 0..rec.scores.len() {
                assert!(next.scores[i] <= rec.scores[i]);
                if next.scores[i] == rec.scores[i] {
                    assert_eq!(next.population.row(i), rec.population.row(i));
                }
            }
            assert!(next.best_score <= rec.best_score);
            assert_eq!(next.generation, rec.generation + 1);
            rec = next;
        }
    }

    #[test]
    fn test_best_member_matches_best_score() {
        let lower = Array1::from(vec![-5.0; 2]);
        let upper = Array1::from(vec![5.0; 2]);
        let pop = Array2::from_shape_fn((6, 2), |(i, j)| i as f64 - j as f64 * 0.5);
        let mut obj = BoundedObjective::new(&sphere, &lower, &upper);
        let scores = obj.evaluate_population(&pop).unwrap();
        let mut rec = seed_record(pop, scores);
        let mut ctl = AdaptiveController::new(0.5, 0.5, 0.0);
        let mut d = SeededDeviates::seeded(8);
        let classic = Strategy::Classic { base: crate::BaseVector::Rand, pairs: 1 };

        for _ in 0..10 {
            rec = next_generation(&rec, &settings(classic), &mut ctl, &mut obj, &lower, &upper, &mut d)
                .unwrap();
            assert_eq!(sphere(&rec.best_member), rec.best_score);
            assert_eq!((rec.mean_cr, rec.mean_f), (0.5, 0.5));
        }
    }

    #[test]
    fn test_objective_failure_aborts_generation() {
        let lower = Array1::from(vec![-1.0; 2]);
        let upper = Array1::from(vec![1.0; 2]);
        let pop = Array2::from_shape_fn((5, 2), |(i, _)| 0.9 - 0.1 * i as f64);
        let scores = Array1::from(vec![1.0; 5]);
        let rec = seed_record(pop, scores);
        let nan = |_: &Array1<f64>| f64::NAN;
        let mut obj = BoundedObjective::new(&nan, &lower, &upper);
        let mut ctl = AdaptiveController::new(0.9, 0.8, 0.0);
        let mut d = SeededDeviates::seeded(1);
        let res = next_generation(
            &rec,
            &settings(Strategy::JitterBest),
            &mut ctl,
            &mut obj,
            &lower,
            &upper,
            &mut d,
        );
        assert!(matches!(res, Err(crate::error::DEError::ObjectiveFailure { .. })));
    }
}
