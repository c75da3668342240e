use crate::build_result::FirstStageVars;
use crate::config::BuildConfig;
use stationpool_core::solver::ModelBuilder;
use stationpool_core::ProblemData;

/// Adds the first-stage build variables `y_j`, the per-scenario
/// activation variables `z_{j,s}`, and the shared constraints every
/// variant builds on top of (spec §4.6):
/// - `Σ_j y_j = L` (or `≤ L`, per [`BuildConfig::station_count_exact`])
/// - `Σ_j z_{j,s} = K ∀s`
/// - `z_{j,s} ≤ y_j ∀j,s`
pub fn add_first_stage(
    builder: &mut ModelBuilder,
    problem: &ProblemData,
    config: &BuildConfig,
) -> FirstStageVars {
    let n = problem.station_count();
    let mut first_stage = FirstStageVars::default();

    for j in 1..=n {
        first_stage.build.insert(j, builder.add_binary("build", 0.0));
    }
    for s in 1..=problem.scenario_count() {
        for j in 1..=n {
            first_stage
                .active
                .insert((j, s), builder.add_binary("active", 0.0));
        }
    }

    let build_terms: Vec<_> = (1..=n)
        .map(|j| (first_stage.build[&j], 1.0))
        .collect();
    if config.station_count_exact {
        builder.add_eq(
            "station_count",
            &build_terms,
            config.station_count_limit as f64,
        );
    } else {
        builder.add_le(
            "station_count",
            &build_terms,
            config.station_count_limit as f64,
        );
    }

    for s in 1..=problem.scenario_count() {
        let active_terms: Vec<_> = (1..=n)
            .map(|j| (first_stage.active[&(j, s)], 1.0))
            .collect();
        builder.add_eq(
            "activation_count",
            &active_terms,
            config.activation_count as f64,
        );
        for j in 1..=n {
            builder.add_le(
                "activation_linking",
                &[
                    (first_stage.active[&(j, s)], 1.0),
                    (first_stage.build[&j], -1.0),
                ],
                0.0,
            );
        }
    }

    first_stage
}
