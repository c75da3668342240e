//! Batch-run harness (spec §6 "Output artifacts" / §9 "Batch runs"): builds
//! one of the five station-selection variants over a synthetic instance,
//! solves it with a scoped [`SolverEnv`], and prints variable/constraint
//! counts plus a `RunMetadata` document for manual inspection.

use clap::{Parser, ValueEnum};
use std::collections::HashMap;
use std::error::Error;
use std::time::Instant;
use stationpool_core::solver::{Sense, SolverConfig, SolverEnv};
use stationpool_core::{ProblemData, RawRequest, RawScenarioWindow, Station};
use stationpool_index::{AggregatedDemand, AnchorIndex, ClusterMode, Clustering, CorridorIndex, DetourIndex};
use stationpool_model::config::{BuildConfig, ObjectiveWeights, PoolingConfig};
use stationpool_model::variant::corridor::CorridorCoupling;
use stationpool_model::variant::{aggregated, corridor, time_bucketed, transportation};
use stationpool_solution::{extract, RunMetadata};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    Aggregated,
    TimeBucketed,
    CorridorZone,
    CorridorAssignment,
    Transportation,
}

/// Builds and solves a station-selection model over a synthetic demo
/// instance, for manual inspection of the solver's behavior.
#[derive(Debug, Parser)]
#[command(name = "stationpool", about = "Station-selection MIP batch-run harness")]
struct Cli {
    /// Which model variant to assemble.
    #[arg(long, value_enum, default_value_t = Variant::Aggregated)]
    variant: Variant,

    /// Number of stations to build (>= 4) for the first-stage decision.
    #[arg(long, default_value_t = 6)]
    station_count: usize,

    /// Number of stations to open (`L`).
    #[arg(long, default_value_t = 4)]
    open_count: u32,

    /// Number of stations active per scenario (`K`).
    #[arg(long, default_value_t = 3)]
    active_count: u32,

    /// Solver time limit in seconds.
    #[arg(long, default_value_t = 10.0)]
    time_limit_seconds: f64,

    /// Walking-time weight vs. vehicle-routing weight for the in-vehicle
    /// objective term (`alpha`).
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,

    /// Pooling-savings reward weight (`gamma`), used by the
    /// time-bucketed variant.
    #[arg(long, default_value_t = 1.0)]
    gamma: f64,

    /// Corridor usage weight, used by the two corridor variants.
    #[arg(long, default_value_t = 0.01)]
    corridor_weight: f64,

    /// Fixed cost of activating a transportation anchor.
    #[arg(long, default_value_t = 1.0)]
    anchor_activation_cost: f64,

    /// Number of clusters built for the corridor/transportation variants.
    #[arg(long, default_value_t = 3)]
    cluster_count: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::CLOSE).compact())
        .init();

    let cli = Cli::parse();
    info!(?cli.variant, cli.station_count, "building synthetic instance");

    let problem = build_synthetic_problem(cli.station_count)?;
    let env = SolverEnv::new(SolverConfig::new(Some(cli.time_limit_seconds)));
    let build_config = BuildConfig::new(cli.open_count, true, cli.active_count)?;
    let weights = ObjectiveWeights::new(
        cli.alpha,
        cli.gamma,
        cli.corridor_weight,
        cli.anchor_activation_cost,
    )?;

    let start = Instant::now();

    let (model_type, metadata, selection_json, assignment_json) = match cli.variant {
        Variant::Aggregated => {
            let demand = AggregatedDemand::build(&problem);
            let build = aggregated::build(&env, &problem, &demand, None, &build_config, &weights)?;
            let solved = build.solve(Sense::Minimise, &env);
            let selection = extract::station_selection(&problem, &solved.outcome, &solved.first_stage);
            let assignments = extract::aggregated_assignments(&problem, &solved.outcome, &solved.variant);
            let metadata = RunMetadata::new(
                "aggregated",
                problem.scenario_count(),
                None,
                None,
                &solved.outcome.variable_counts,
                &solved.outcome.constraint_counts,
                solved.outcome.status,
                solved.outcome.objective_value,
                start.elapsed().as_secs_f64(),
            );
            (
                "aggregated",
                metadata,
                serde_json::to_string_pretty(&selection)?,
                serde_json::to_string_pretty(&assignments)?,
            )
        }
        Variant::TimeBucketed => {
            let demand = stationpool_index::TimeBucketedDemand::build(&problem, 300)?;
            let pooling_config = PoolingConfig::new(300, None, 1.5)?;
            let detours = DetourIndex::build(
                &problem,
                pooling_config.detour_tolerance,
                pooling_config.time_window_sec,
            )?;
            let build = time_bucketed::build(
                &env,
                &problem,
                &demand,
                None,
                Some(&detours),
                &build_config,
                &weights,
            )?;
            let solved = build.solve(Sense::Minimise, &env);
            let selection = extract::station_selection(&problem, &solved.outcome, &solved.first_stage);
            let assignments =
                extract::time_bucketed_assignments(&problem, &solved.outcome, &solved.variant);
            let same_source_pooling = extract::time_bucketed_same_source_pooling(
                &problem,
                &solved.outcome,
                &solved.variant,
                &detours,
            );
            let same_dest_pooling = extract::time_bucketed_same_dest_pooling(
                &problem,
                &solved.outcome,
                &solved.variant,
                &detours,
            );
            let metadata = RunMetadata::new(
                "time_bucketed",
                problem.scenario_count(),
                None,
                None,
                &solved.outcome.variable_counts,
                &solved.outcome.constraint_counts,
                solved.outcome.status,
                solved.outcome.objective_value,
                start.elapsed().as_secs_f64(),
            );
            println!("--- same-source pooling ---");
            println!("{}", serde_json::to_string_pretty(&same_source_pooling)?);
            println!("--- same-dest pooling ---");
            println!("{}", serde_json::to_string_pretty(&same_dest_pooling)?);
            (
                "time_bucketed",
                metadata,
                serde_json::to_string_pretty(&selection)?,
                serde_json::to_string_pretty(&assignments)?,
            )
        }
        Variant::CorridorZone | Variant::CorridorAssignment => {
            let model_type = match cli.variant {
                Variant::CorridorZone => "corridor_zone",
                _ => "corridor_assignment",
            };
            let coupling = match cli.variant {
                Variant::CorridorZone => CorridorCoupling::ZoneActivation,
                _ => CorridorCoupling::Assignment,
            };
            let demand = AggregatedDemand::build(&problem);
            let clustering = Clustering::solve(&problem, ClusterMode::FixedCount(cli.cluster_count), &env)?;
            let corridors = CorridorIndex::build(&problem, &clustering, &demand)?;
            let build = corridor::build(
                &env,
                &problem,
                &demand,
                &clustering,
                &corridors,
                None,
                coupling,
                &build_config,
                &weights,
            )?;
            let solved = build.solve(Sense::Minimise, &env);
            let selection = extract::station_selection(&problem, &solved.outcome, &solved.first_stage);
            let usage = extract::corridor_usage(&solved.outcome, &solved.variant);
            let metadata = RunMetadata::new(
                model_type,
                problem.scenario_count(),
                Some(clustering.cluster_count()),
                None,
                &solved.outcome.variable_counts,
                &solved.outcome.constraint_counts,
                solved.outcome.status,
                solved.outcome.objective_value,
                start.elapsed().as_secs_f64(),
            );
            (
                model_type,
                metadata,
                serde_json::to_string_pretty(&selection)?,
                serde_json::to_string_pretty(&usage)?,
            )
        }
        Variant::Transportation => {
            let demand = AggregatedDemand::build(&problem);
            let clustering = Clustering::solve(&problem, ClusterMode::FixedCount(cli.cluster_count), &env)?;
            let anchors = AnchorIndex::build(&problem, &clustering, &demand)?;
            let build = transportation::build(&env, &problem, &anchors, &build_config, &weights)?;
            let solved = build.solve(Sense::Minimise, &env);
            let selection = extract::station_selection(&problem, &solved.outcome, &solved.first_stage);
            let anchor_rows = extract::transportation_anchor_rows(&solved.outcome, &solved.variant);
            let metadata = RunMetadata::new(
                "transportation",
                problem.scenario_count(),
                Some(clustering.cluster_count()),
                Some(anchors.anchors().len()),
                &solved.outcome.variable_counts,
                &solved.outcome.constraint_counts,
                solved.outcome.status,
                solved.outcome.objective_value,
                start.elapsed().as_secs_f64(),
            );
            (
                "transportation",
                metadata,
                serde_json::to_string_pretty(&selection)?,
                serde_json::to_string_pretty(&anchor_rows)?,
            )
        }
    };

    info!(model_type, status = ?metadata.termination_status, objective = ?metadata.objective_value, "solve complete");
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    println!("--- station selection ---");
    println!("{selection_json}");
    println!("--- variant rows ---");
    println!("{assignment_json}");

    Ok(())
}

/// A small line-of-stations instance: station `i` sits at `lon = i`,
/// walking cost is the absolute coordinate difference and routing cost is
/// half that (the vehicle is faster than walking), spread across two
/// scenarios with a handful of requests each.
fn build_synthetic_problem(station_count: usize) -> Result<ProblemData, Box<dyn Error>> {
    if station_count < 4 {
        return Err("station_count must be >= 4 for a useful demo".into());
    }

    let stations: Vec<Station> = (1..=station_count as i64)
        .map(|id| Station { id, lon: id as f64, lat: 0.0 })
        .collect();
    let ids: Vec<i64> = stations.iter().map(|s| s.id).collect();

    let mut walking_cost = HashMap::new();
    let mut routing_cost = HashMap::new();
    for &a in &ids {
        for &b in &ids {
            let dist = (a - b).unsigned_abs() as f64;
            walking_cost.insert((a, b), dist);
            routing_cost.insert((a, b), dist * 0.5);
        }
    }

    let requests = vec![
        RawRequest { origin_id: ids[0], destination_id: ids[ids.len() - 1], request_time: "2025-06-01 08:00:00".into() },
        RawRequest { origin_id: ids[0], destination_id: ids[ids.len() - 2], request_time: "2025-06-01 08:02:00".into() },
        RawRequest { origin_id: ids[1], destination_id: ids[ids.len() - 1], request_time: "2025-06-01 08:01:00".into() },
        RawRequest { origin_id: ids[2], destination_id: ids[0], request_time: "2025-06-01 17:30:00".into() },
        RawRequest { origin_id: ids[3], destination_id: ids[1], request_time: "2025-06-01 17:31:00".into() },
    ];

    let scenario_windows = vec![
        RawScenarioWindow {
            label: "morning_peak".into(),
            start: "2025-06-01 07:00:00".into(),
            end: "2025-06-01 10:00:00".into(),
        },
        RawScenarioWindow {
            label: "evening_peak".into(),
            start: "2025-06-01 16:00:00".into(),
            end: "2025-06-01 19:00:00".into(),
        },
    ];

    Ok(ProblemData::build(
        stations,
        requests,
        walking_cost,
        Some(routing_cost),
        scenario_windows,
    )?)
}
