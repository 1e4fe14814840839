use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use log::info;

use viaterra_match::geometry::GeometryFactory;
use viaterra_match::graph::{RoadGraph, RoadGraphConfig};
use viaterra_match::hmm::{EmissionKernel, HmmConfig, Matcher, TransitionPlugin};
use viaterra_match::io::{read_roads, read_trajectory};
use viaterra_match::search::AStarConfig;
use viaterra_match::MatchError;

/// Map-matches one trajectory against a road network and prints the decoded
/// edge sequence, connected route, stitched path and average positioning
/// error (§6).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Identifier printed alongside the result, for batch pipelines
    trajectory_id: String,

    /// Road network, one `LINESTRING (...)` per line
    #[arg(value_name = "ROADS.WKT")]
    roads_wkt_path: PathBuf,

    /// Trajectory, `longitude;latitude;timestamp` per line
    #[arg(value_name = "TRAJECTORY.CSV")]
    trajectory_csv_path: PathBuf,

    /// Gaussian emission kernel standard deviation, metres
    #[arg(long, default_value_t = 15.0)]
    sigma: f64,

    /// Candidate edge search radius, metres
    #[arg(long = "candidate-radius", default_value_t = 50.0)]
    candidate_radius: f64,

    /// Node-coalescing tolerance when building the road graph, metres
    #[arg(long = "merge-threshold", default_value_t = 1.0)]
    merge_threshold: f64,

    /// `ShortestPath` transition plugin scale factor, metres
    #[arg(long, default_value_t = 20.0)]
    beta: f64,
}

fn run(args: CliArgs) -> Result<(), MatchError> {
    let factory = GeometryFactory::geoidal();

    let load_start = Local::now();
    let roads = read_roads(&args.roads_wkt_path, factory)?;
    let mut graph = RoadGraph::new(
        factory,
        RoadGraphConfig { merge_threshold_m: args.merge_threshold, with_rtree: true },
    )
    .map_err(|e| MatchError::Hmm(e.into()))?;
    for (id, path) in roads {
        graph.add_bidirectional_edge(id, path).map_err(|e| MatchError::Hmm(e.into()))?;
    }
    graph.build_index().map_err(|e| MatchError::Hmm(e.into()))?;
    info!(
        "loaded road graph with {} edges in {}ms",
        graph.edges().count(),
        (Local::now() - load_start).num_milliseconds()
    );

    let observations = read_trajectory(&args.trajectory_csv_path, factory)?;
    info!("trajectory {} has {} observations", args.trajectory_id, observations.len());

    let config = HmmConfig {
        candidate_radius_m: args.candidate_radius,
        emission: EmissionKernel::Gaussian { sigma_m: args.sigma },
        plugins: vec![
            TransitionPlugin::Topological,
            TransitionPlugin::NoUTurn,
            TransitionPlugin::Direction,
            TransitionPlugin::ShortestPath { beta_m: args.beta },
        ],
        astar: AStarConfig::default(),
    };

    let match_start = Local::now();
    let matcher = Matcher::new(&graph, config);
    let result = matcher.match_trajectory(&observations)?;
    info!("matched trajectory in {}ms", (Local::now() - match_start).num_milliseconds());

    let decoded: Vec<String> = result
        .decoded
        .iter()
        .map(|e| e.map(|id| graph.edge(id).map(|edge| edge.id.clone()).unwrap_or_default()).unwrap_or_default())
        .collect();
    let connected: Vec<String> = result
        .connected
        .iter()
        .filter_map(|&id| graph.edge(id).ok().map(|edge| edge.id.clone()))
        .collect();

    println!("decoded: {}", decoded.join(","));
    println!("connected: {}", connected.join(","));
    match &result.path {
        Some(path) => {
            let coords: Vec<String> = path.points().iter().map(|p| format!("{} {}", p.x(), p.y())).collect();
            println!("path: LINESTRING ({})", coords.join(", "));
        }
        None => println!("path: (empty)"),
    }
    println!("avg_cross_track_error_m: {:.3}", result.avg_cross_track_error_m);

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
