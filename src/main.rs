use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use fleet_sim::simulation::{
    expansion_analysis, generate_stations, load_scenario, FailurePolicy, Scenario, SimParams,
    SimWorld, TripTimeParams, DEFAULT_DAILY_WORK_HOURS, DEFAULT_NUM_VEHICLES,
    DEFAULT_SIMULATION_DAYS, DEFAULT_TRIGGER_FRACTION, DEFAULT_WORK_DAY_START_HOUR, HOURS_PER_DAY,
};

#[derive(Parser)]
#[command(name = "fleet_sim")]
#[command(about = "Can a fleet of vehicles keep collection stations from overflowing?")]
struct Cli {
    /// JSON scenario file; a synthetic scenario is generated when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Number of stations in the synthetic scenario
    #[arg(long, default_value = "12")]
    stations: usize,

    /// Seed for the synthetic scenario
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Number of vehicles
    #[arg(long, default_value_t = DEFAULT_NUM_VEHICLES)]
    vehicles: usize,

    /// Simulation horizon in days
    #[arg(long, default_value_t = DEFAULT_SIMULATION_DAYS)]
    days: u32,

    /// Working hours per vehicle per day
    #[arg(long, default_value_t = DEFAULT_DAILY_WORK_HOURS)]
    work_hours: f64,

    /// Hour of the day at which shifts start
    #[arg(long, default_value_t = DEFAULT_WORK_DAY_START_HOUR)]
    work_day_start: f64,

    /// Hours per day during which waste accumulates
    #[arg(long, default_value = "24")]
    active_window: f64,

    /// Hour of the day at which the accumulation window opens
    #[arg(long, default_value = "0")]
    active_window_start: u32,

    /// Fill fraction of capacity that raises a collection request
    #[arg(long, default_value_t = DEFAULT_TRIGGER_FRACTION)]
    trigger: f64,

    /// Count a failure after this many unserved hours instead of on overflow
    #[arg(long)]
    grace_hours: Option<u32>,

    /// Average driving speed in km/h
    #[arg(long, default_value = "35")]
    speed: f64,

    /// Compare the baseline against one extra station and one extra vehicle
    #[arg(long)]
    compare: bool,

    /// Print a progress summary every N simulated days
    #[arg(long)]
    progress_days: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn params(&self) -> SimParams {
        SimParams {
            num_vehicles: self.vehicles,
            daily_work_hours: self.work_hours,
            work_day_start_hour: self.work_day_start,
            active_window_start_hour: self.active_window_start,
            active_window_hours: self.active_window,
            trigger_fraction: self.trigger,
            simulation_days: self.days,
            failure_policy: match self.grace_hours {
                Some(hours) => FailurePolicy::GracePeriod { hours },
                None => FailurePolicy::CapacityExceeded,
            },
        }
    }

    fn trip_params(&self) -> TripTimeParams {
        TripTimeParams {
            avg_speed_kmh: self.speed,
            ..TripTimeParams::default()
        }
    }

    fn scenario(&self) -> Result<Scenario> {
        match &self.input {
            Some(path) => load_scenario(path, &self.trip_params(), self.trigger),
            None => generate_stations(self.seed, self.stations, &self.trip_params())
                .context("Could not generate a synthetic scenario"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let scenario = cli.scenario()?;
    let params = cli.params();

    if cli.compare {
        run_comparison(&cli, &scenario, &params)
    } else {
        run_headless(&cli, &scenario, params)
    }
}

/// Run one simulation and print its report
fn run_headless(cli: &Cli, scenario: &Scenario, params: SimParams) -> Result<()> {
    let mut world = SimWorld::new(&scenario.stations, &scenario.trip_times, params)
        .context("Invalid simulation input")?;

    if let Some(days) = cli.progress_days.filter(|&d| d > 0) {
        let hours_per_report = days * HOURS_PER_DAY;
        while world.tick().is_some() {
            if world.hour() % hours_per_report == 0 {
                println!("--- After day {} ---", world.hour() / HOURS_PER_DAY);
                world.print_summary();
                println!();
            }
        }
    }

    let report = world.run();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print_summary();
    }
    Ok(())
}

/// Baseline vs. one more station vs. one more station and vehicle
fn run_comparison(cli: &Cli, scenario: &Scenario, params: &SimParams) -> Result<()> {
    let existing = scenario.stations.len().saturating_sub(1);
    let analysis = expansion_analysis(&scenario.stations, &scenario.trip_times, params, existing)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let rows = [
        (format!("{} stations", existing), &analysis.baseline),
        (format!("{} stations", existing + 1), &analysis.with_new_station),
        (
            format!("{} stations, +1 vehicle", existing + 1),
            &analysis.with_new_station_and_vehicle,
        ),
    ];

    println!("=== Expansion Analysis ===");
    for (label, report) in rows {
        println!(
            "  {:<26} utilization {:>5.1}% | trips {:>4} | failures {:>3}",
            label, report.utilization_percent, report.total_trips, report.total_failures
        );
    }
    Ok(())
}
