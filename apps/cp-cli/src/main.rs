use clap::{Parser, Subcommand};
use cp_app::{
    AppResult, RunOverrides, RunResponse, ScenarioFile, energy_summary, heat_flows, load_scenario,
    run_scenario, run_summary, sanitize,
};
use cp_sim::Sample;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cp-cli")]
#[command(about = "CoolPlant CLI - Data-hall cooling plant transient simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the mapped simulation parameters as JSON
    Params {
        /// Path to the scenario file (YAML or JSON)
        scenario: PathBuf,
    },
    /// Run a simulation and write the temperature series
    Run {
        /// Path to the scenario file (YAML or JSON)
        scenario: PathBuf,
        #[command(flatten)]
        model: ModelArgs,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fail instead of writing a truncated series when the run diverges
        #[arg(long)]
        strict: bool,
    },
    /// Run a simulation and print summary, energy totals and final heat flows
    Report {
        /// Path to the scenario file (YAML or JSON)
        scenario: PathBuf,
        #[command(flatten)]
        model: ModelArgs,
    },
}

#[derive(clap::Args)]
struct ModelArgs {
    /// Use the 3-node baseline model
    #[arg(long, conflicts_with = "extended")]
    basic: bool,
    /// Use the extended flow-coupled model
    #[arg(long)]
    extended: bool,
    /// Time step in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// Simulated horizon in seconds
    #[arg(long)]
    horizon: Option<f64>,
}

impl ModelArgs {
    fn overrides(&self) -> RunOverrides {
        let extended = if self.basic {
            Some(false)
        } else if self.extended {
            Some(true)
        } else {
            None
        };
        RunOverrides {
            dt_s: self.dt,
            horizon_s: self.horizon,
            extended,
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Params { scenario } => cmd_params(&scenario),
        Commands::Run {
            scenario,
            model,
            output,
            strict,
        } => cmd_run(&scenario, &model, output.as_deref(), strict),
        Commands::Report { scenario, model } => cmd_report(&scenario, &model),
    }
}

fn cmd_params(scenario_path: &Path) -> AppResult<()> {
    let scenario = load_scenario(scenario_path)?;
    let params = scenario.parameters();
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

fn run(scenario_path: &Path, model: &ModelArgs) -> AppResult<RunResponse> {
    let scenario: ScenarioFile = load_scenario(scenario_path)?;
    let response = run_scenario(&scenario, model.overrides());
    if let Some(d) = &response.record.divergence {
        eprintln!(
            "warning: run stopped early after {} samples: {}",
            response.record.samples.len(),
            d
        );
    }
    Ok(response)
}

fn series_csv(samples: &[Sample]) -> String {
    let with_room = samples.iter().any(|s| s.room_c.is_some());
    let mut csv = String::from("time_s,liquid_c,air_side_c,buffer_c");
    if with_room {
        csv.push_str(",room_c");
    }
    csv.push('\n');

    for s in samples {
        csv.push_str(&format!(
            "{},{},{},{}",
            s.time_s, s.liquid_c, s.air_side_c, s.buffer_c
        ));
        if with_room {
            match s.room_c {
                Some(t) => csv.push_str(&format!(",{}", t)),
                None => csv.push(','),
            }
        }
        csv.push('\n');
    }
    csv
}

fn cmd_run(
    scenario_path: &Path,
    model: &ModelArgs,
    output: Option<&Path>,
    strict: bool,
) -> AppResult<()> {
    let response = run(scenario_path, model)?;
    let model_kind = response.model;
    let samples = if strict {
        response.into_samples()?
    } else {
        sanitize(&response.record.samples).0
    };
    let csv = series_csv(&samples);

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        tracing::info!(path = %path.display(), samples = samples.len(), "series written");
        println!(
            "✓ {} model: wrote {} samples to {}",
            model_kind,
            samples.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}

#[derive(Serialize)]
struct Report<'a> {
    model: String,
    complete: bool,
    summary: cp_app::RunSummary,
    energy: cp_app::EnergySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_heat_flows: Option<cp_app::HeatFlowSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    divergence: Option<&'a cp_sim::Divergence>,
}

fn cmd_report(scenario_path: &Path, model: &ModelArgs) -> AppResult<()> {
    let response = run(scenario_path, model)?;
    let (samples, _) = sanitize(&response.record.samples);

    let report = Report {
        model: response.model.to_string(),
        complete: response.is_complete(),
        summary: run_summary(&samples, &response.params)?,
        energy: energy_summary(&samples, &response.params)?,
        final_heat_flows: heat_flows(&samples, &response.params).last().copied(),
        divergence: response.record.divergence.as_ref(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
