use springsim::logging::setup_logging;
use springsim::{bench_integrators, dominant_frequency, export_run};
use springsim::{Algorithm, Scenario, ScenarioConfig};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Integrate a chain of coupled springs and export the trajectories")]
struct Args {
    /// Scenario file; relative names not found in the working directory
    /// are looked up in the crate's `scenarios/` folder
    #[arg(short, default_value = "four_springs.yaml")]
    file_name: String,

    /// Output directory, overrides `output.directory`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run a single integrator instead of the configured list
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No log output
    #[arg(short, long)]
    quiet: bool,

    /// Time every integrator on growing chains instead of running a scenario
    #[arg(long)]
    bench: bool,
}

fn resolve_scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.is_absolute() || direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = resolve_scenario_path(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose, args.quiet)?;

    if args.bench {
        bench_integrators();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(&scenario_cfg).context("invalid scenario")?;
    if let Some(a) = args.algorithm {
        scenario = scenario.with_only(a);
    }

    let out_dir = args
        .output
        .unwrap_or_else(|| PathBuf::from(&scenario_cfg.output.directory));

    let runs = scenario.run();
    let mut failed = Vec::new();
    for (algorithm, outcome) in &runs {
        let tr = match outcome {
            Ok(tr) => tr,
            Err(e) => {
                failed.push(format!("{algorithm}: {e}"));
                continue;
            }
        };
        let peak = dominant_frequency(&tr.chain.bodies[0].position_history, tr.t_sample);
        info!(
            algorithm = %tr.algorithm,
            energy_drift = tr.max_relative_energy_drift(),
            body0_peak_hz = ?peak,
            "summary"
        );

        let files = export_run(&out_dir, tr, scenario_cfg.output.spectrum)
            .with_context(|| format!("failed to write results for {}", tr.algorithm))?;
        for f in files {
            println!("{}", f.display());
        }
    }

    if !failed.is_empty() {
        bail!("{} of {} runs failed; {}", failed.len(), runs.len(), failed.join("; "));
    }
    Ok(())
}
