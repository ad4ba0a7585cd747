mod logic;
mod util;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use spinlab_engine::{DEFAULT_DISPLAY_CAP, SimSettings};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{
    BatchRecord, FairnessRecord, Scenario, SimulationPlan, even_money_fairness, expand_scenarios,
    get_scenario, list_scenarios, resolve_seed_inputs, run_plan, validate_fairness,
};
use util::split_csv;

const ACCEPTANCE_MIN_RUNS: u32 = 500;

#[derive(Debug, Parser)]
#[command(name = "spinlab-tester", version = "0.1.0")]
#[command(about = "Batch runner and acceptance checks for the SpinLab simulation engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long)]
    scenarios: Option<String>,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Base seeds (comma-separated; decimal or 0x hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Runs per batch
    #[arg(long, default_value_t = 100)]
    runs: u32,

    /// Override spins per session
    #[arg(long)]
    spins: Option<u32>,

    /// Override bet size
    #[arg(long)]
    bet_size: Option<f64>,

    /// Runs whose full trajectory is kept; the rest fold into a tail summary
    #[arg(long, default_value_t = DEFAULT_DISPLAY_CAP)]
    display_cap: usize,

    /// Custom settings: inline JSON such as '{"machine":"roulette","bet":"dozen","spins":50,"betSize":2}' or a path to a JSON file
    #[arg(long)]
    settings: Option<String>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run extended acceptance sweeps (forces ≥500 runs and the even-money fairness check)
    #[arg(long)]
    acceptance: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = resolve_scenarios(&args)?;
    let seed_tokens = split_csv(&args.seeds);
    let seed_infos = resolve_seed_inputs(&seed_tokens)?;
    let plan = build_plan(&args);

    println!(
        "{} {} scenario(s) x {} seed(s), {} runs each",
        "🎰".bright_yellow(),
        scenarios.len(),
        seed_infos.len(),
        plan.runs
    );

    let records = run_plan(&plan, &scenarios, &seed_infos)?;
    if args.verbose {
        for record in &records {
            println!(
                "   {} seed {} -> mean net {:.2} in {}ms",
                record.scenario, record.seed, record.mean_final_net, record.duration_ms
            );
        }
    }

    let fairness = if args.acceptance {
        seed_infos
            .iter()
            .map(|s| even_money_fairness(s.seed))
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    write_reports(&args, &records, &fairness, start_time)?;
    validate_fairness(&fairness)?;

    if records.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init();
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎲 SpinLab Batch Tester".bright_cyan().bold());
    println!("{}", "=======================".cyan());
}

fn build_plan(args: &Args) -> SimulationPlan {
    let runs = if args.acceptance {
        if args.runs < ACCEPTANCE_MIN_RUNS {
            println!(
                "🔁 Acceptance mode enabled: increasing runs from {} to {ACCEPTANCE_MIN_RUNS}",
                args.runs
            );
        }
        args.runs.max(ACCEPTANCE_MIN_RUNS)
    } else {
        args.runs
    };
    SimulationPlan {
        runs,
        spins: args.spins,
        bet_size: args.bet_size,
        display_cap: args.display_cap,
    }
}

/// `--settings` adds a custom scenario; with no `--scenarios` it runs alone,
/// otherwise the default is every catalog scenario.
fn resolve_scenarios(args: &Args) -> Result<Vec<Scenario>> {
    let mut scenarios = Vec::new();
    if let Some(source) = args.settings.as_deref() {
        scenarios.push(Scenario::custom(load_settings(source)?));
    }

    let requested = match (&args.scenarios, scenarios.is_empty()) {
        (Some(list), _) => expand_scenarios(list),
        (None, true) => expand_scenarios("all"),
        (None, false) => Vec::new(),
    };
    for key in requested {
        match get_scenario(&key) {
            Some(scenario) => scenarios.push(scenario),
            None => eprintln!("⚠️  Unknown scenario: {}", key.yellow()),
        }
    }

    if scenarios.is_empty() {
        bail!("no runnable scenarios selected (see --list-scenarios)");
    }
    Ok(scenarios)
}

fn load_settings(source: &str) -> Result<SimSettings> {
    let json = if source.trim_start().starts_with('{') {
        source.to_string()
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read settings file {source}"))?
    };
    SimSettings::from_json(&json).context("invalid --settings document")
}

fn write_reports(
    args: &Args,
    records: &[BatchRecord],
    fairness: &[FairnessRecord],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, records, fairness)?,
        "markdown" => {
            logic::reports::generate_markdown_report(&mut output_target, records, fairness)?;
        }
        "csv" => logic::reports::generate_csv_report(&mut output_target, records)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                records,
                fairness,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn base_args() -> Args {
        Args {
            scenarios: None,
            list_scenarios: false,
            seeds: "1337".to_string(),
            runs: 4,
            spins: Some(10),
            bet_size: None,
            display_cap: 2,
            settings: None,
            report: "json".to_string(),
            output: None,
            acceptance: false,
            verbose: false,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "spinlab-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn acceptance_raises_run_floor() {
        let mut args = base_args();
        assert_eq!(build_plan(&args).runs, 4);
        args.acceptance = true;
        assert_eq!(build_plan(&args).runs, ACCEPTANCE_MIN_RUNS);
        args.runs = 900;
        assert_eq!(build_plan(&args).runs, 900);
    }

    #[test]
    fn default_scenarios_cover_catalog() {
        let scenarios = resolve_scenarios(&base_args()).unwrap();
        assert_eq!(scenarios.len(), 8);
    }

    #[test]
    fn custom_settings_run_alone_unless_scenarios_given() {
        let mut args = base_args();
        args.settings =
            Some(r#"{"machine":"roulette","bet":"dozen","spins":5,"betSize":1}"#.to_string());
        let scenarios = resolve_scenarios(&args).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].key, "custom-roulette-dozen");

        args.scenarios = Some("slot-steady".to_string());
        assert_eq!(resolve_scenarios(&args).unwrap().len(), 2);
    }

    #[test]
    fn bad_settings_and_unknown_scenarios_fail() {
        let mut args = base_args();
        args.settings = Some(r#"{"machine":"slot","profile":"wild"}"#.to_string());
        assert!(resolve_scenarios(&args).is_err());

        let mut args = base_args();
        args.scenarios = Some("slot-nope".to_string());
        assert!(resolve_scenarios(&args).is_err());
    }

    #[test]
    fn settings_load_from_file() {
        let path = temp_path("settings");
        std::fs::write(&path, r#"{"machine":"slot","profile":"steady","spins":12,"betSize":3}"#)
            .unwrap();
        let settings = load_settings(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.spins, 12);
        assert!((settings.bet_size - 3.0).abs() < f64::EPSILON);
        let _ = std::fs::remove_file(path);
        assert!(load_settings("/nonexistent/spinlab-settings.json").is_err());
    }

    #[test]
    fn list_scenarios_writes_to_file() {
        let mut args = base_args();
        args.list_scenarios = true;
        let path = temp_path("list");
        args.output = Some(path.clone());
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("roulette-even-money"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn write_reports_emits_each_format() {
        let mut args = base_args();
        let scenarios = resolve_scenarios(&args).unwrap();
        let seeds = resolve_seed_inputs(&split_csv(&args.seeds)).unwrap();
        let records = run_plan(&build_plan(&args), &scenarios[..1], &seeds).unwrap();
        for (format, marker) in [
            ("json", "\"batches\""),
            ("markdown", "# SpinLab Batch Results"),
            ("csv", "scenario,seed"),
            ("console", "Total time"),
        ] {
            let path = temp_path(format);
            args.report = format.to_string();
            args.output = Some(path.clone());
            write_reports(&args, &records, &[], Instant::now()).unwrap();
            let content = std::fs::read_to_string(&path).unwrap();
            assert!(content.contains(marker), "{format}: {content}");
            let _ = std::fs::remove_file(path);
        }
    }
}
