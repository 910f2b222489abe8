use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use population_growth_simulator::{
    analysis::{SeriesSummary, Simulator},
    config::AppConfig,
    io::{self, SeriesReader},
    models::{parse_field, Parameters, SimulationRun},
    visualization::{
        print_parameter_table, print_series_chart, print_series_table, print_summary_table,
    },
    Session,
};

#[derive(Parser)]
#[command(
    name = "popgrowth",
    about = "Population Growth Simulator - logistic growth with seasonality, immigration, and noise",
    version,
    author
)]
struct Cli {
    /// Path to a TOML config file (defaults to ./popgrowth.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes effect otherwise)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Model parameters; any flag left out falls back to the parameters file or config.
#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// Intrinsic growth rate r (per day)
    #[arg(short = 'r', long, value_parser = parse_number)]
    growth_rate: Option<f64>,

    /// Carrying capacity K
    #[arg(short = 'k', long, value_parser = parse_number)]
    carrying_capacity: Option<f64>,

    /// Initial population P0
    #[arg(short = 'p', long, value_parser = parse_number)]
    initial_population: Option<f64>,

    /// Seasonal variation factor, |s| < 1
    #[arg(short = 's', long, allow_negative_numbers = true, value_parser = parse_number)]
    seasonal_factor: Option<f64>,

    /// Immigration rate (individuals per day, negative for emigration)
    #[arg(short = 'm', long, allow_negative_numbers = true, value_parser = parse_number)]
    immigration_rate: Option<f64>,

    /// Relative noise intensity of the stochastic series
    #[arg(short = 'n', long, value_parser = parse_number)]
    noise_intensity: Option<f64>,
}

fn parse_number(raw: &str) -> Result<f64, String> {
    parse_field("value", raw).map_err(|e| e.to_string())
}

impl ParamArgs {
    fn apply(&self, base: Parameters) -> Parameters {
        Parameters {
            growth_rate: self.growth_rate.unwrap_or(base.growth_rate),
            carrying_capacity: self.carrying_capacity.unwrap_or(base.carrying_capacity),
            initial_population: self.initial_population.unwrap_or(base.initial_population),
            seasonal_factor: self.seasonal_factor.unwrap_or(base.seasonal_factor),
            immigration_rate: self.immigration_rate.unwrap_or(base.immigration_rate),
            noise_intensity: self.noise_intensity.unwrap_or(base.noise_intensity),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and display the results
    Simulate {
        #[command(flatten)]
        params: ParamArgs,

        /// Start from a saved parameters file instead of the config defaults
        #[arg(long = "params", value_name = "FILE")]
        params_file: Option<PathBuf>,

        /// Seed for the stochastic series (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Export the series to CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Export the full run to JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Export the series to Excel (.xlsx)
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// Export a PDF report with chart and description
        #[arg(long)]
        report: Option<PathBuf>,

        /// Show a table with this many evenly spaced rows
        #[arg(long, default_value = "0")]
        rows: usize,
    },

    /// Save parameters to the parameters file
    SaveParams {
        #[command(flatten)]
        params: ParamArgs,

        /// Output file (defaults to the configured parameters file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load saved parameters and re-run the simulation
    LoadParams {
        /// Parameters file (defaults to the configured parameters file)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Seed for the stochastic series (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Summarize previously exported series (CSV, JSON, or Excel)
    Summary {
        /// Path to input file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn new_session(seed: Option<u64>, config: &AppConfig) -> Result<Session> {
    let simulator = Simulator::new(seed.or(config.simulation.seed))?;
    Ok(Session::new(simulator).with_pretty_json(config.output.pretty_json))
}

fn show_run(run: &SimulationRun, rows: usize) -> Result<()> {
    print_parameter_table(&run.parameters);
    println!();
    print_summary_table(&SeriesSummary::compute(&run.series)?);
    println!();
    print_series_chart(run.time_grid.points(), &run.series);
    if rows > 0 {
        print_series_table(run.time_grid.points(), &run.series, rows);
        println!();
    }
    if let Some(seed) = run.seed {
        println!("  {}", format!("Noise seed: {seed}").dimmed());
    }
    Ok(())
}

fn success(what: &str, path: &Path) {
    println!("{} {what} {}", "Success:".green().bold(), path.display());
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Commands::Simulate {
            params,
            params_file,
            seed,
            csv,
            json,
            xlsx,
            report,
            rows,
        } => {
            let base = match &params_file {
                Some(path) => io::load_parameters(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => config.parameters(),
            };
            let parameters = params.apply(base);

            println!("\n{}", "Population Growth Simulation".bold().cyan());

            let mut session = new_session(seed, &config)?;
            let run = session.simulate(&parameters)?;
            show_run(run, rows)?;

            if let Some(path) = csv {
                session.export_csv(&path)?;
                success("Data saved to", &path);
            }
            if let Some(path) = json {
                session.export_json(&path)?;
                success("Run saved to", &path);
            }
            if let Some(path) = xlsx {
                session.export_excel(&path)?;
                success("Workbook saved to", &path);
            }
            if let Some(path) = report {
                session.export_report(&path)?;
                success("Report exported to", &path);
            }
        }

        Commands::SaveParams { params, output } => {
            let parameters = params.apply(config.parameters());
            parameters.validate()?;
            let path = output.unwrap_or_else(|| config.output.parameters_file.clone());
            io::save_parameters(&parameters, &path)?;
            success("Parameters saved to", &path);
        }

        Commands::LoadParams { input, seed } => {
            let path = input.unwrap_or_else(|| config.output.parameters_file.clone());

            println!(
                "\n{}",
                format!("Loaded parameters: {}", path.display()).bold().cyan()
            );

            let mut session = new_session(seed, &config)?;
            let run = session.load_and_simulate(&path)?;
            show_run(run, 0)?;
        }

        Commands::Summary { input } => {
            let dataset = io::reader_for(&input)?
                .read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            println!("\n{}", "Quick Summary".bold().cyan());
            println!("{}", "=".repeat(40));
            println!("  Name:           {}", dataset.name);
            println!("  Time points:    {}", dataset.len());
            if let (Some(first), Some(last)) = (dataset.time.first(), dataset.time.last()) {
                println!("  Time span:      {first:.1} - {last:.1} days");
            }
            if let Some(params) = &dataset.parameters {
                print_parameter_table(params);
                println!();
            }
            print_summary_table(&SeriesSummary::compute(&dataset.series)?);
            println!();
            print_series_chart(&dataset.time, &dataset.series);
        }
    }

    Ok(())
}
