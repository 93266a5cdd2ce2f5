use anyhow::Context;
use clap::{Parser, Subcommand};
use piedial::config::{self, PieUnit, SectionConfig};
use piedial::replay::{self, QueryKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "piedial", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read this config file instead of the default location
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Width of the section
    #[arg(short = 's', long, global = true)]
    section_size: Option<f64>,

    /// Size of the whole circular domain (defaults to one full turn of the unit)
    #[arg(short = 'p', long, global = true)]
    pie_size: Option<f64>,

    /// Unit of the domain: degrees, radians, turns or gradians
    #[arg(short = 'u', long, global = true)]
    unit: Option<PieUnit>,

    /// Initial center of the section
    #[arg(long, global = true, allow_negative_numbers = true)]
    center: Option<f64>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Measure values against the section, one output line per value.
    /// Reads values from stdin when none are given.
    Diff {
        /// center, lower, upper or peek (center without moving the section)
        #[arg(short = 'k', long, default_value_t = QueryKind::Center)]
        kind: QueryKind,

        #[arg(allow_negative_numbers = true)]
        values: Vec<f64>,
    },
    /// Print the effective configuration and section
    Show,
    /// Write the default config file
    Init,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.clone() {
        Some(Commands::Diff { kind, values }) => diff(&resolve_config(&cli)?, kind, &values),
        Some(Commands::Show) => show(&resolve_config(&cli)?),
        Some(Commands::Init) => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<SectionConfig> {
    let mut config = match &cli.config {
        Some(path) => config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => config::load_or_default(),
    };

    config.apply_overrides(cli.section_size, cli.pie_size, cli.unit, cli.center);
    Ok(config)
}

fn diff(config: &SectionConfig, kind: QueryKind, values: &[f64]) -> anyhow::Result<()> {
    let mut section = config.build()?;
    log::info!("Replaying {} queries against {}", kind, section);

    if values.is_empty() {
        let count = replay::replay(&mut section, kind, std::io::stdin().lock(), |sample| {
            println!("{}", sample)
        })?;
        log::debug!("Replayed {} values from stdin", count);
    } else {
        for sample in replay::replay_values(&mut section, kind, values) {
            println!("{}", sample);
        }
    }

    Ok(())
}

fn show(config: &SectionConfig) -> anyhow::Result<()> {
    let section = config.build()?;

    println!("unit:         {}", config.unit);
    println!("pie size:     {}", section.pie_size());
    println!("section size: {}", section.section_size());
    println!("lower bound:  {}", section.lower_bound());
    println!("center:       {}", section.center());
    println!("upper bound:  {}", section.upper_bound());
    println!("crosses seam: {}", section.crosses_seam());
    Ok(())
}
