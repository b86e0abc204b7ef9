//! Event Introspection CLI Application
//!
//! This is the command-line interface for the event introspection library.
//! It loads introspection documents saved from bus providers and lists the
//! events (flagging the sessionless ones) and actions they offer.

use anyhow::{Context, Result};
use clap::Parser;
use event_introspect::{Introspector, ParserConfig, SessionPort, SESSION_PORT_ANY};
use std::path::PathBuf;

mod config;
mod report;

use config::{AppConfig, InputConfig, OutputConfig, OutputFormat};

/// Event Introspect - List events and actions from introspection XML
#[derive(Parser, Debug)]
#[command(name = "event-introspect-cli")]
#[command(about = "List events and actions described by introspection XML", long_about = None)]
#[command(version)]
struct Args {
    /// Path to introspection XML file(s) (can be repeated)
    #[arg(short = 'x', long, value_name = "FILE")]
    xml: Vec<PathBuf>,

    /// Bus name of the provider the XML was obtained from
    #[arg(long, value_name = "NAME", default_value_t = config::default_bus_name())]
    bus_name: String,

    /// Session port the provider was reached on
    #[arg(long, value_name = "PORT", default_value_t = SESSION_PORT_ANY)]
    port: SessionPort,

    /// Object path that was introspected
    #[arg(long, value_name = "PATH", default_value_t = config::default_path())]
    path: String,

    /// Preferred description language
    #[arg(long, value_name = "LANG")]
    language: Option<String>,

    /// Only list members that carry a description
    #[arg(long)]
    require_descriptions: bool,

    /// Warn about invalid attribute values instead of failing
    #[arg(long)]
    lenient: bool,

    /// Only list sessionless events
    #[arg(long)]
    sessionless_only: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Txt)]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Build the equivalent of a config file from the command line flags
    fn to_app_config(&self) -> AppConfig {
        let mut parser = ParserConfig::new()
            .with_required_descriptions(self.require_descriptions)
            .with_strict(!self.lenient);
        if let Some(language) = &self.language {
            parser = parser.with_language(language.as_str());
        }

        AppConfig {
            inputs: self
                .xml
                .iter()
                .map(|file| InputConfig {
                    file: file.clone(),
                    bus_name: self.bus_name.clone(),
                    port: self.port,
                    path: self.path.clone(),
                })
                .collect(),
            parser,
            output: OutputConfig {
                format: self.format,
                file: self.output.clone(),
                sessionless_only: self.sessionless_only,
            },
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Event Introspect CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using introspection library v{}", event_introspect::VERSION);

    let app_config = if !args.xml.is_empty() {
        args.to_app_config()
    } else if let Some(config_path) = &args.config {
        log::info!("Loading configuration from: {:?}", config_path);
        config::load_config(config_path)?
    } else {
        // No arguments - show help
        println!("Event Introspect - No input specified");
        println!("\nQuick Start:");
        println!("  event-introspect-cli --xml lights.xml --bus-name :1.42 --port 25 --path /lights");
        println!("  event-introspect-cli --xml lights.xml --sessionless-only --format json");
        println!("\nFor several providers:");
        println!("  event-introspect-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    };

    run(&app_config)
}

/// Load every input, then render the catalog
fn run(app_config: &AppConfig) -> Result<()> {
    let mut introspector = Introspector::with_config(app_config.parser.clone());

    for input in &app_config.inputs {
        let report = introspector
            .add_file(&input.bus_name, input.port, &input.path, &input.file)
            .with_context(|| format!("Failed to load introspection file {:?}", input.file))?;

        log::debug!(
            "{} at {}: {} events ({} sessionless), {} actions",
            report.bus_name,
            report.object_path,
            report.events,
            report.sessionless_events,
            report.actions
        );
        for child in &report.child_paths {
            log::info!("Child object not loaded: {} {}", report.bus_name, child);
        }
    }

    log::info!("Catalog: {}", report::summary(&introspector.catalog_stats()));

    let output = &app_config.output;
    let rendered = match output.format {
        OutputFormat::Txt => report::render_txt(introspector.catalog(), output.sessionless_only),
        OutputFormat::Json => report::render_json(introspector.catalog(), output.sessionless_only)?,
    };

    match &output.file {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
