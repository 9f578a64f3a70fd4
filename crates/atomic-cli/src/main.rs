use atomic_core::{Catalog, Config, Engine};
use atomic_css::EmitOptions;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "atomic")]
#[command(about = "Atomic CSS builder: expands atomic object catalogs into CSS")]
#[command(version)]
struct Cli {
    /// Log expansion progress (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a CSS file from a catalog and a config
    Build {
        /// Catalog of atomic object definitions (JSON)
        catalog: String,
        /// Configuration object (JSON)
        config: String,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit minified CSS
        #[arg(long)]
        minify: bool,
        /// Print the build table as JSON instead of CSS
        #[arg(long, conflicts_with = "minify")]
        json: bool,
    },

    /// Validate a catalog and config without writing output
    Check {
        /// Catalog of atomic object definitions (JSON)
        catalog: String,
        /// Configuration object (JSON)
        config: String,
    },

    /// List the definitions in a catalog
    List {
        /// Catalog of atomic object definitions (JSON)
        catalog: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build {
            catalog,
            config,
            output,
            minify,
            json,
        } => cmd_build(&catalog, &config, output.as_deref(), minify, json),
        Command::Check { catalog, config } => cmd_check(&catalog, &config),
        Command::List { catalog } => cmd_list(&catalog),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn load_catalog(path: &str) -> Catalog {
    match Catalog::from_json(&read_source(path)) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("{path}: {e}");
            std::process::exit(1);
        }
    }
}

fn load_engine(catalog_path: &str, config_path: &str) -> Engine {
    let catalog = load_catalog(catalog_path);
    let config = match Config::from_json(&read_source(config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{config_path}: {e}");
            std::process::exit(1);
        }
    };
    info!(definitions = catalog.len(), "loaded catalog");

    match Engine::new(catalog, config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn cmd_build(catalog: &str, config: &str, output: Option<&str>, minify: bool, json: bool) {
    let engine = load_engine(catalog, config);
    let view = match engine.build_view() {
        Ok(view) => view,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let text = if json {
        match serde_json::to_string_pretty(&view) {
            Ok(text) => text + "\n",
            Err(e) => {
                eprintln!("Error serializing build: {e}");
                std::process::exit(1);
            }
        }
    } else {
        let settings = engine
            .config()
            .and_then(|c| c.settings.clone())
            .unwrap_or_default();
        match atomic_css::generate(&view, &settings, &EmitOptions { minify }) {
            Ok(css) => css,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &text) {
                eprintln!("Error writing {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("Built: {path} ({} selectors)", engine.build().len());
        }
        None => print!("{text}"),
    }
}

fn cmd_check(catalog: &str, config: &str) {
    let engine = load_engine(catalog, config);
    eprintln!("OK: {} selectors", engine.build().len());
}

fn cmd_list(catalog: &str) {
    let catalog = load_catalog(catalog);
    for definition in catalog.iter() {
        println!(
            "{:<15} {:<20} {}",
            definition.kind(),
            definition.id(),
            definition.name().unwrap_or("")
        );
    }
}
