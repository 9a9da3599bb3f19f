use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rootcause::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use machina_protos::config::ServerConfig;
use machina_protos::manager::PrototypeProvider;
use machina_protos::prototypes::PrototypeClass;
use machina_protos::server::Server;

/// Load, check and rewrite a game's prototype XML tree
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load everything and print a per-class summary
    Check {
        /// Server configuration file (TOML)
        config: PathBuf,
    },
    /// List loaded prototypes
    List {
        config: PathBuf,

        /// Only prototypes of this class
        #[clap(short, long)]
        class: Option<String>,

        /// Print JSON instead of one line per prototype
        #[clap(long)]
        json: bool,
    },
    /// Load and save the prototype tree again
    Resave {
        config: PathBuf,

        /// Output directory. Defaults to `output_dir` from the config.
        out_dir: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_server(config: &PathBuf) -> Result<Server, Report> {
    let config = ServerConfig::load(config)
        .context_with(|| format!("Failed to read config {}", config.display()))?;
    let server = Server::load(&config).context("Failed to load prototypes")?;
    Ok(server)
}

fn check(config: &PathBuf) -> Result<(), Report> {
    let server = load_server(config)?;
    let summary = server.load_summary();

    let mut per_class: BTreeMap<&str, usize> = BTreeMap::new();
    for proto in server.prototypes() {
        *per_class.entry(proto.class().as_str()).or_default() += 1;
    }
    for (class, count) in &per_class {
        println!("{class:<28} {count}");
    }
    println!(
        "{} loaded, {} failed, {} skipped",
        summary.loaded, summary.failed, summary.skipped
    );

    if summary.failed > 0 {
        bail!("{} prototypes failed to load", summary.failed);
    }
    Ok(())
}

fn list(config: &PathBuf, class: Option<&str>, json: bool) -> Result<(), Report> {
    let class = class
        .map(|name| {
            PrototypeClass::from_name(name)
                .ok_or_else(|| rootcause::report!("Unknown prototype class: {name}"))
        })
        .transpose()?;
    let server = load_server(config)?;
    let selected = server
        .prototypes()
        .iter()
        .filter(|proto| class.is_none_or(|class| proto.class() == class));

    if json {
        let entries: Vec<_> = selected
            .map(|proto| {
                serde_json::json!({
                    "id": proto.id().map(|id| id.raw()),
                    "name": proto.name(),
                    "class": proto.class().as_str(),
                    "parent": proto.parent().name(),
                    "abstract": proto.is_abstract(),
                    "price": proto.price(),
                })
            })
            .collect();
        let text = serde_json::to_string_pretty(&entries)
            .map_err(|e| rootcause::report!("Failed to serialize listing: {e}"))?;
        println!("{text}");
    } else {
        for proto in selected {
            let id = proto.id().map(|id| id.to_string()).unwrap_or_default();
            println!("{id:>6} {:<24} {}", proto.class(), proto.name());
        }
    }
    Ok(())
}

fn resave(config: &PathBuf, out_dir: Option<PathBuf>) -> Result<(), Report> {
    let server = load_server(config)?;
    let Some(out_dir) = out_dir.or_else(|| server.config().output_path()) else {
        bail!("No output directory given and none configured");
    };
    server
        .save_prototypes(&out_dir)
        .context_with(|| format!("Failed to save prototypes to {}", out_dir.display()))?;
    info!(dir = %out_dir.display(), "prototypes written");
    Ok(())
}

fn main() -> Result<(), Report> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Check { config } => check(&config),
        Commands::List {
            config,
            class,
            json,
        } => list(&config, class.as_deref(), json),
        Commands::Resave { config, out_dir } => resave(&config, out_dir),
    }
}
