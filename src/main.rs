use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use log::{debug, info};
use macaronictl::kernel::{kernel_entries, KernelEntry};
use macaronictl::{BrowserPackage, Config, StoneSearcher, StonesPack};
use std::path::PathBuf;

/// Macaroni OS kernel and browser package helper
#[derive(Debug, Parser)]
#[command(name = "macaronictl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Kernel queries
    Kernel {
        #[command(subcommand)]
        action: KernelAction,
    },
    /// Browser package options
    Browser {
        #[command(subcommand)]
        action: BrowserAction,
    },
}

#[derive(Debug, Subcommand)]
enum KernelAction {
    /// List kernels available in the repositories
    Availables {
        #[arg(long)]
        json: bool,
    },
    /// List installed kernels
    List {
        #[arg(long)]
        json: bool,
    },
    /// List kernel modules
    Modules {
        /// Kernel branch, e.g. 6.1
        #[arg(long, short, default_value = "")]
        branch: String,
        /// Only installed modules
        #[arg(long)]
        installed: bool,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum BrowserAction {
    /// Merge package files and print the enabled options
    Options {
        /// Package definition files (JSON), merged in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let env = Env::default().default_filter_or(config.log_level.as_str());
    logger_builder(env, cli.debug).init();

    debug!("Command line: {:?}", cli);
    debug!("Configuration: {:?}", config);

    match cli.command {
        Commands::Kernel { action } => run_kernel(action, &config),
        Commands::Browser { action } => run_browser(action),
    }
}

/// Precedence: --debug, then the environment filter, then its default
fn logger_builder(env: Env<'_>, debug: bool) -> Builder {
    let mut builder = Builder::from_env(env);
    if debug {
        builder.parse_filters("debug");
    }
    builder
}

fn run_kernel(action: KernelAction, config: &Config) -> Result<()> {
    let searcher = StoneSearcher::new(config);
    debug!("Using luet binary {}", searcher.executable().display());

    match action {
        KernelAction::Availables { json } => {
            let pack = searcher.available_kernels().context("Failed to search available kernels")?;
            print_kernels(&pack, json)
        }
        KernelAction::List { json } => {
            let pack = searcher.installed_kernels().context("Failed to search installed kernels")?;
            print_kernels(&pack, json)
        }
        KernelAction::Modules { branch, installed, json } => {
            let pack = searcher
                .available_extra_modules(&branch, installed)
                .context("Failed to search kernel modules")?;
            print_modules(&pack, json)
        }
    }
}

fn print_kernels(pack: &StonesPack, json: bool) -> Result<()> {
    let entries = kernel_entries(pack);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        info!("No kernels found");
        return Ok(());
    }

    println!("{:<28} {:<14} {:<12} {:<5} {:<12} {}", "KERNEL", "VERSION", "EOL", "LTS", "RELEASED", "TYPE");
    for KernelEntry { package, version, annotation, .. } in &entries {
        println!("{:<28} {:<14} {:<12} {:<5} {:<12} {}",
                 package, version, annotation.eol, annotation.lts,
                 annotation.released, annotation.kernel_type);
    }

    Ok(())
}

fn print_modules(pack: &StonesPack, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(pack)?);
        return Ok(());
    }

    if pack.is_empty() {
        info!("No kernel modules found");
        return Ok(());
    }

    println!("{:<48} {:<20} {}", "MODULE", "VERSION", "REPOSITORY");
    for stone in &pack.stones {
        println!("{:<48} {:<20} {}", stone.package_name(), stone.version, stone.repository);
    }

    Ok(())
}

fn run_browser(action: BrowserAction) -> Result<()> {
    match action {
        BrowserAction::Options { files, json } => {
            let pkg = BrowserPackage::load_merged(&files)?;

            if !pkg.has_options() {
                info!("[{}] No options enabled", pkg.package);
            }

            let options = pkg.get_all_options();
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                for opt in options {
                    println!("{}", opt);
                }
            }

            Ok(())
        }
    }
}
