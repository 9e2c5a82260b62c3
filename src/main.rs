use std::error::Error;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lampstand::core::config::{self, CliOverrides};
use lampstand::markup::{collect_links, decode_references, prepare_for_display};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "lampstand", about = "Prepare text-module markup for display")]
struct Args {
    /// More logging in lampstand.log (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Escape and condense raw module markup (FILE or stdin)
    Render {
        file: Option<PathBuf>,
        /// Print numeric references as the characters they encode
        #[arg(long)]
        decode: bool,
    },
    /// List the condensed links in raw module markup as JSON
    Links { file: Option<PathBuf> },
    /// Show the resolved configuration
    Config {
        #[arg(long)]
        library_dir: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        module: Option<String>,
        /// Save the resolved values to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to lampstand.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if let Ok(log_file) = File::create("lampstand.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("lampstand: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Render { file, decode } => {
            let prepared = prepare_for_display(&read_input(file)?)?;
            if decode {
                print!("{}", decode_references(&prepared));
            } else {
                print!("{prepared}");
            }
        }
        Command::Links { file } => {
            let prepared = prepare_for_display(&read_input(file)?)?;
            let links = collect_links(&prepared)?;
            log::info!("Found {} links", links.len());
            println!("{}", serde_json::to_string_pretty(&links)?);
        }
        Command::Config {
            library_dir,
            source,
            module,
            write,
        } => {
            let loaded = config::load_config()?;
            let cli = CliOverrides {
                library_dir,
                default_source: source,
                module,
            };
            let resolved = config::resolve(&loaded, &cli);
            print!("{}", toml::to_string_pretty(&resolved)?);
            if write {
                let path = config::config_path().ok_or("could not determine home directory")?;
                config::save_config(&path, &resolved.to_config())?;
                eprintln!("Saved {}", path.display());
            }
        }
    }
    Ok(())
}

/// Reads all of FILE, or stdin when no file is given.
fn read_input(file: Option<PathBuf>) -> io::Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path),
        None => {
            let mut raw = Vec::new();
            io::stdin().read_to_end(&mut raw)?;
            Ok(raw)
        }
    }
}
