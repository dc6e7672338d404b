mod display;
mod error;
mod export;
mod parser;
mod persistence;
mod roster;
mod web;

use std::io::Read;
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use display::{print_roster_sheet, RosterSheet};
use export::{write_export, ExportFormat};
use parser::{load_member_names, parse_member_names};
use persistence::JsonFileGateway;
use roster::RosterStore;

/// Team splitter and car board for game days
#[derive(Parser, Debug)]
#[command(name = "squad-roster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Where the roster is saved between runs
    #[arg(long, global = true, env = "ROSTER_DATA", default_value = "roster.json")]
    data: PathBuf,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web board
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },

    /// Add members from a file (one name per line, or a CSV); `-` reads stdin
    Add { file: PathBuf },

    /// Split everyone into red and green teams
    Split {
        /// Fixed seed for a repeatable split
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the current roster
    Show,

    /// Write today's roster sheet to a file
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Clear the roster and its saved copy
    Reset,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn show(store: &RosterStore) {
    print_roster_sheet(&RosterSheet::from_store(store), &store.stats());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut store = RosterStore::open(Box::new(JsonFileGateway::new(&cli.data)));

    match cli.command {
        Command::Serve { bind, port } => {
            web::start_server(&bind, port, store).await?;
        }
        Command::Add { file } => {
            let names = if file.as_os_str() == "-" {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                parse_member_names(&text)
            } else {
                load_member_names(&file)?
            };
            let added = store.add_members(names);
            println!("Added {} members ({} total)", added.len(), store.members().len());
        }
        Command::Split { seed } => {
            match seed {
                Some(seed) => store.split_teams_with(&mut StdRng::seed_from_u64(seed)),
                None => store.split_teams(),
            }
            show(&store);
        }
        Command::Show => show(&store),
        Command::Export { format, out_dir } => {
            let sheet = RosterSheet::from_store(&store);
            let path = write_export(&sheet, &out_dir, format, Local::now().date_naive())?;
            println!("Roster saved to {}", path.display());
        }
        Command::Reset => {
            store.reset();
            info!(data = %cli.data.display(), "Cleared saved roster");
        }
    }

    Ok(())
}
