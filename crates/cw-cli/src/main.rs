//! CLI frontend for Cosmic Whisper tarot readings.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "cw",
    about = "Cosmic Whisper: tarot readings with a reflective journal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding the journal (default: ~/.cosmic-whisper)
    #[arg(long, global = true, env = "CW_JOURNAL_DIR")]
    journal_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive reading
    Read {
        /// Ask this question instead of prompting for one
        #[arg(short, long)]
        question: Option<String>,

        /// Use this spread id once the question is analyzed
        #[arg(short, long)]
        spread: Option<String>,

        /// RNG seed for reproducible draws
        #[arg(long)]
        seed: Option<u64>,

        /// Chance that each card comes up reversed (0.0-1.0)
        #[arg(long, default_value = "0.3")]
        reversal: f64,
    },

    /// Browse and export saved readings
    Journal {
        #[command(subcommand)]
        action: JournalAction,
    },

    /// List the available spreads
    Spreads,

    /// List the card catalog, or show one card
    Cards {
        /// Card id or name (English or Chinese)
        name: Option<String>,
    },

    /// List deck themes or try a custom card back
    Theme {
        /// Image to use as the card back
        #[arg(long)]
        back_image: Option<PathBuf>,

        /// Activate a shipped theme by id
        #[arg(long)]
        select: Option<String>,
    },
}

#[derive(Subcommand)]
enum JournalAction {
    /// List saved readings, most recent first
    List,

    /// Show one saved reading
    Show {
        /// Entry id
        id: String,
    },

    /// Export the journal
    Export {
        /// Output format: markdown, text
        #[arg(default_value = "markdown")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let journal_dir = cli.journal_dir;

    let result = match cli.command {
        Commands::Read {
            question,
            spread,
            seed,
            reversal,
        } => commands::read::run(
            journal_dir.as_deref(),
            question.as_deref(),
            spread.as_deref(),
            seed,
            reversal,
        ),
        Commands::Journal { action } => match action {
            JournalAction::List => commands::journal::list(journal_dir.as_deref()),
            JournalAction::Show { id } => commands::journal::show(journal_dir.as_deref(), &id),
            JournalAction::Export { format, output } => {
                commands::journal::export(journal_dir.as_deref(), &format, output.as_deref())
            }
        },
        Commands::Spreads => commands::spreads::run(),
        Commands::Cards { name } => commands::cards::run(name.as_deref()),
        Commands::Theme { back_image, select } => {
            commands::theme::run(back_image.as_deref(), select.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
