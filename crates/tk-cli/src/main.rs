//! `tokenkit` — inspect and import Figma Variables exports from the shell.
//!
//! Every command runs the same upload checks as the dashboard (extension,
//! size, JSON syntax, structure) before touching the tokens.
//! Set `RUST_LOG=debug` for pipeline logging on stderr.

mod commands;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tk_import::ImportConfig;

#[derive(Parser)]
#[command(name = "tokenkit", version, about = "Figma Variables → design tokens")]
struct Cli {
    /// Maximum accepted file size in bytes.
    #[arg(long, global = true, default_value_t = ImportConfig::default().max_file_size)]
    max_size: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a file looks like a Figma Variables export.
    Validate { file: PathBuf },
    /// Print the parse result as JSON.
    Parse {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Token counts by category and type.
    Stats { file: PathBuf },
    /// Find tokens by name, path, or CSS variable.
    Search {
        file: PathBuf,
        query: String,
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Emit a CSS custom-property stylesheet.
    Css {
        file: PathBuf,
        #[arg(long, default_value = ":root")]
        selector: String,
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long)]
        no_comments: bool,
    },
    /// Report CSS name collisions and degraded values.
    Lint { file: PathBuf },
    /// Dry-run a theme import into an in-memory theme service.
    Import {
        file: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

impl Command {
    fn file(&self) -> &PathBuf {
        match self {
            Command::Validate { file }
            | Command::Parse { file, .. }
            | Command::Stats { file }
            | Command::Search { file, .. }
            | Command::Css { file, .. }
            | Command::Lint { file }
            | Command::Import { file, .. } => file,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ImportConfig {
        max_file_size: cli.max_size,
        ..ImportConfig::default()
    };
    let file = commands::load(cli.command.file(), &config)?;
    log::debug!("loaded {} ({} bytes)", file.name, file.size);

    let output = match &cli.command {
        Command::Validate { .. } => commands::validate(&file),
        Command::Parse { pretty, .. } => commands::parse(&file, *pretty)?,
        Command::Stats { .. } => commands::stats(&file),
        Command::Search {
            query, category, ..
        } => commands::search(&file, query, category)?,
        Command::Css {
            selector,
            category,
            no_comments,
            ..
        } => commands::css(&file, selector, !no_comments, category)?,
        Command::Lint { .. } => {
            let (report, failed) = commands::lint(&file);
            print!("{report}");
            if failed {
                bail!("lint found warnings");
            }
            return Ok(());
        }
        Command::Import {
            name,
            slug,
            description,
            ..
        } => {
            commands::import_dry_run(&file, name, slug.as_deref(), description.as_deref()).await?
        }
    };

    print!("{output}");
    Ok(())
}
