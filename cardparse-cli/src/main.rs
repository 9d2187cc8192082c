use anyhow::{Context, Result, bail};
use cardparse_client::{HttpParseService, SubmissionController};
use cardparse_core::{BankId, RequestState, SelectedFile, StatementSummary};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod form;
mod logging;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(name = "cardparse", version, about = "Credit card statement parser client")]
struct Cli {
    /// Parser endpoint (overrides [service].endpoint in ~/.cardparse/config.toml)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one statement and print the parsed result
    Parse {
        /// Bank whose statement layout applies (hdfc, idfc, axis, icici)
        #[arg(long)]
        bank: Option<BankId>,

        /// PDF statement to upload
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print a short statement summary above the raw result
        #[arg(long, default_value_t = false)]
        summary: bool,

        /// Single-line JSON instead of pretty-printed
        #[arg(long, default_value_t = false)]
        compact: bool,
    },

    /// Interactive statement form (TTY required)
    Form,

    /// List supported banks
    Banks,

    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.cardparse/config.toml with defaults (if missing)
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Command::Form) {
        logging::init_file(&state::log_path()?, cli.verbose)?;
    } else {
        logging::init_stderr(cli.verbose);
    }

    let cfg = config::load_config()?.with_endpoint_override(cli.endpoint);

    match cli.command {
        Command::Parse {
            bank,
            file,
            summary,
            compact,
        } => {
            parse_once(&cfg, bank, file, summary, compact).await?;
        }

        Command::Form => {
            form::run_form(&cfg)?;
        }

        Command::Banks => {
            for b in BankId::ALL {
                let marker = if b == cfg.form.default_bank { "*" } else { " " };
                println!("{marker} {:<6} {}", b.as_str(), b.label());
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config(&cfg)?,
        },
    }

    Ok(())
}

async fn parse_once(
    cfg: &config::Config,
    bank: Option<BankId>,
    file: Option<PathBuf>,
    summary: bool,
    compact: bool,
) -> Result<()> {
    let service = Arc::new(HttpParseService::new(cfg.service.endpoint.clone()));
    let mut controller = SubmissionController::with_bank(service, cfg.form.default_bank);

    if let Some(b) = bank {
        controller.select_bank(b);
    }
    if let Some(path) = file {
        let selected = SelectedFile::from_path(&path)
            .with_context(|| format!("selecting {}", path.display()))?;
        controller.select_file(Some(selected));
    }

    match controller.submit().await {
        RequestState::Succeeded(result) => {
            if summary {
                match StatementSummary::from_result(result) {
                    Some(s) => println!("{}", render::render_summary(&s)),
                    None => eprintln!("(no statement summary in this result)"),
                }
            }
            print!("{}", render::render_parsed(result, compact));
            Ok(())
        }
        RequestState::Failed(message) => bail!("{message}"),
        other => bail!("submission ended in unexpected state: {}", other.name()),
    }
}
