//! logindock - sign in to web apps and open them in the right browser.
//!
//! This is the main entry point for the logindock CLI.

mod commands;
mod config;

use clap::{Args, Parser, Subcommand};
use config::Config;
use logindock_accounts::Browser;
use logindock_util::LogConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logindock")]
#[command(author, version, about = "Credential launcher for web app logins", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read configuration from this file as well
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the background process hosting the login bridge
    Serve {
        /// Address to bind to
        #[arg(short, long)]
        address: Option<String>,
    },
    /// List stored credentials grouped by environment
    List {
        /// Print the collection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a credential
    Add {
        #[command(flatten)]
        record: RecordArgs,
        /// Password, stored in clear text
        #[arg(long)]
        password: String,
        /// Base URL for sign-in and the post-login destination
        #[arg(long)]
        url: String,
        /// Browser to open (Chrome, Firefox, Arc, Edge, Safari)
        #[arg(long)]
        browser: Option<Browser>,
    },
    /// Change a stored credential
    Edit {
        #[command(flatten)]
        record: RecordArgs,
        /// Move the credential to another environment
        #[arg(long)]
        new_env: Option<String>,
        /// New domain
        #[arg(long)]
        new_domain: Option<String>,
        /// New login id
        #[arg(long)]
        new_login_id: Option<String>,
        /// New password
        #[arg(long)]
        password: Option<String>,
        /// New URL
        #[arg(long)]
        url: Option<String>,
        /// New browser
        #[arg(long)]
        browser: Option<Browser>,
    },
    /// Delete a stored credential
    Delete {
        #[command(flatten)]
        record: RecordArgs,
    },
    /// Merge credentials exported elsewhere (clipboard by default)
    Import {
        /// Read from a file
        #[arg(short, long, conflicts_with = "stdin")]
        file: Option<PathBuf>,
        /// Read from standard input
        #[arg(long)]
        stdin: bool,
    },
    /// Export all credentials as JSON (clipboard by default)
    Export {
        /// Write to a file
        #[arg(short, long, conflicts_with = "stdout")]
        file: Option<PathBuf>,
        /// Write to standard output
        #[arg(long)]
        stdout: bool,
    },
    /// Sign in with a stored credential through the background process
    Login {
        #[command(flatten)]
        record: RecordArgs,
        /// Open this browser instead of the stored one
        #[arg(long)]
        browser: Option<Browser>,
        /// Wait for the login to finish and print the outcome
        #[arg(long)]
        wait: bool,
    },
    /// Show the effective configuration
    Config,
    /// Print version information
    Version,
}

/// Identifies one stored credential.
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Environment label
    #[arg(long)]
    pub env: String,
    /// Account domain
    #[arg(long)]
    pub domain: String,
    /// Account identifier
    #[arg(long)]
    pub login_id: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, sources) = Config::load(cli.config.as_deref()).await?;

    // The background process logs to stdout, everything else to a file
    let log_file = logindock_util::log::init(&LogConfig {
        level: config.log_level()?,
        verbose: cli.verbose,
        stdout: matches!(cli.command, Commands::Serve { .. }),
        dir: None,
    });
    if let Some(path) = &log_file {
        tracing::debug!(path = %path.display(), "Logging to file");
    }
    for source in &sources {
        tracing::debug!(path = %source.display(), "Loaded config");
    }

    match cli.command {
        Commands::Serve { address } => commands::run_server(&config, address).await,
        Commands::List { json } => commands::list_accounts(&config, json).await,
        Commands::Add {
            record,
            password,
            url,
            browser,
        } => commands::add_account(&config, record, password, url, browser).await,
        Commands::Edit {
            record,
            new_env,
            new_domain,
            new_login_id,
            password,
            url,
            browser,
        } => {
            let changes = commands::RecordChanges {
                env: new_env,
                domain: new_domain,
                login_id: new_login_id,
                password,
                url,
                browser,
            };
            commands::edit_account(&config, record, changes).await
        }
        Commands::Delete { record } => commands::delete_account(&config, record).await,
        Commands::Import { file, stdin } => {
            let source = commands::TransferTarget::from_flags(file, stdin);
            commands::import_accounts(&config, source).await
        }
        Commands::Export { file, stdout } => {
            let target = commands::TransferTarget::from_flags(file, stdout);
            commands::export_accounts(&config, target).await
        }
        Commands::Login {
            record,
            browser,
            wait,
        } => commands::login(&config, record, browser, wait).await,
        Commands::Config => commands::show_config(&config, &sources),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn print_version() {
    println!("logindock {}", env!("CARGO_PKG_VERSION"));
}
