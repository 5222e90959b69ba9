//! Codeplayground - a code playground with a persisted file tree.
//!
//! This is the main entry point for the codeplayground CLI.

mod commands;

use clap::{Parser, Subcommand};
use commands::*;
use playground_core::PlaygroundConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codeplayground")]
#[command(author, version, about = "Code playground with a persisted file tree", long_about = None)]
struct Cli {
    /// Directory holding the project store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Act on the shared project with this id
    #[arg(long, global = true)]
    shared: Option<String>,

    /// Enable verbose logging (to stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List root-level files and folders
    Ls,
    /// Show the whole file tree
    Tree {
        /// Show node ids
        #[arg(long)]
        ids: bool,
    },
    /// Print a file's content
    Cat {
        /// File id, path or root-level name
        target: String,
    },
    /// Create a file or folder, e.g. `/src/app.ts`
    New {
        path: String,
        /// Create a folder
        #[arg(long)]
        folder: bool,
    },
    /// Delete a file or folder with everything in it
    Rm { target: String },
    /// Rename a file or folder
    Rename { target: String, name: String },
    /// Move a file or folder into another folder (`/` for the root)
    Mv { target: String, folder: String },
    /// Replace a file's content (from --content, --file or stdin)
    Write {
        target: String,
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Add a local file to the project root
    Upload { file: PathBuf },
    /// Run a file (the active file by default)
    Run {
        target: Option<String>,
        /// Evaluate JavaScript/TypeScript in-process
        #[arg(long)]
        native: bool,
    },
    /// Print the composed preview document
    Preview,
    /// Show the status line
    Status,
    /// Share the project and print its link
    Share,
    /// Save changes to the shared project (with --shared)
    Push,
    /// Pull the latest state of the shared project (with --shared)
    Pull,
    /// Log in as a user
    Login { user: String },
    /// Log out
    Logout,
    /// Save the project as a new version
    SaveVersion,
    /// List saved versions
    History,
    /// Restore a saved version (0 is the newest)
    Restore { index: usize },
    /// Export the project as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a project exported as JSON
    Import { file: PathBuf },
    /// List themes, or set the project theme
    Theme { name: Option<String> },
    /// Manage extensions
    Ext {
        #[command(subcommand)]
        command: ExtCommands,
    },
    /// Read or change editor settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Interactive terminal
    Shell,
    /// Show configuration
    Config,
    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum ExtCommands {
    /// List extensions and whether they are enabled
    List,
    /// Enable or disable an extension
    Toggle { id: String },
    /// Search the extension catalog
    Search { term: String },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print one setting, or all of them
    Get { key: Option<String> },
    /// Set a setting (value is JSON, or a plain string)
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir()?;
    let (config, sources) = PlaygroundConfig::load(Some(&cwd)).await?;

    let log_file = init_logging(cli.verbose, config.log_level);
    if let Some(path) = &log_file {
        tracing::debug!(path = %path.display(), "logging to file");
    }

    match &cli.command {
        Commands::Config => return show_config(&config, &sources, cli.data_dir.as_deref()),
        Commands::Version => {
            print_version();
            return Ok(());
        }
        Commands::Ext {
            command: ExtCommands::Search { term },
        } => {
            handle_ext_search(term);
            return Ok(());
        }
        _ => {}
    }

    let options = SessionOptions {
        config: &config,
        data_dir: cli.data_dir.as_deref(),
        shared: cli.shared.as_deref(),
        native_eval: matches!(cli.command, Commands::Run { native: true, .. }),
    };
    let mut session = Session::open(&options).await?;

    let result = match cli.command {
        Commands::Ls => {
            handle_ls(&mut session);
            Ok(())
        }
        Commands::Tree { ids } => {
            handle_tree(&mut session, ids);
            Ok(())
        }
        Commands::Cat { target } => handle_cat(&mut session, &target),
        Commands::New { path, folder } => handle_new(session, &path, folder).await,
        Commands::Rm { target } => handle_rm(session, &target).await,
        Commands::Rename { target, name } => handle_rename(session, &target, &name).await,
        Commands::Mv { target, folder } => handle_mv(session, &target, &folder).await,
        Commands::Write {
            target,
            content,
            file,
        } => handle_write(session, &target, content, file.as_deref()).await,
        Commands::Upload { file } => handle_upload(session, &file).await,
        Commands::Run { target, .. } => handle_run(session, target.as_deref()).await,
        Commands::Preview => {
            handle_preview(&mut session);
            Ok(())
        }
        Commands::Status => {
            handle_status(&mut session);
            Ok(())
        }
        Commands::Share => handle_share(session).await,
        Commands::Push => handle_push(session).await,
        Commands::Pull => handle_pull(session).await,
        Commands::Login { user } => handle_login(session, &user).await,
        Commands::Logout => handle_logout(session).await,
        Commands::SaveVersion => handle_save_version(session).await,
        Commands::History => handle_history(&mut session),
        Commands::Restore { index } => handle_restore(session, index).await,
        Commands::Export { output } => handle_export(session, output.as_deref()).await,
        Commands::Import { file } => handle_import(session, &file).await,
        Commands::Theme { name } => handle_theme(session, name.as_deref()).await,
        Commands::Ext { command } => match command {
            ExtCommands::List => {
                handle_ext_list(&mut session);
                Ok(())
            }
            ExtCommands::Toggle { id } => handle_ext_toggle(session, &id).await,
            ExtCommands::Search { term } => {
                handle_ext_search(&term);
                Ok(())
            }
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Get { key } => handle_settings_get(&mut session, key.as_deref()).await,
            SettingsCommands::Set { key, value } => {
                handle_settings_set(&mut session, &key, &value).await
            }
        },
        Commands::Shell => handle_shell(session, &config.autosave()).await,
        Commands::Config | Commands::Version => Ok(()),
    };

    if let Err(e) = &result {
        tracing::warn!(error = %e, "command failed");
    }
    result
}
