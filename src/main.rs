//! hookline: git hooks made easy.
//!
//! Installs a small script for every git hook and, when git fires one, runs
//! the command configured for it in `hookline.toml` or `package.json`.

mod config;
mod env;
mod hooks;
mod installer;
mod package;
mod runner;
mod upgrade;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::{fs, process};
use tracing_subscriber::EnvFilter;

use hooks::ownership::classify;
use hooks::{hook_paths, HookName};
use installer::{InstallOptions, InstallReport, UninstallReport};

#[derive(Parser)]
#[command(name = "hookline")]
#[command(about = "Install git hooks and run the commands configured for them")]
#[command(version)]
struct Cli {
    /// Path to the git directory (default: search upward for .git)
    #[arg(long, global = true)]
    git_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install hook scripts into .git/hooks
    Install {
        /// Directory to search upward from for package.json (default: current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Remove hook scripts written by hookline
    Uninstall {
        /// Directory to search upward from for package.json (default: current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Run the command configured for a hook (called by the hook scripts)
    Run {
        /// Hook name, e.g. pre-commit
        hook: HookName,

        /// Arguments git passed to the hook
        git_params: Option<String>,
    },

    /// Move hook commands from package.json scripts into hookline.hooks
    Upgrade {
        /// Project directory (default: search upward for package.json)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Show every hook file and who wrote it
    List,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: cannot read current directory: {e}");
            process::exit(1);
        }
    };
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Install { dir } => {
            let start = dir.map(|d| cwd.join(d)).unwrap_or_else(|| cwd.clone());
            let git_dir = resolve_git_dir(cli.git_dir, &cwd);
            let options = InstallOptions {
                skip_install: env::skip_install(),
                is_ci: env::is_ci(),
                runner: std::env::current_exe().unwrap_or_else(|_| PathBuf::from("hookline")),
            };
            match installer::install(&git_dir, &start, &options, &mut stdout) {
                Ok(InstallReport::Installed(actions)) => {
                    tracing::info!(hooks = actions.len(), "installed");
                }
                Ok(InstallReport::Skipped(reason)) => {
                    tracing::info!(?reason, "install skipped");
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            }
        }

        Commands::Uninstall { dir } => {
            let start = dir.map(|d| cwd.join(d)).unwrap_or_else(|| cwd.clone());
            let git_dir = resolve_git_dir(cli.git_dir, &cwd);
            match installer::uninstall(&git_dir, &start, &mut stdout) {
                Ok(UninstallReport::Removed(hooks)) => {
                    tracing::info!(hooks = hooks.len(), "uninstalled");
                }
                Ok(UninstallReport::OutsideProject) => {}
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            }
        }

        Commands::Run { hook, git_params } => {
            let code = runner::run(
                hook,
                &cwd,
                git_params.as_deref(),
                &runner::shell::ShellRunner,
                &mut stdout,
            );
            let _ = stdout.flush();
            process::exit(code);
        }

        Commands::Upgrade { dir } => {
            let root = dir
                .or_else(|| config::find_project_root(&cwd))
                .unwrap_or_else(|| cwd.clone());
            match upgrade::upgrade(&root, &mut stdout) {
                Ok(moved) if !moved.is_empty() => {
                    println!("Updated {}", root.join(package::MANIFEST_FILE).display());
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            }
        }

        Commands::List => {
            let git_dir = resolve_git_dir(cli.git_dir, &cwd);
            for (hook, path) in hook_paths(&git_dir) {
                let owner = match fs::read(&path) {
                    Ok(bytes) => classify(&String::from_utf8_lossy(&bytes)).label(),
                    Err(_) => "-",
                };
                println!("{:<20} {owner}", hook.as_str());
            }
        }
    }
}

/// Diagnostics go to stderr so hook output stays clean. Filter with `HOOKLINE_LOG`.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("HOOKLINE_LOG").unwrap_or_else(|_| EnvFilter::new("hookline=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_git_dir(explicit: Option<PathBuf>, cwd: &Path) -> PathBuf {
    match explicit.or_else(|| config::find_git_dir(cwd)) {
        Some(dir) => cwd.join(dir),
        None => {
            eprintln!("Error: Could not locate .git directory. Are you in a git repo?");
            process::exit(1);
        }
    }
}
