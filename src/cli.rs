// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "gitmit")]
#[command(version)]
#[command(about = "Commit message assistant for the changes in your working tree", long_about = None)]
pub struct Cli {
    /// Repository path
    #[arg(short, long, global = true, default_value = ".")]
    pub path: PathBuf,

    /// Commit model as service/model (ollama, google, openrouter)
    #[arg(short, long, global = true, env = "GITMIT_MODEL")]
    pub model: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate a commit message for all uncommitted changes and commit them
    Commit(CommitArgs),
    /// Show how gitmit classifies the current changes
    Analyze {
        /// Print the file list and analysis context
        #[arg(long)]
        debug: bool,
    },
    /// Show current configuration
    Config,
    /// Initialize config file
    Init,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommitArgs {
    /// Short explanation of the changes, used as the primary hint
    #[arg(short, long)]
    pub brief: Option<String>,

    /// Never use the feat type
    #[arg(long)]
    pub no_feat: bool,

    /// Print the files and analysis used to build the prompt
    #[arg(long)]
    pub debug: bool,

    /// Write the message yourself or let the model do it
    #[arg(long, value_enum, default_value_t = Mode::Ai)]
    pub mode: Mode,

    /// Print message only, don't commit
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmations
    #[arg(short = 'y', long, visible_alias = "force")]
    pub yes: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    Manual,
    #[default]
    Ai,
}
