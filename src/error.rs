// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Not a git repository")]
    #[diagnostic(
        code(gitmit::git::not_repo),
        help("Run this command inside a git repository")
    )]
    NotAGitRepo,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Provider '{provider}' does not support {action}")]
    #[diagnostic(
        code(gitmit::provider::unsupported),
        help("Pick a model from a service that supports this action")
    )]
    Unsupported { provider: String, action: String },

    #[error("Cannot connect to Ollama at {host}")]
    #[diagnostic(
        code(gitmit::ollama::not_running),
        help("Start Ollama with: ollama serve")
    )]
    OllamaNotRunning { host: String },

    #[error("Provider '{provider}' error: {message}")]
    #[diagnostic(code(gitmit::provider::error))]
    Provider { provider: String, message: String },

    #[error("Invalid commit message: {0}")]
    #[diagnostic(
        code(gitmit::commit::invalid),
        help("Run again, or use --mode manual to write the message yourself")
    )]
    InvalidCommitMessage(String),

    #[error("Prompt template '{name}' not found")]
    #[diagnostic(
        code(gitmit::prompt::template_not_found),
        help("Add {name}.txt to the prompts_dir configured for gitmit")
    )]
    TemplateNotFound { name: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(gitmit::config::error))]
    Config(String),

    #[error("Git error: {0}")]
    #[diagnostic(code(gitmit::git::error))]
    Git(String),

    #[error("Usage ledger error: {0}")]
    #[diagnostic(code(gitmit::usage::error))]
    Ledger(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
