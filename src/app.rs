// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::future::Future;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, CommitArgs, Commands, Mode};
use crate::config::Config;
use crate::domain::{COMMIT_TYPES, ChangeMagnitude, CommitMessage};
use crate::error::{Error, Result};
use crate::services::{
    analyzer::ChangeAnalyzer,
    generator::CommitPromptGenerator,
    git::GitService,
    llm::{self, CommitRequest, Draft, ProviderAdapter},
    prompt::PromptBuilder,
    templates::PromptTemplateStore,
    usage::{FileLedger, UsageLedger},
};

/// Everything one `commit` run needs, built once after the config is known.
pub struct Services {
    pub generator: Arc<CommitPromptGenerator>,
    pub ledger: Arc<FileLedger>,
    pub commit: Box<dyn ProviderAdapter>,
    pub resume: Option<Box<dyn ProviderAdapter>>,
}

impl Services {
    pub fn build(config: &Config) -> Result<Self> {
        let generator = Arc::new(build_generator(config));
        let ledger = Arc::new(FileLedger::new(config.usage_path()?));
        let shared_ledger: Arc<dyn UsageLedger> = ledger.clone();

        let commit_spec = config.commit_spec()?;
        let commit = llm::create_provider(
            &commit_spec,
            config,
            Arc::clone(&generator),
            Arc::clone(&shared_ledger),
        )?;

        let resume = match config.resume_spec()? {
            Some(spec) => Some(llm::create_provider(
                &spec,
                config,
                Arc::clone(&generator),
                shared_ledger,
            )?),
            None => None,
        };

        debug!(
            commit = %commit_spec,
            resume = resume.as_ref().map(|r| r.model_key()),
            "services ready"
        );

        Ok(Self {
            generator,
            ledger,
            commit,
            resume,
        })
    }
}

pub fn build_generator(config: &Config) -> CommitPromptGenerator {
    let templates = PromptTemplateStore::bundled(config.prompts_dir.clone());
    CommitPromptGenerator::new(PromptBuilder::new(templates), config.ignore_file.clone())
}

pub struct App {
    cli: Cli,
    config: Config,
    cancel_token: CancellationToken,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            commit_model = %config.commit_model,
            resume_model = config.resume_model.as_deref(),
            timeout_secs = config.timeout_secs,
            "config loaded"
        );
        let cancel_token = CancellationToken::new();
        Ok(Self {
            cli,
            config,
            cancel_token,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup Ctrl+C handler with CancellationToken
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            signal::ctrl_c().await.ok();
            cancel.cancel();
        });

        match &self.cli.command {
            Commands::Commit(args) => {
                let args = args.clone();
                match args.mode {
                    Mode::Ai => self.ai_commit(&args).await,
                    Mode::Manual => self.manual_commit(&args),
                }
            }
            Commands::Analyze { debug } => self.analyze(*debug),
            Commands::Config => {
                self.show_config();
                Ok(())
            }
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Completions { shell } => {
                let mut cmd = <Cli as clap::CommandFactory>::command();
                clap_complete::generate(*shell, &mut cmd, "gitmit", &mut std::io::stdout());
                Ok(())
            }
        }
    }

    /// Race `fut` against Ctrl+C.
    async fn cancellable<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            _ = self.cancel_token.cancelled() => Err(Error::Cancelled),
            result = fut => result,
        }
    }

    async fn ai_commit(&self, args: &CommitArgs) -> Result<()> {
        let git = GitService::discover(&self.cli.path)?;
        let services = Services::build(&self.config)?;
        let provider = services.commit.as_ref();

        let explanation = match args.brief.clone() {
            Some(brief) => Some(brief),
            None => self.ask_explanation(args)?,
        };

        let request = CommitRequest {
            explanation: explanation.as_deref(),
            resume: services.resume.as_deref(),
            no_feat: args.no_feat,
            debug: args.debug,
        };

        let spinner = Self::spinner(&format!("Contacting {}...", provider.model_key()));
        let mut confirm = |status: &str| {
            spinner.suspend(|| {
                self.print_info(status);
                self.confirm(args, "Continue?")
            })
        };

        let draft = self
            .cancellable(llm::draft_commit_message(
                provider,
                &git,
                &request,
                &mut confirm,
            ))
            .await;
        spinner.finish_and_clear();

        let message = match draft? {
            Draft::Message(message) => message,
            Draft::Manual => {
                self.print_warning("No generated message, switching to manual mode");
                return self.manual_commit(args);
            }
        };

        if !message.reason.trim().is_empty() {
            eprintln!("{} {}", style("reason:").dim(), message.reason.trim());
        }

        self.finish_commit(&git, args, &message)
    }

    /// Optional free-text context for the model, asked only on a terminal.
    fn ask_explanation(&self, args: &CommitArgs) -> Result<Option<String>> {
        if args.yes || !Self::is_interactive() {
            return Ok(None);
        }
        let text: String = Input::new()
            .with_prompt("Briefly explain your changes (optional)")
            .allow_empty(true)
            .interact_text()?;
        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }

    fn manual_commit(&self, args: &CommitArgs) -> Result<()> {
        let git = GitService::discover(&self.cli.path)?;
        let generator = build_generator(&self.config);

        if generator.load_changes(&git)?.is_empty() {
            self.print_info("No changes to commit");
            return Ok(());
        }

        if !Self::is_interactive() {
            return Err(Error::Dialog(
                "manual mode needs an interactive terminal".into(),
            ));
        }

        let items: Vec<String> = COMMIT_TYPES
            .iter()
            .map(|t| format!("{} {} - {}", t.emoji, t.commit_type, t.title))
            .collect();
        let selection = Select::new()
            .with_prompt("Commit type")
            .items(&items)
            .default(0)
            .interact()?;

        let scope: String = Input::new()
            .with_prompt("Scope")
            .allow_empty(true)
            .interact_text()?;
        let short_description: String = Input::new().with_prompt("Title").interact_text()?;
        let description: String = Input::new()
            .with_prompt("Description")
            .allow_empty(true)
            .interact_text()?;

        let message = CommitMessage {
            commit_type: COMMIT_TYPES[selection].commit_type,
            scope,
            short_description,
            description,
            reason: String::new(),
        };

        self.finish_commit(&git, args, &message)
    }

    fn finish_commit(
        &self,
        git: &GitService,
        args: &CommitArgs,
        message: &CommitMessage,
    ) -> Result<()> {
        let formatted = message.format();

        if args.dry_run {
            println!("\n{formatted}");
            return Ok(());
        }

        if !args.yes {
            if !Self::is_interactive() {
                eprintln!("{}", style("warning:").yellow().bold());
                eprintln!("  Not a terminal. Use --yes to auto-confirm in scripts/hooks.");
                println!("\n{formatted}");
                return Ok(());
            }

            eprintln!("\n{}", style("Generated commit message:").bold());
            eprintln!("{}", style(&formatted).green());
            eprintln!();

            if !self.confirm(args, "Create commit with this message?")? {
                return Err(Error::Cancelled);
            }
        }

        git.commit(&formatted)?;

        eprintln!("{} Committed!", style("✓").green().bold());

        Ok(())
    }

    fn analyze(&self, show_files: bool) -> Result<()> {
        let git = GitService::discover(&self.cli.path)?;
        let generator = build_generator(&self.config);
        let records = generator.load_changes(&git)?;

        if records.is_empty() {
            self.print_info("No changes to analyze");
            return Ok(());
        }

        let analysis = ChangeAnalyzer::analyze(&records);

        eprintln!("{}", style("Change Analysis").bold().underlined());
        println!("Magnitude:       {}", analysis.magnitude.as_str().to_uppercase());
        println!("Category:        {}", analysis.category.as_str().to_uppercase());
        let types: Vec<&str> = analysis.suggested_types.iter().map(|t| t.as_str()).collect();
        println!("Suggested types: {}", types.join(", "));
        println!(
            "Files:           {} ({} new, {} modified)",
            analysis.total_files, analysis.new_files_count, analysis.modified_files_count
        );
        println!(
            "Lines:           +{} -{} (net: {:+})",
            analysis.total_lines_added,
            analysis.total_lines_removed,
            analysis.net_changes()
        );

        for warning in &analysis.warnings {
            self.print_warning(warning);
        }

        if show_files {
            eprintln!();
            eprintln!("{}", style("Files").bold().underlined());
            for file in &analysis.file_analyses {
                let mut flags = Vec::new();
                for (set, name) in [
                    (file.is_config, "config"),
                    (file.is_test, "test"),
                    (file.is_doc, "doc"),
                    (file.is_dependency, "dependency"),
                    (file.has_function_changes, "functions"),
                    (file.has_class_changes, "classes"),
                    (file.rename_only, "rename"),
                ] {
                    if set {
                        flags.push(name);
                    }
                }
                println!(
                    "  {} {} +{} -{} [{}]",
                    if file.is_new { "A" } else { "M" },
                    file.filename,
                    file.lines_added,
                    file.lines_removed,
                    flags.join(", ")
                );
            }
        }

        if analysis.magnitude == ChangeMagnitude::Trivial {
            eprintln!();
            self.print_info("Trivial change: prefer style, refactor, chore or docs over feat");
        }

        Ok(())
    }

    fn show_config(&self) {
        let key_status = |key: &Option<String>| if key.is_some() { "configured" } else { "not set" };

        println!("Commit model: {}", self.config.commit_model);
        println!(
            "Resume model: {}",
            self.config.resume_model.as_deref().unwrap_or("none")
        );
        println!("Ollama host: {}", self.config.ollama_host);
        println!("Google API key: {}", key_status(&self.config.google_api_key));
        println!("Google base URL: {}", self.config.google_base_url);
        println!(
            "OpenRouter API key: {}",
            key_status(&self.config.openrouter_api_key)
        );
        println!("OpenRouter base URL: {}", self.config.openrouter_base_url);
        if !self.config.openrouter_providers.is_empty() {
            println!(
                "OpenRouter providers: {}",
                self.config.openrouter_providers.join(", ")
            );
        }
        println!("Timeout: {}s", self.config.timeout_secs);
        println!("Temperature: {}", self.config.temperature);
        println!("Ignore file: {}", self.config.ignore_file);
        if let Some(ref dir) = self.config.prompts_dir {
            println!("Prompts dir: {}", dir.display());
        }
        match self.config.usage_path() {
            Ok(path) => println!("Usage file: {}", path.display()),
            Err(e) => println!("Usage file: {e}"),
        }
        if let Some(ref path) = Config::config_path() {
            let status = if path.exists() { "found" } else { "not found" };
            println!("Config file: {} ({})", path.display(), status);
        }
    }

    fn confirm(&self, args: &CommitArgs, prompt: &str) -> Result<bool> {
        if args.yes || !Self::is_interactive() {
            return Ok(true);
        }
        Ok(Confirm::new().with_prompt(prompt).default(true).interact()?)
    }

    fn is_interactive() -> bool {
        std::io::stdout().is_terminal() && std::io::stdin().is_terminal()
    }

    fn spinner(msg: &str) -> ProgressBar {
        if !std::io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(msg.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    fn print_info(&self, msg: &str) {
        eprintln!("{} {}", style("info:").cyan(), msg);
    }

    fn print_warning(&self, msg: &str) {
        eprintln!("{} {}", style("warning:").yellow().bold(), msg);
    }
}
