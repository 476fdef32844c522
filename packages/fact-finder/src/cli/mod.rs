//! Command-line front end
//!
//! `fact-finder run` executes the whole pipeline from flags;
//! `fact-finder` on its own (or `fact-finder interactive`) walks through the
//! stages with prompts.

pub mod interactive;
pub mod progress;
pub mod run;
pub mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::pipeline::prompts::{ENTITY, RESULTS};
use crate::pipeline::{FixedDelay, SearchErrorPolicy, SearchOptions, Template};
use crate::security::secret_from;
use crate::session::{Session, WriteBack};
use crate::traits::model::OpenAICompletion;
use crate::traits::searcher::SerpApiSearcher;

use self::progress::StageProgress;
use self::ui::{search_summary, Ui};

#[derive(Debug, Parser)]
#[command(name = "fact-finder")]
#[command(about = "Search the web for each entity in a table and extract one fact per entity")]
#[command(version)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run every stage non-interactively
    Run(run::RunArgs),

    /// Guided session with prompts (the default)
    Interactive(ServiceArgs),
}

/// Overrides for values otherwise read from the environment.
#[derive(Debug, Clone, Default, Args)]
pub struct ServiceArgs {
    /// SerpAPI key (default: $SERPAPI_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub serpapi_key: Option<String>,

    /// OpenAI key (default: $OPENAI_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub openai_key: Option<String>,

    /// Completion model (default: $FACT_FINDER_MODEL or gpt-4o-mini)
    #[arg(long)]
    pub model: Option<String>,

    /// Service-account key file for spreadsheet access
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Results kept per entity
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_results: Option<u32>,

    /// Pause between search requests, in milliseconds
    #[arg(long, value_name = "MS")]
    pub search_delay_ms: Option<u64>,
}

impl ServiceArgs {
    pub fn apply(self, config: &mut Config) {
        if let Some(key) = self.serpapi_key.and_then(secret_from) {
            config.serpapi_api_key = Some(key);
        }
        if let Some(key) = self.openai_key.and_then(secret_from) {
            config.openai_api_key = Some(key);
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(path) = self.credentials {
            config.credentials_path = path;
        }
        if let Some(max) = self.max_results {
            config.max_results = max as usize;
        }
        if let Some(ms) = self.search_delay_ms {
            config.search_delay = Duration::from_millis(ms);
        }
    }
}

/// Tell the user about `{name}` tokens that will be sent as-is.
fn warn_unknown_placeholders(ui: &Ui, template: &Template, known: &[&str]) {
    let unknown = template.unknown_placeholders(known);
    if !unknown.is_empty() {
        ui.print_warning(&format!(
            "Template placeholders left as-is: {}",
            unknown
                .iter()
                .map(|n| format!("{{{n}}}"))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
}

/// Build the searcher and run the search stage with a progress bar.
async fn search_stage(
    session: &mut Session,
    config: &Config,
    template: &Template,
    policy: SearchErrorPolicy,
    ui: &Ui,
) -> Result<()> {
    let searcher = SerpApiSearcher::new(config.serpapi_api_key.as_ref())
        .context("Set SERPAPI_API_KEY or pass --serpapi-key")?;
    warn_unknown_placeholders(ui, template, &[ENTITY]);

    let total = session.entities().map_or(0, <[String]>::len);
    let options = SearchOptions {
        max_results: config.max_results,
        on_error: policy,
    };

    ui.print_header(&format!("Searching {total} entities"));
    let progress = StageProgress::new(total, "searching", ui.quiet);
    let warnings = session
        .search(
            template,
            &searcher,
            &FixedDelay(config.search_delay),
            &progress,
            &options,
        )
        .await?;
    progress.finish("done");

    ui.print_success(&format!(
        "Search complete: {} records, {} warnings",
        session.search_records().map_or(0, <[_]>::len),
        warnings.len()
    ));
    if let Some(records) = session.search_records() {
        ui.print_table(&search_summary(records));
    }
    Ok(())
}

/// Build the model and run the extraction stage with a progress bar.
async fn extract_stage(
    session: &mut Session,
    config: &Config,
    template: &Template,
    ui: &Ui,
) -> Result<()> {
    let model = OpenAICompletion::new(config.openai_api_key.as_ref(), config.model.as_str())
        .context("Set OPENAI_API_KEY or pass --openai-key")?;
    warn_unknown_placeholders(ui, template, &[ENTITY, RESULTS]);

    let total = session.search_records().map_or(0, <[_]>::len);

    ui.print_header(&format!("Extracting with {}", model.model()));
    let progress = StageProgress::new(total, "extracting", ui.quiet);
    let warnings = session.extract(template, &model, &progress).await?;
    progress.finish("done");

    let failed = session
        .extraction_records()
        .map_or(0, |records| records.iter().filter(|r| r.is_error()).count());
    if warnings.is_empty() {
        ui.print_success(&format!("Extraction complete: {total} records"));
    } else {
        ui.print_warning(&format!(
            "Extraction complete: {total} records, {failed} failed"
        ));
    }
    Ok(())
}

/// Attempt write-back and report the outcome; never fails the command.
async fn write_back_stage(session: &Session, ui: &Ui) {
    match session.write_back().await {
        Ok(WriteBack::Written { rows }) => {
            ui.print_success(&format!("Wrote {rows} rows back to the spreadsheet"))
        }
        Ok(WriteBack::Skipped) => {
            ui.print_info("Table did not come from a spreadsheet; nothing written back")
        }
        Err(e) => ui.print_warning(&format!("Write-back failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::ExposeSecret;

    #[test]
    fn test_no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["fact-finder"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["fact-finder", "-vv", "interactive"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Interactive(_))));
    }

    #[test]
    fn test_service_args_override_config() {
        let mut config = Config::from_vars(|_| None).unwrap();
        ServiceArgs {
            serpapi_key: Some("serp-key".to_string()),
            openai_key: Some("  ".to_string()),
            model: Some("gpt-4o".to_string()),
            credentials: None,
            max_results: Some(5),
            search_delay_ms: Some(0),
        }
        .apply(&mut config);

        assert_eq!(
            config.serpapi_api_key.as_ref().map(|k| k.expose_secret()),
            Some("serp-key")
        );
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(config.max_results, 5);
        assert_eq!(config.search_delay, Duration::ZERO);
    }

    #[test]
    fn test_max_results_must_be_positive() {
        assert!(Cli::try_parse_from(["fact-finder", "interactive", "--max-results", "0"]).is_err());
    }
}
