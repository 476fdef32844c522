//! Non-interactive pipeline run

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use std::path::PathBuf;

use crate::config::Config;
use crate::pipeline::prompts::{DEFAULT_PROMPT_TEMPLATE, DEFAULT_QUERY_TEMPLATE};
use crate::pipeline::{SearchErrorPolicy, Template, DEFAULT_EXPORT_FILE};
use crate::session::Session;
use crate::source::{preview, TableSource};

use super::ui::Ui;
use super::{extract_stage, search_stage, write_back_stage, ServiceArgs};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["csv", "sheet"])))]
pub struct RunArgs {
    /// Input CSV file with a header line
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Spreadsheet share URL
    #[arg(long, value_name = "URL")]
    pub sheet: Option<String>,

    /// Column holding the entity names
    #[arg(long)]
    pub column: String,

    /// Search query template; `{entity}` is replaced per row
    #[arg(long, default_value = DEFAULT_QUERY_TEMPLATE)]
    pub query: String,

    /// Extraction prompt template; `{entity}` and `{results}` are replaced
    #[arg(long, default_value = DEFAULT_PROMPT_TEMPLATE)]
    pub prompt: String,

    /// Where to write the results CSV
    #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
    pub output: PathBuf,

    /// Overwrite the source spreadsheet with the results
    #[arg(long)]
    pub write_back: bool,

    /// Stop at the first failed search instead of skipping the entity
    #[arg(long)]
    pub abort_on_search_error: bool,

    #[command(flatten)]
    pub services: ServiceArgs,
}

impl RunArgs {
    pub fn source(&self) -> Option<TableSource> {
        match (&self.csv, &self.sheet) {
            (Some(path), _) => Some(TableSource::Upload(path.clone())),
            (None, Some(locator)) => Some(TableSource::Sheet(locator.clone())),
            (None, None) => None,
        }
    }

    fn policy(&self) -> SearchErrorPolicy {
        if self.abort_on_search_error {
            SearchErrorPolicy::Abort
        } else {
            SearchErrorPolicy::Skip
        }
    }
}

pub async fn execute(args: RunArgs, mut config: Config, ui: &Ui) -> Result<()> {
    let source = args
        .source()
        .context("Pass either --csv or --sheet")?;
    let policy = args.policy();
    args.services.clone().apply(&mut config);

    let mut session = Session::new();

    ui.print_header("Loading table");
    let table = session
        .load(&source, &config.credentials_path)
        .await
        .context("Failed to load the input table")?;
    ui.print_info(&format!(
        "{} rows; columns: {}",
        table.len(),
        table.headers().join(", ")
    ));
    ui.print_table(&preview(table));

    let entities = session.select_column(&args.column)?;
    ui.print_info(&format!(
        "{} entities in column `{}`",
        entities.len(),
        args.column
    ));

    search_stage(&mut session, &config, &Template::new(args.query), policy, ui).await?;
    extract_stage(&mut session, &config, &Template::new(args.prompt), ui).await?;

    ui.print_header("Results");
    ui.print_table(&session.export_table()?);

    session
        .write_csv(&args.output)
        .with_context(|| format!("Failed to export {}", args.output.display()))?;
    ui.print_success(&format!("Saved {}", args.output.display()));

    if args.write_back {
        write_back_stage(&session, ui).await;
    } else if session.can_write_back() {
        ui.print_info("Pass --write-back to overwrite the source spreadsheet with these results");
    }

    Ok(())
}
