//! Guided session
//!
//! Walks the user through load, column selection, search, extraction,
//! export and write-back with dialoguer prompts. Each stage can be
//! re-run; a stage whose input is missing is not offered.

use anyhow::Result;
use colored::Colorize;
use console::Term;
use dialoguer::{Input, Password, Select};
use std::path::PathBuf;

use crate::config::Config;
use crate::pipeline::prompts::{DEFAULT_PROMPT_TEMPLATE, DEFAULT_QUERY_TEMPLATE};
use crate::pipeline::{SearchErrorPolicy, Template, DEFAULT_EXPORT_FILE};
use crate::traits::sheet::DEFAULT_RANGE;
use crate::security::{secret_from, SecretString, Service};
use crate::session::Session;
use crate::source::{preview, TableSource};

use super::ui::Ui;
use super::{extract_stage, search_stage, write_back_stage, ServiceArgs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    LoadTable,
    SelectColumn,
    Search,
    Extract,
    ShowResults,
    Export,
    WriteBack,
    Exit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Self::LoadTable => "📄 Load a table",
            Self::SelectColumn => "🔤 Select the entity column",
            Self::Search => "🔎 Search the web",
            Self::Extract => "🧠 Extract facts",
            Self::ShowResults => "📋 Show results",
            Self::Export => "💾 Export CSV",
            Self::WriteBack => "📤 Write results back to the spreadsheet",
            Self::Exit => "🛑 Exit",
        }
    }
}

/// Actions available for the session's current state, in pipeline order.
fn available_actions(session: &Session) -> Vec<Action> {
    let mut actions = vec![Action::LoadTable];
    if session.table().is_some() {
        actions.push(Action::SelectColumn);
    }
    if session.entities().is_some() {
        actions.push(Action::Search);
    }
    if session.search_records().is_some() {
        actions.push(Action::Extract);
    }
    if session.extraction_records().is_some() {
        actions.push(Action::ShowResults);
        actions.push(Action::Export);
        if session.can_write_back() {
            actions.push(Action::WriteBack);
        }
    }
    actions.push(Action::Exit);
    actions
}

/// The next stage to suggest: the first one that has not produced output.
fn suggested_action(session: &Session) -> Action {
    if session.table().is_none() {
        Action::LoadTable
    } else if session.entities().is_none() {
        Action::SelectColumn
    } else if session.search_records().is_none() {
        Action::Search
    } else if session.extraction_records().is_none() {
        Action::Extract
    } else {
        Action::Export
    }
}

struct Templates {
    query: String,
    prompt: String,
}

pub async fn execute(services: ServiceArgs, mut config: Config, ui: &Ui) -> Result<()> {
    services.apply(&mut config);

    let term = Term::stdout();
    print_banner(&term)?;

    let mut session = Session::new();
    let mut templates = Templates {
        query: DEFAULT_QUERY_TEMPLATE.to_string(),
        prompt: DEFAULT_PROMPT_TEMPLATE.to_string(),
    };

    loop {
        println!();
        let actions = available_actions(&session);
        let suggested = suggested_action(&session);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();

        let selection = Select::with_theme(&ui.theme())
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(actions.iter().position(|a| *a == suggested).unwrap_or(0))
            .interact_on(&term)?;

        let outcome = match actions[selection] {
            Action::LoadTable => load_table(&mut session, &config, ui).await,
            Action::SelectColumn => select_column(&mut session, ui),
            Action::Search => search(&mut session, &mut config, &mut templates, ui).await,
            Action::Extract => extract(&mut session, &mut config, &mut templates, ui).await,
            Action::ShowResults => {
                session.export_table().map(|t| ui.print_table(&t)).map_err(Into::into)
            }
            Action::Export => export(&session, ui),
            Action::WriteBack => write_back(&session, ui).await,
            Action::Exit => {
                println!("{}", "👋 Goodbye!".bright_blue());
                break;
            }
        };

        // Stage failures return to the menu with the session intact.
        if let Err(e) = outcome {
            ui.print_error(&format!("{e:#}"));
        }
    }

    Ok(())
}

fn print_banner(term: &Term) -> Result<()> {
    term.clear_screen()?;
    println!(
        "{}",
        "╔════════════════════════════════════════╗".bright_cyan()
    );
    println!(
        "{}",
        "║          Entity Fact-Finder            ║".bright_cyan()
    );
    println!(
        "{}",
        "╚════════════════════════════════════════╝".bright_cyan()
    );
    Ok(())
}

async fn load_table(session: &mut Session, config: &Config, ui: &Ui) -> Result<()> {
    let kinds = ["Upload a CSV file", "Link a Google Sheet"];
    let kind = Select::with_theme(&ui.theme())
        .with_prompt("Where is the table?")
        .items(&kinds)
        .default(0)
        .interact()?;

    let source = if kind == 0 {
        let path: String = Input::with_theme(&ui.theme())
            .with_prompt("CSV file path")
            .interact_text()?;
        TableSource::Upload(PathBuf::from(path.trim()))
    } else {
        let url: String = Input::with_theme(&ui.theme())
            .with_prompt("Spreadsheet URL")
            .interact_text()?;
        TableSource::Sheet(url.trim().to_string())
    };

    let table = session.load(&source, &config.credentials_path).await?;
    ui.print_success(&format!(
        "Loaded {} rows; columns: {}",
        table.len(),
        table.headers().join(", ")
    ));
    ui.print_table(&preview(table));
    Ok(())
}

fn select_column(session: &mut Session, ui: &Ui) -> Result<()> {
    let Some(table) = session.table() else {
        return Ok(());
    };
    let headers = table.headers().to_vec();
    let current = session
        .column()
        .and_then(|c| headers.iter().position(|h| h == c))
        .unwrap_or(0);

    let choice = Select::with_theme(&ui.theme())
        .with_prompt("Which column holds the entities?")
        .items(&headers)
        .default(current)
        .interact()?;

    let entities = session.select_column(&headers[choice])?;
    ui.print_success(&format!("{} entities selected", entities.len()));
    Ok(())
}

async fn search(
    session: &mut Session,
    config: &mut Config,
    templates: &mut Templates,
    ui: &Ui,
) -> Result<()> {
    ensure_credential(&mut config.serpapi_api_key, Service::SerpApi, ui)?;

    templates.query = Input::with_theme(&ui.theme())
        .with_prompt("Search query ({entity} is replaced per row)")
        .with_initial_text(templates.query.as_str())
        .interact_text()?;

    search_stage(
        session,
        config,
        &Template::new(templates.query.as_str()),
        SearchErrorPolicy::Skip,
        ui,
    )
    .await
}

async fn extract(
    session: &mut Session,
    config: &mut Config,
    templates: &mut Templates,
    ui: &Ui,
) -> Result<()> {
    ensure_credential(&mut config.openai_api_key, Service::OpenAI, ui)?;

    templates.prompt = Input::with_theme(&ui.theme())
        .with_prompt("Prompt ({entity} and {results} are replaced per row)")
        .with_initial_text(templates.prompt.as_str())
        .interact_text()?;

    extract_stage(session, config, &Template::new(templates.prompt.as_str()), ui).await?;

    ui.print_table(&session.export_table()?);
    Ok(())
}

fn export(session: &Session, ui: &Ui) -> Result<()> {
    let path: String = Input::with_theme(&ui.theme())
        .with_prompt("Save results to")
        .default(DEFAULT_EXPORT_FILE.to_string())
        .interact_text()?;

    session.write_csv(path.trim())?;
    ui.print_success(&format!("Saved {}", path.trim()));
    Ok(())
}

async fn write_back(session: &Session, ui: &Ui) -> Result<()> {
    let target = session
        .origin()
        .map_or_else(|| "the source spreadsheet".to_string(), |o| o.to_string());
    if ui.confirm(&format!("Overwrite {DEFAULT_RANGE} of {target}?"), true)? {
        write_back_stage(session, ui).await;
    }
    Ok(())
}

/// Ask for a missing key with hidden input. A blank answer leaves it unset
/// and the stage then reports the missing credential.
fn ensure_credential(slot: &mut Option<SecretString>, service: Service, ui: &Ui) -> Result<()> {
    if slot.is_some() {
        return Ok(());
    }

    let value = Password::with_theme(&ui.theme())
        .with_prompt(format!("{service} API key"))
        .allow_empty_password(true)
        .interact()?;
    *slot = secret_from(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{NoDelay, NoProgress, SearchOptions};
    use crate::testing::{MockModel, MockSearcher};

    #[tokio::test]
    async fn test_actions_follow_session_state() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.csv");
        std::fs::write(&input, "Name\nAlice\n").unwrap();

        let mut session = Session::new();
        assert_eq!(
            available_actions(&session),
            vec![Action::LoadTable, Action::Exit]
        );
        assert_eq!(suggested_action(&session), Action::LoadTable);

        session.load_csv(&input).unwrap();
        assert_eq!(suggested_action(&session), Action::SelectColumn);

        session.select_column("Name").unwrap();
        session
            .search(
                &Template::default(),
                &MockSearcher::new(),
                &NoDelay,
                &NoProgress,
                &SearchOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(suggested_action(&session), Action::Extract);

        session
            .extract(&Template::default(), &MockModel::new(), &NoProgress)
            .await
            .unwrap();
        let actions = available_actions(&session);
        assert!(actions.contains(&Action::Export));
        assert!(!actions.contains(&Action::WriteBack));

        let other = dir.path().join("companies.csv");
        std::fs::write(&other, "Company\nAcme\n").unwrap();
        session.load_csv(&other).unwrap();
        assert_eq!(
            available_actions(&session),
            vec![Action::LoadTable, Action::SelectColumn, Action::Exit]
        );
        assert_eq!(suggested_action(&session), Action::SelectColumn);
    }
}
