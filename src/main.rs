mod batch;
mod cli;
mod compose;
mod config;
mod dates;
mod diff;
mod error;
mod mailer;
mod presets;
mod record;
mod sheets;
mod sync;
mod tracker;
mod ui;
mod workflow;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use console::Style;

use crate::batch::{LaunchAll, NotificationKind, run_notification_batch, run_save_batch};
use crate::cli::{Cli, Command};
use crate::config::HostbookConfig;
use crate::diff::{ProjectionKind, WorkingRow};
use crate::error::HostbookError;
use crate::mailer::{MailerClient, MessageTransport, OutboundMessage};
use crate::presets::Presets;
use crate::sheets::{RecordStore, SheetsClient};
use crate::sync::{SyncEngine, SyncReport};
use crate::tracker::OperationTracker;
use crate::ui::{BatchProgress, ConsoleReviewer};
use crate::workflow::{StatusWorkflow, Trigger};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = HostbookConfig::load(cli.config.as_deref().map(Path::new))?;

    match cli.command {
        Command::Status => status(&config).await,
        Command::Export { stage, out } => export(&config, stage, &out).await,
        Command::Save { stage, edits } => save(&config, stage, &edits).await,
        Command::ConfirmReceipts {
            launch_all,
            edits,
            signature,
        } => {
            notifications(
                &config,
                NotificationKind::Receipt,
                ProjectionKind::Receipt,
                launch_all,
                edits,
                signature,
                cli.verbose,
            )
            .await
        }
        Command::AnnouncePairings {
            launch_all,
            edits,
            signature,
        } => {
            notifications(
                &config,
                NotificationKind::Pairing,
                ProjectionKind::Pairing,
                launch_all,
                edits,
                signature,
                cli.verbose,
            )
            .await
        }
        Command::SetStatus { row, to } => set_status(&config, row, to).await,
        Command::Plea { to, subject } => plea(&config, to, subject).await,
    }
}

/// Builds the engine over the tracked spreadsheet, loading presets first when
/// a presets spreadsheet is configured.
async fn open_engine(config: &HostbookConfig) -> Result<(SyncEngine<SheetsClient>, Option<Presets>)> {
    let presets = if config.presets_spreadsheet_id.is_empty() {
        None
    } else {
        let client = SheetsClient::new(
            config.store_token.clone(),
            config.presets_spreadsheet_id.clone(),
            config.sheets_base_url.clone(),
        );
        Some(
            Presets::load(&client)
                .await
                .map_err(HostbookError::StoreUnavailable)?,
        )
    };

    let tracked_id = presets
        .as_ref()
        .map(|p| p.tracked_spreadsheet_id.clone())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| config.spreadsheet_id.clone());
    if tracked_id.is_empty() {
        bail!(
            "no tracked spreadsheet configured; set spreadsheet_id or presets_spreadsheet_id in hostbook.toml"
        );
    }

    let store = SheetsClient::new(
        config.store_token.clone(),
        tracked_id,
        config.sheets_base_url.clone(),
    );
    let engine = SyncEngine::new(
        store,
        config.intake_sheet.clone(),
        config.tracked_sheet.clone(),
    );
    Ok((engine, presets))
}

async fn refresh(
    engine: &mut SyncEngine<SheetsClient>,
    config: &HostbookConfig,
) -> Result<SyncReport> {
    let report = engine
        .refresh()
        .await
        .map_err(HostbookError::StoreUnavailable)?;
    ui::report_date_warnings(&report.warnings, config.date_warning_threshold);
    Ok(report)
}

async fn status(config: &HostbookConfig) -> Result<()> {
    let (mut engine, _) = open_engine(config).await?;
    let report = refresh(&mut engine, config).await?;
    ui::print_report(&report);
    Ok(())
}

async fn export(config: &HostbookConfig, stage: ProjectionKind, out: &str) -> Result<()> {
    let (mut engine, _) = open_engine(config).await?;
    refresh(&mut engine, config).await?;
    let rows = diff::working_rows(engine.projection(stage));
    fs::write(out, serde_json::to_string_pretty(&rows)?)?;
    println!("  {} row(s) of the {stage} view written to {out}", rows.len());
    Ok(())
}

fn read_working_rows(path: &str) -> Result<Vec<WorkingRow>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

async fn save(config: &HostbookConfig, stage: ProjectionKind, edits: &str) -> Result<()> {
    let (mut engine, _) = open_engine(config).await?;
    refresh(&mut engine, config).await?;

    let working = read_working_rows(edits)?;
    let writes = diff::compute_diff(stage, engine.tracked_sheet(), &working, engine.projection(stage))?;
    if writes.is_empty() {
        println!("No changed cells.");
        return Ok(());
    }

    let tracker = Arc::new(OperationTracker::new());
    tracker.begin_batch();
    let progress = BatchProgress::start("saving edits", Arc::clone(&tracker));
    let outcome = run_save_batch(engine.store(), &tracker, &progress, writes).await;
    progress.finish();
    ui::print_save_outcome(&outcome);

    refresh(&mut engine, config).await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn notifications(
    config: &HostbookConfig,
    kind: NotificationKind,
    stage: ProjectionKind,
    launch_all: bool,
    edits: Option<String>,
    signature: Option<String>,
    verbose: bool,
) -> Result<()> {
    let (mut engine, presets) = open_engine(config).await?;
    let Some(presets) = presets else {
        bail!("notification commands need presets_spreadsheet_id configured");
    };
    if config.mailer_base_url.is_empty() {
        bail!("mailer_base_url is not configured");
    }
    let transport = MailerClient::new(config.mailer_token.clone(), config.mailer_base_url.clone());

    refresh(&mut engine, config).await?;

    let tracker = Arc::new(OperationTracker::new());
    tracker.begin_batch();
    let progress = BatchProgress::start(kind.subject(), Arc::clone(&tracker));

    // Flush pending edits ahead of the sends. Their writes join this batch's
    // counters, but the bar holds at zero until the first send completes.
    if let Some(edits_path) = edits {
        tracker.set_suppress_write_progress(true);
        let working = read_working_rows(&edits_path)?;
        let writes =
            diff::compute_diff(stage, engine.tracked_sheet(), &working, engine.projection(stage))?;
        let saved = run_save_batch(engine.store(), &tracker, &progress, writes).await;
        if !saved.failures.is_empty() {
            ui::print_save_outcome(&saved);
        }
        refresh(&mut engine, config).await?;
    }

    let signature = signature.unwrap_or_else(|| config.sender_name.clone());
    let set = batch::build_pairs(kind, engine.projection(stage), &presets, &signature, engine.tracked_sheet())?;
    if !set.incomplete.is_empty() {
        let yellow = Style::new().yellow();
        for name in &set.incomplete {
            println!(
                "  {} {name} is missing host details and was left out",
                yellow.apply_to("!")
            );
        }
    }
    if set.pairs.is_empty() {
        progress.finish();
        println!("Nothing to send.");
        return Ok(());
    }

    let outcome = if launch_all {
        run_notification_batch(
            engine.store(),
            &transport,
            &tracker,
            &progress,
            set.pairs,
            &mut LaunchAll,
            true,
        )
        .await
    } else {
        let mut reviewer = ConsoleReviewer::new();
        run_notification_batch(
            engine.store(),
            &transport,
            &tracker,
            &progress,
            set.pairs,
            &mut reviewer,
            false,
        )
        .await
    };
    progress.finish();
    ui::print_outcome(&outcome);
    if verbose {
        ui::print_audit(&outcome);
    }

    refresh(&mut engine, config).await?;
    Ok(())
}

async fn set_status(config: &HostbookConfig, row: u32, to: ProjectionKind) -> Result<()> {
    let (mut engine, _) = open_engine(config).await?;
    refresh(&mut engine, config).await?;

    let current = engine
        .find_row(row)
        .ok_or(HostbookError::RowNotFound(row))?
        .status;
    let target = to.status();
    let write = StatusWorkflow::transition(engine.tracked_sheet(), row, current, target, Trigger::Manual)
        .map_err(HostbookError::Workflow)?;
    engine
        .store()
        .write_cell(&write.address, &write.value)
        .await
        .map_err(HostbookError::StoreUnavailable)?;

    let green = Style::new().green().bold();
    println!("  {} row {row} moved to {target}", green.apply_to("✓"));

    let report = refresh(&mut engine, config).await?;
    ui::print_report(&report);
    Ok(())
}

async fn plea(config: &HostbookConfig, to: Vec<String>, subject: String) -> Result<()> {
    let (mut engine, presets) = open_engine(config).await?;
    let Some(presets) = presets else {
        bail!("the plea command needs presets_spreadsheet_id configured");
    };
    if config.mailer_base_url.is_empty() {
        bail!("mailer_base_url is not configured");
    }
    let transport = MailerClient::new(config.mailer_token.clone(), config.mailer_base_url.clone());

    refresh(&mut engine, config).await?;

    let recipients = if to.is_empty() {
        config.plea_recipients.clone()
    } else {
        to
    };
    if recipients.is_empty() {
        bail!("no plea recipients; pass --to or set plea_recipients in hostbook.toml");
    }

    let body = compose::plea_message(&presets.plea_body, engine.snapshot(), &presets.plea_signature);
    let message = OutboundMessage {
        subject,
        to: recipients,
        cc: Vec::new(),
        html_body: body,
    };

    if !ui::confirm(&format!(
        "All set to send \"{}\" to {}?",
        message.subject,
        message.to.join(", ")
    )) {
        println!("Plea not sent.");
        return Ok(());
    }

    transport
        .send(&message)
        .await
        .map_err(HostbookError::Transport)?;
    let green = Style::new().green().bold();
    println!("  {} plea sent to {} list(s)", green.apply_to("✓"), message.to.len());
    Ok(())
}
