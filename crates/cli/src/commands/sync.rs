//! The sync command: plan, preview, confirm, create, verify

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use super::{building_id, platform_client, station_client};
use crate::config::Settings;
use crate::output::{print_error, print_info, print_success, print_warning, OutputFormat};
use crate::Cli;
use ontosync::{CreateMode, SyncOptions, SyncOrchestrator, SyncPlan, SyncReport};

/// Arguments for the sync command
#[derive(Args)]
pub struct SyncArgs {
    /// Target building ID (falls back to the configured building)
    #[arg(long)]
    pub building: Option<String>,

    /// Datasource ID to create devices under
    #[arg(long)]
    pub datasource_id: Option<String>,

    /// Datasource name to resolve when no ID is given
    #[arg(long)]
    pub datasource_name: Option<String>,

    /// Minimum match confidence (0-100)
    #[arg(long)]
    pub min_confidence: Option<u8>,

    /// Comma-separated entity types to include
    #[arg(long, value_delimiter = ',')]
    pub types: Option<Vec<String>>,

    /// Include every entity type
    #[arg(long)]
    pub all: bool,

    /// Show what would be created without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Create devices one at a time instead of one batch call
    #[arg(long)]
    pub one_by_one: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Row for the pre-write preview table
#[derive(Tabled)]
struct PreviewRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Points")]
    points: usize,
}

pub async fn run(args: &SyncArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let building = building_id(args.building.as_deref(), settings)?;

    let entity_types = if args.all {
        None
    } else {
        args.types
            .clone()
            .or_else(|| Some(settings.entity_types.clone()))
    };

    let options = SyncOptions {
        building_id: building.clone(),
        datasource_id: args
            .datasource_id
            .clone()
            .or_else(|| settings.datasource_id.clone()),
        datasource_name: args
            .datasource_name
            .clone()
            .unwrap_or_else(|| settings.datasource_name.clone()),
        min_confidence: args.min_confidence.unwrap_or(settings.min_confidence),
        entity_types,
        dry_run: args.dry_run,
        mode: if args.one_by_one {
            CreateMode::OneByOne
        } else {
            CreateMode::Batch
        },
        device_id_prefix: settings.device_id_prefix.clone(),
    };

    if matches!(cli.format, OutputFormat::Table) {
        print_info(&format!("Building: {}", building));
        print_info(&format!("Min confidence: {}", options.min_confidence));
        print_info(&format!(
            "Entity types: {}",
            options
                .entity_types
                .as_ref()
                .map(|t| t.join(", "))
                .unwrap_or_else(|| "all".to_string())
        ));
        print_info(&format!(
            "Mode: {}",
            match (args.dry_run, args.one_by_one) {
                (true, _) => "dry run",
                (false, true) => "one-by-one",
                (false, false) => "batch",
            }
        ));
    }

    let source = Arc::new(station_client(cli, settings)?);
    let target = Arc::new(platform_client(cli, settings)?);
    let orchestrator = SyncOrchestrator::new(source, target, options);

    let plan = orchestrator.plan().await?;
    render_preview(&plan, cli.format, args.dry_run);

    if plan.devices.is_empty() {
        print_warning("No devices to create");
        return Ok(());
    }

    if args.dry_run {
        print_info("Dry run - nothing was created");
        return Ok(());
    }

    if !args.yes {
        let prompt = format!(
            "Create {} device(s) in building {}?",
            plan.devices.len(),
            building
        );
        if !confirm(&prompt)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let report = orchestrator.execute(plan).await?;
    render_report(&report, cli.format)?;

    Ok(())
}

fn render_preview(plan: &SyncPlan, format: OutputFormat, dry_run: bool) {
    match format {
        OutputFormat::Json => {
            // The full plan is only echoed on a dry run; a live run prints
            // the final report instead
            if dry_run {
                if let Ok(json) = serde_json::to_string_pretty(plan) {
                    println!("{}", json);
                }
            }
        }
        OutputFormat::Table => {
            if !plan.preview.is_empty() {
                let rows: Vec<PreviewRow> = plan
                    .preview
                    .iter()
                    .map(|p| PreviewRow {
                        device: p.name.clone(),
                        category: p.category.clone(),
                        points: p.point_count,
                    })
                    .collect();
                let table = Table::new(rows).with(Style::rounded()).to_string();
                println!("{}", table);
            }
            println!(
                "\n{} entities fetched, {} after type filter, {} transformed, {} skipped",
                plan.fetched,
                plan.filtered,
                plan.devices.len(),
                plan.skipped
            );
        }
    }
}

fn render_report(report: &SyncReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Table => {
            if report.already_present > 0 {
                print_info(&format!(
                    "{} device(s) already present in the target, skipped",
                    report.already_present
                ));
            }

            if let Some(error) = &report.batch_error {
                print_error(&format!("Batch creation failed: {}", error));
            } else {
                print_success(&format!(
                    "Created {}/{} device(s)",
                    report.created, report.attempted
                ));
            }

            for failure in &report.failures {
                print_error(&format!("  {}: {}", failure.device, failure.error));
            }

            print_info(&format!(
                "Verified {}/{} device(s) present in the target",
                report.verified, report.attempted
            ));
            if report.verified < report.created {
                print_warning("Some created devices are not yet visible; the target listing may lag");
            }
        }
    }
    Ok(())
}

/// Ask for confirmation on stdin; anything but y/yes declines
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} (y/n): ", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
