//! Correction-learning workflow commands
//!
//! Training is always an explicit operator action; nothing here runs as a
//! side effect of a sync.

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

use super::station_client;
use crate::config::Settings;
use crate::output::{color_confidence, print_info, print_success, print_warning, OutputFormat};
use crate::Cli;
use ontosync::{Correction, CorrectionLearner};

/// Row for the learned-mappings table
#[derive(Tabled)]
struct MappingRow {
    #[tabled(rename = "Original")]
    original: String,
    #[tabled(rename = "Canonical Field")]
    canonical: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

/// Show learner statistics (opaque service JSON)
pub async fn stats(cli: &Cli, settings: &Settings) -> Result<()> {
    let client = station_client(cli, settings)?;
    let stats = client.stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

/// Record one human correction
pub async fn correct(
    cli: &Cli,
    settings: &Settings,
    point: &str,
    field: &str,
    equipment: Option<String>,
) -> Result<()> {
    let client = station_client(cli, settings)?;
    let correction = Correction {
        point_name: point.to_string(),
        correct_match: field.to_string(),
        equipment_type: equipment,
    };
    client.submit_correction(&correction).await?;
    print_success(&format!("Correction recorded: {} → {}", point, field));
    Ok(())
}

/// Trigger a training run
pub async fn train(cli: &Cli, settings: &Settings) -> Result<()> {
    // Advisory only; the service decides whether it has enough material
    print_info("Training works best with at least 5 recorded corrections");

    let client = station_client(cli, settings)?;
    let outcome = client.train().await?;

    if outcome.success {
        print_success(
            outcome
                .message
                .as_deref()
                .unwrap_or("Model trained successfully"),
        );
    } else {
        print_warning(&format!(
            "Training declined: {}",
            outcome.message.as_deref().unwrap_or("no reason given")
        ));
    }
    Ok(())
}

/// Show the learner's current point mappings
pub async fn mappings(cli: &Cli, settings: &Settings) -> Result<()> {
    let client = station_client(cli, settings)?;
    let mappings = client.mappings().await?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&mappings)?),
        OutputFormat::Table => {
            if mappings.is_empty() {
                print_warning("No mappings recorded yet");
                return Ok(());
            }
            let rows: Vec<MappingRow> = mappings
                .iter()
                .map(|m| MappingRow {
                    original: m.original_name.clone(),
                    canonical: m.canonical_field.clone(),
                    confidence: color_confidence(m.confidence),
                })
                .collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!("\nTotal: {} mappings", mappings.len());
        }
    }
    Ok(())
}
