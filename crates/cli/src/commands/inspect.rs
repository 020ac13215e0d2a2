//! Listing commands for both sides of the pipeline

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

use super::{building_id, platform_client, station_client};
use crate::config::Settings;
use crate::output::{print_warning, OutputFormat};
use crate::Cli;
use ontosync::{SourceApi, TargetApi};

/// Row for buildings and datasources
#[derive(Tabled)]
struct NamedRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Row for platform points
#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    device: String,
}

/// Row for source entities
#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    entity_type: String,
    #[tabled(rename = "ID")]
    id: String,
}

fn print_named<T: serde::Serialize>(
    items: &[T],
    rows: Vec<NamedRow>,
    format: OutputFormat,
    empty_message: &str,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
        OutputFormat::Table => {
            if rows.is_empty() {
                print_warning(empty_message);
                return Ok(());
            }
            let count = rows.len();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!("\nTotal: {}", count);
        }
    }
    Ok(())
}

/// List buildings in the target platform
pub async fn buildings(cli: &Cli, settings: &Settings) -> Result<()> {
    let client = platform_client(cli, settings)?;
    let buildings = client.list_buildings().await?;

    let rows = buildings
        .iter()
        .map(|b| NamedRow {
            name: b.name.clone(),
            id: b.id.clone(),
        })
        .collect();
    print_named(&buildings, rows, cli.format, "No buildings found")
}

/// List devices in a target building
pub async fn devices(cli: &Cli, settings: &Settings, building: Option<&str>) -> Result<()> {
    let id = building_id(building, settings)?;
    let client = platform_client(cli, settings)?;
    let devices = client.list_devices(&id).await?;

    let rows = devices
        .iter()
        .map(|d| NamedRow {
            name: d.name.clone(),
            id: d.id.clone(),
        })
        .collect();
    print_named(&devices, rows, cli.format, "No devices found")
}

/// List points in a target building
pub async fn points(
    cli: &Cli,
    settings: &Settings,
    building: Option<&str>,
    device: Option<&str>,
) -> Result<()> {
    let id = building_id(building, settings)?;
    let client = platform_client(cli, settings)?;
    let points = client.list_points(&id, device).await?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&points)?),
        OutputFormat::Table => {
            if points.is_empty() {
                print_warning("No points found");
                return Ok(());
            }
            let rows: Vec<PointRow> = points
                .iter()
                .map(|p| PointRow {
                    name: p.name.clone(),
                    id: p.id.clone(),
                    device: p.device_id.clone().unwrap_or_else(|| "-".to_string()),
                })
                .collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!("\nTotal: {} points", points.len());
        }
    }
    Ok(())
}

/// List datasources in a target building
pub async fn datasources(cli: &Cli, settings: &Settings, building: Option<&str>) -> Result<()> {
    let id = building_id(building, settings)?;
    let client = platform_client(cli, settings)?;
    let datasources = client.list_datasources(&id).await?;

    let rows = datasources
        .iter()
        .map(|ds| NamedRow {
            name: ds.name.clone(),
            id: ds.id.clone(),
        })
        .collect();
    print_named(&datasources, rows, cli.format, "No datasources found")
}

/// List entities exposed by the source station
pub async fn entities(cli: &Cli, settings: &Settings) -> Result<()> {
    let client = station_client(cli, settings)?;
    let entities = client.entities().await?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entities)?),
        OutputFormat::Table => {
            if entities.is_empty() {
                print_warning("No entities found");
                return Ok(());
            }
            let rows: Vec<EntityRow> = entities
                .iter()
                .map(|e| EntityRow {
                    name: e.name.clone(),
                    entity_type: e.entity_type.clone(),
                    id: e.id.clone(),
                })
                .collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!("\nTotal: {} entities", entities.len());
        }
    }
    Ok(())
}
