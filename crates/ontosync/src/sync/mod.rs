//! Sync orchestration: fetch, transform, preview, create, verify
//!
//! Drives one end-to-end sync run through its phases in strict order:
//! Fetching -> Transforming -> Previewing -> (DryRunStop | Deduplicating)
//! -> Creating -> Verifying -> Done. The run is sequential; the only
//! cancellation point sits between [`SyncOrchestrator::plan`] and
//! [`SyncOrchestrator::execute`], where a caller shows the preview and may
//! stop before anything is written.


use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{SourceApi, TargetApi};
use crate::error::Error;
use crate::mapping::OntologyMapper;
use crate::models::TargetDevice;
use crate::transform::{transform_entity, TransformOptions};

/// How devices are written to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// One call carrying the full device list; succeeds or fails as a unit
    Batch,
    /// Sequential per-device calls, continuing past individual failures
    OneByOne,
}

/// Operator-supplied knobs for one sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Target building to sync into
    pub building_id: String,
    /// Explicit datasource id; when absent, the datasource is resolved by name
    pub datasource_id: Option<String>,
    /// Datasource display name used for by-name resolution
    pub datasource_name: String,
    /// Minimum upstream match confidence for a field to become a point
    pub min_confidence: u8,
    /// Entity-type allow-list; `None` syncs every type
    pub entity_types: Option<Vec<String>>,
    /// Stop after the preview without touching the target
    pub dry_run: bool,
    pub mode: CreateMode,
    /// Prefix for generated target device ids
    pub device_id_prefix: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            building_id: String::new(),
            datasource_id: None,
            datasource_name: "StationSync".to_string(),
            min_confidence: 70,
            entity_types: None,
            dry_run: false,
            mode: CreateMode::Batch,
            device_id_prefix: "station".to_string(),
        }
    }
}

/// One line of the pre-write preview
#[derive(Debug, Clone, Serialize)]
pub struct DevicePreview {
    pub name: String,
    /// Canonical device category (e.g. `ahu`)
    pub category: String,
    pub point_count: usize,
}

/// Output of the read-only half of a run: everything needed to decide
/// whether to write
#[derive(Debug, Clone, Serialize)]
pub struct SyncPlan {
    /// Devices ready for creation
    pub devices: Vec<TargetDevice>,
    pub preview: Vec<DevicePreview>,
    /// Entities listed by the source
    pub fetched: usize,
    /// Entities surviving the type allow-list
    pub filtered: usize,
    /// Entities dropped by the transformer (generic type or no points)
    pub skipped: usize,
}

/// A device that could not be created in one-by-one mode
#[derive(Debug, Clone, Serialize)]
pub struct CreateFailure {
    pub device: String,
    pub error: String,
}

/// Tally of a completed (or dry) run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub fetched: usize,
    pub filtered: usize,
    pub transformed: usize,
    pub skipped: usize,
    /// Candidates whose name already existed in the target building
    pub already_present: usize,
    /// Devices we actually tried to create
    pub attempted: usize,
    pub created: usize,
    /// Per-device failures (one-by-one mode)
    pub failures: Vec<CreateFailure>,
    /// The whole-batch failure, when batch mode failed as a unit
    pub batch_error: Option<String>,
    /// Attempted devices observed in the target after creation
    pub verified: usize,
    pub dry_run: bool,
}

impl SyncReport {
    fn from_plan(plan: &SyncPlan, dry_run: bool) -> Self {
        Self {
            fetched: plan.fetched,
            filtered: plan.filtered,
            transformed: plan.devices.len(),
            skipped: plan.skipped,
            already_present: 0,
            attempted: 0,
            created: 0,
            failures: Vec::new(),
            batch_error: None,
            verified: 0,
            dry_run,
        }
    }
}

/// Drives the end-to-end pipeline against the source and target APIs
pub struct SyncOrchestrator {
    source: Arc<dyn SourceApi>,
    target: Arc<dyn TargetApi>,
    mapper: OntologyMapper,
    options: SyncOptions,
}

impl SyncOrchestrator {
    pub fn new(source: Arc<dyn SourceApi>, target: Arc<dyn TargetApi>, options: SyncOptions) -> Self {
        Self {
            source,
            target,
            mapper: OntologyMapper::new(),
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Fetching + Transforming: read the source and assemble the candidate
    /// device list without touching the target.
    ///
    /// A failed listing or field fetch aborts the run; transformer drops
    /// are counted, never retried.
    pub async fn plan(&self) -> Result<SyncPlan, Error> {
        info!("fetching entities from source");
        let mut entities = self.source.entities().await?;
        let fetched = entities.len();

        if let Some(allow) = &self.options.entity_types {
            entities.retain(|e| allow.iter().any(|t| t.eq_ignore_ascii_case(&e.entity_type)));
        }
        let filtered = entities.len();
        info!(fetched, filtered, "source entities listed");

        let transform_options = TransformOptions {
            min_confidence: self.options.min_confidence,
            device_id_prefix: self.options.device_id_prefix.clone(),
        };

        let mut devices = Vec::new();
        let mut preview = Vec::new();
        let mut skipped = 0usize;

        for mut entity in entities {
            entity.fields = self.source.entity_fields(&entity.id).await?;

            match transform_entity(&entity, &self.mapper, &transform_options) {
                Some(device) => {
                    preview.push(DevicePreview {
                        name: device.name.clone(),
                        category: self.mapper.map_device_type(&entity.entity_type),
                        point_count: device.points.len(),
                    });
                    devices.push(device);
                }
                None => {
                    skipped += 1;
                    debug!(
                        entity = %entity.name,
                        entity_type = %entity.entity_type,
                        "entity skipped by transformer"
                    );
                }
            }
        }

        info!(
            transformed = devices.len(),
            skipped, "transformation complete"
        );

        Ok(SyncPlan {
            devices,
            preview,
            fetched,
            filtered,
            skipped,
        })
    }

    /// Deduplicating + Creating + Verifying: write the planned devices.
    ///
    /// Never called on a dry run; [`SyncOrchestrator::run`] and interactive
    /// callers stop after [`SyncOrchestrator::plan`] in that case.
    pub async fn execute(&self, plan: SyncPlan) -> Result<SyncReport, Error> {
        let mut report = SyncReport::from_plan(&plan, false);
        let building_id = &self.options.building_id;

        let datasource_id = self.resolve_datasource().await?;
        info!(datasource_id = %datasource_id, "datasource resolved");

        // Duplicate detection by name against what the target already has
        let existing: HashSet<String> = self
            .target
            .list_devices(building_id)
            .await?
            .into_iter()
            .map(|d| d.name)
            .collect();

        let (to_create, already): (Vec<TargetDevice>, Vec<TargetDevice>) = plan
            .devices
            .into_iter()
            .partition(|d| !existing.contains(&d.name));

        report.already_present = already.len();
        report.attempted = to_create.len();
        for device in &already {
            debug!(device = %device.name, "already present in target, skipping");
        }

        if to_create.is_empty() {
            info!("nothing to create");
            return Ok(report);
        }

        match self.options.mode {
            CreateMode::Batch => {
                info!(devices = to_create.len(), "creating devices in one batch");
                match self
                    .target
                    .create_devices_batch(building_id, &datasource_id, &to_create)
                    .await
                {
                    Ok(()) => report.created = to_create.len(),
                    Err(e) => {
                        warn!(error = %e, "batch creation failed as a unit");
                        report.batch_error = Some(e.to_string());
                    }
                }
            }
            CreateMode::OneByOne => {
                info!(devices = to_create.len(), "creating devices one by one");
                for device in &to_create {
                    match self
                        .target
                        .create_device(building_id, &datasource_id, device)
                        .await
                    {
                        Ok(()) => report.created += 1,
                        Err(e) => {
                            warn!(device = %device.name, error = %e, "device creation failed");
                            report.failures.push(CreateFailure {
                                device: device.name.clone(),
                                error: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        // Verification: re-read the target and count which attempted names
        // actually landed. Create responses alone are not trusted as proof.
        let present: HashSet<String> = self
            .target
            .list_devices(building_id)
            .await?
            .into_iter()
            .map(|d| d.name)
            .collect();

        report.verified = to_create
            .iter()
            .filter(|d| present.contains(&d.name))
            .count();

        if report.verified < report.created {
            warn!(
                created = report.created,
                verified = report.verified,
                "some created devices are not yet visible in the target listing"
            );
        }

        info!(
            created = report.created,
            failed = report.failures.len(),
            verified = report.verified,
            "sync run complete"
        );

        Ok(report)
    }

    /// Run the whole pipeline non-interactively: plan, then stop on dry
    /// run, otherwise execute.
    pub async fn run(&self) -> Result<SyncReport, Error> {
        let plan = self.plan().await?;

        if self.options.dry_run {
            info!("dry run requested, stopping before any write");
            return Ok(SyncReport::from_plan(&plan, true));
        }

        self.execute(plan).await
    }

    /// Resolve the datasource to create devices under.
    ///
    /// Datasources are pre-provisioned container resources; when neither
    /// the explicit id nor the by-name lookup yields one, the gap is
    /// surfaced to the operator instead of silently creating anything.
    async fn resolve_datasource(&self) -> Result<String, Error> {
        if let Some(id) = &self.options.datasource_id {
            return Ok(id.clone());
        }

        let datasources = self
            .target
            .list_datasources(&self.options.building_id)
            .await?;

        datasources
            .into_iter()
            .find(|ds| ds.name == self.options.datasource_name)
            .map(|ds| ds.id)
            .ok_or_else(|| Error::DatasourceNotFound {
                name: self.options.datasource_name.clone(),
                building_id: self.options.building_id.clone(),
            })
    }
}
