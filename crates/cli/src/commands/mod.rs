//! CLI command implementations

pub mod inspect;
pub mod learn;
pub mod sync;

use anyhow::{Context, Result};
use ontosync::api::AuthSession;
use ontosync::{PlatformClient, StationClient};

use crate::config::Settings;
use crate::Cli;

/// Build the source station client from flags and settings
pub(crate) fn station_client(cli: &Cli, settings: &Settings) -> Result<StationClient> {
    let url = cli.source_url.as_deref().unwrap_or(&settings.source_url);
    StationClient::new(url, &settings.source_user, &settings.source_pass)
        .context("failed to create station client")
}

/// Build the target platform client from flags and settings
pub(crate) fn platform_client(cli: &Cli, settings: &Settings) -> Result<PlatformClient> {
    let url = cli.api_url.as_deref().unwrap_or(&settings.api_url);
    let token = cli
        .token
        .clone()
        .or_else(|| settings.access_token.clone())
        .unwrap_or_default();
    PlatformClient::new(url, AuthSession::with_static_token(token))
        .context("failed to create platform client")
}

/// Pick the building id from an argument or the configuration
pub(crate) fn building_id(arg: Option<&str>, settings: &Settings) -> Result<String> {
    arg.map(|s| s.to_string())
        .or_else(|| settings.building_id.clone())
        .context("no building id given; pass one or set building_id in the configuration")
}
