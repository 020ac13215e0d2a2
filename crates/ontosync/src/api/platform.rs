//! HTTP client for the target building-management platform
//!
//! Every listing is paginated with `{page, limit}` query parameters and
//! reassembled through the page aggregator. Creation calls return `Ok` on
//! any 2xx; the orchestrator's verification pass is the only durability
//! check the pipeline trusts.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::auth::AuthSession;
use super::TargetApi;
use crate::error::Error;
use crate::models::{Building, Datasource, Paged, PlatformDevice, PlatformPoint, TargetDevice};
use crate::paging::{fetch_all, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Client for the target platform's public API
pub struct PlatformClient {
    http: Client,
    base_url: Url,
    auth: AuthSession,
    page_limit: u32,
}

impl PlatformClient {
    /// Create a new platform client.
    ///
    /// The base URL points at the API root, e.g.
    /// `https://api.example.com/bms/api/v1`.
    pub fn new(base_url: &str, auth: AuthSession) -> Result<Self, Error> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        // A trailing slash keeps Url::join from eating the last path segment
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)?;

        Ok(Self {
            http,
            base_url,
            auth,
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Override the page size used for listings (capped by the service)
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.min(MAX_PAGE_LIMIT);
        self
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        limit: u32,
        device_id: Option<&str>,
    ) -> Result<Paged<T>, Error> {
        let url = self.base_url.join(path)?;
        let bearer = self.auth.bearer().await?;
        debug!(%url, page, limit, "platform GET");

        let mut query: Vec<(&str, String)> =
            vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(id) = device_id {
            query.push(("deviceId", id.to_string()));
        }

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(bearer)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        if !response.status().is_success() {
            return Err(Error::from_response(&url, response).await);
        }

        response.json().await.map_err(|e| Error::transport(&url, e))
    }

    async fn post_json<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.base_url.join(path)?;
        let bearer = self.auth.bearer().await?;
        debug!(%url, "platform POST");

        let response = self
            .http
            .post(url.clone())
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        if !response.status().is_success() {
            return Err(Error::from_response(&url, response).await);
        }

        Ok(())
    }

    /// List all buildings visible to the service account
    pub async fn list_buildings(&self) -> Result<Vec<Building>, Error> {
        fetch_all(self.page_limit, |page, limit| {
            self.get_page("buildings", page, limit, None)
        })
        .await
    }

    /// List all points in a building, optionally filtered to one device
    pub async fn list_points(
        &self,
        building_id: &str,
        device_id: Option<&str>,
    ) -> Result<Vec<PlatformPoint>, Error> {
        let path = format!("buildings/{}/points", building_id);
        fetch_all(self.page_limit, |page, limit| {
            self.get_page(&path, page, limit, device_id)
        })
        .await
    }

    /// Find a datasource by its display name
    pub async fn find_datasource(
        &self,
        building_id: &str,
        name: &str,
    ) -> Result<Option<Datasource>, Error> {
        let datasources = self.list_datasources(building_id).await?;
        Ok(datasources.into_iter().find(|ds| ds.name == name))
    }
}

#[async_trait]
impl TargetApi for PlatformClient {
    async fn list_devices(&self, building_id: &str) -> Result<Vec<PlatformDevice>, Error> {
        let path = format!("buildings/{}/devices", building_id);
        fetch_all(self.page_limit, |page, limit| {
            self.get_page(&path, page, limit, None)
        })
        .await
    }

    async fn list_datasources(&self, building_id: &str) -> Result<Vec<Datasource>, Error> {
        let path = format!("buildings/{}/integrations/datasources", building_id);
        fetch_all(self.page_limit, |page, limit| {
            self.get_page(&path, page, limit, None)
        })
        .await
    }

    async fn create_device(
        &self,
        building_id: &str,
        datasource_id: &str,
        device: &TargetDevice,
    ) -> Result<(), Error> {
        let path = format!(
            "buildings/{}/integrations/datasources/{}/devices",
            building_id, datasource_id
        );
        self.post_json(&path, device).await
    }

    async fn create_devices_batch(
        &self,
        building_id: &str,
        datasource_id: &str,
        devices: &[TargetDevice],
    ) -> Result<(), Error> {
        let path = format!(
            "buildings/{}/integrations/datasources/{}/devices/batch",
            building_id, datasource_id
        );
        self.post_json(&path, &serde_json::json!({ "devices": devices }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PointKind, TargetPoint};
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> PlatformClient {
        PlatformClient::new(&server.url(), AuthSession::with_static_token("tok")).unwrap()
    }

    fn device(name: &str) -> TargetDevice {
        TargetDevice {
            id: format!("station_{}", name),
            name: name.to_string(),
            display_name: name.to_string(),
            path: None,
            points: vec![TargetPoint {
                name: "Zone_Temp".to_string(),
                point_id: "e1_av-1".to_string(),
                source_id: "ZoneTemp".to_string(),
                kind: PointKind::Number,
                writable: false,
                unit: None,
                point_enum: None,
            }],
        }
    }

    #[tokio::test]
    async fn building_listing_aggregates_pages() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/buildings")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("limit".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "data": [
                        {"_id": "b1", "name": "HQ"},
                        {"_id": "b2", "name": "Annex"}
                    ],
                    "total": 3
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/buildings")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("limit".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "data": [{"_id": "b3", "name": "Lab"}],
                    "total": 3
                })
                .to_string(),
            )
            .create_async()
            .await;

        let buildings = client_for(&server)
            .with_page_limit(2)
            .list_buildings()
            .await
            .unwrap();

        assert_eq!(buildings.len(), 3);
        assert_eq!(buildings[2].id, "b3");
    }

    #[tokio::test]
    async fn requests_carry_the_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/buildings")
            .match_header("authorization", "Bearer tok")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": [], "total": 0}).to_string())
            .create_async()
            .await;

        let buildings = client_for(&server).list_buildings().await.unwrap();

        mock.assert_async().await;
        assert!(buildings.is_empty());
    }

    #[tokio::test]
    async fn point_listing_passes_the_device_filter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/buildings/b1/points")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("deviceId".into(), "d9".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "data": [{"_id": "p1", "name": "Zone_Temp", "deviceId": "d9"}],
                    "total": 1
                })
                .to_string(),
            )
            .create_async()
            .await;

        let points = client_for(&server)
            .list_points("b1", Some("d9"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].device_id.as_deref(), Some("d9"));
    }

    #[tokio::test]
    async fn find_datasource_matches_by_name() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/buildings/b1/integrations/datasources")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "data": [
                        {"_id": "ds1", "name": "Modbus"},
                        {"_id": "ds2", "name": "StationSync"}
                    ],
                    "total": 2
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let found = client.find_datasource("b1", "StationSync").await.unwrap();
        assert_eq!(found.map(|ds| ds.id).as_deref(), Some("ds2"));

        let missing = client.find_datasource("b1", "Nothing").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn batch_creation_wraps_devices_in_an_envelope() {
        let mut server = mockito::Server::new_async().await;
        let devices = vec![device("AHU-1"), device("VAV-101")];
        let mock = server
            .mock(
                "POST",
                "/buildings/b1/integrations/datasources/ds1/devices/batch",
            )
            .match_body(Matcher::Json(json!({
                "devices": serde_json::to_value(&devices).unwrap()
            })))
            .with_status(201)
            .create_async()
            .await;

        client_for(&server)
            .create_devices_batch("b1", "ds1", &devices)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_failure_surfaces_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/buildings/b1/integrations/datasources/ds1/devices")
            .with_status(422)
            .with_body("duplicate pointId")
            .create_async()
            .await;

        let err = client_for(&server)
            .create_device("b1", "ds1", &device("AHU-1"))
            .await
            .unwrap_err();

        match err {
            Error::Status { status, body, .. } => {
                assert_eq!(status, 422);
                assert_eq!(body, "duplicate pointId");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }
}
