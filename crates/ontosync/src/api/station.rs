//! HTTP client for the source station's ontology module
//!
//! The station exposes the entity listing, per-entity fields, and the
//! correction-learning side channel on one base URL, authenticated with
//! HTTP basic credentials.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{CorrectionLearner, SourceApi};
use crate::error::Error;
use crate::models::{
    Correction, EntityList, FieldList, LearnedMapping, MappingList, SourceEntity, SourceField,
    TrainOutcome,
};

/// Client for the source station API
pub struct StationClient {
    http: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl StationClient {
    /// Create a new station client.
    ///
    /// The base URL points at the ontology module root, e.g.
    /// `http://station:8080/ontology/v1`.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, Error> {
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
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.base_url.join(path)?;
        debug!(%url, "station GET");

        let response = self
            .http
            .get(url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        if !response.status().is_success() {
            return Err(Error::from_response(&url, response).await);
        }

        response.json().await.map_err(|e| Error::transport(&url, e))
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response, Error> {
        let url = self.base_url.join(path)?;
        debug!(%url, "station POST");

        let response = self
            .http
            .post(url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        if !response.status().is_success() {
            return Err(Error::from_response(&url, response).await);
        }

        Ok(response)
    }

    async fn post_empty(&self, path: &str) -> Result<reqwest::Response, Error> {
        let url = self.base_url.join(path)?;
        debug!(%url, "station POST");

        let response = self
            .http
            .post(url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        if !response.status().is_success() {
            return Err(Error::from_response(&url, response).await);
        }

        Ok(response)
    }
}

#[async_trait]
impl SourceApi for StationClient {
    async fn entities(&self) -> Result<Vec<SourceEntity>, Error> {
        let list: EntityList = self.get_json("entities").await?;
        Ok(list.entities)
    }

    async fn entity_fields(&self, entity_id: &str) -> Result<Vec<SourceField>, Error> {
        let list: FieldList = self
            .get_json(&format!("entity/{}/fields", entity_id))
            .await?;
        Ok(list.fields)
    }
}

#[async_trait]
impl CorrectionLearner for StationClient {
    async fn submit_correction(&self, correction: &Correction) -> Result<(), Error> {
        self.post_json("learning/correct", correction).await?;
        Ok(())
    }

    async fn train(&self) -> Result<TrainOutcome, Error> {
        let response = self.post_empty("learning/train").await?;
        let url = self.base_url.join("learning/train")?;
        response.json().await.map_err(|e| Error::transport(&url, e))
    }

    async fn stats(&self) -> Result<serde_json::Value, Error> {
        self.get_json("learning/stats").await
    }

    async fn mappings(&self) -> Result<Vec<LearnedMapping>, Error> {
        let list: MappingList = self.get_json("mappings").await?;
        Ok(list.mappings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> StationClient {
        StationClient::new(&server.url(), "admin", "admin").unwrap()
    }

    #[tokio::test]
    async fn entities_are_parsed_from_the_listing_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/entities")
            .with_status(200)
            .with_body(
                json!({
                    "entities": [
                        {"id": "e1", "name": "AHU-1", "entityType": "AHU"},
                        {"id": "e2", "name": "VAV-101", "entityType": "VAV", "zone": "3F"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let entities = client_for(&server).entities().await.unwrap();

        mock.assert_async().await;
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].id, "e1");
        assert_eq!(entities[1].entity_type, "VAV");
        assert!(entities[0].fields.is_empty());
    }

    #[tokio::test]
    async fn fields_carry_optional_keys() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/entity/e1/fields")
            .with_status(200)
            .with_body(
                json!({
                    "fields": [
                        {
                            "addr": "av-3",
                            "originalName": "SaTempSensor",
                            "canonicalField": "supply_air_temperature_sensor",
                            "confidence": 85,
                            "units": "degF"
                        },
                        {
                            "addr": "bv-1",
                            "originalName": "FanSts",
                            "canonicalField": "supply_fan_run_status",
                            "confidence": 92
                        }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let fields = client_for(&server).entity_fields("e1").await.unwrap();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].units.as_deref(), Some("degF"));
        assert!(fields[1].units.is_none());
        assert_eq!(fields[1].confidence, 92);
    }

    #[tokio::test]
    async fn non_2xx_becomes_a_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/entities")
            .with_status(503)
            .with_body("station offline")
            .create_async()
            .await;

        let err = client_for(&server).entities().await.unwrap_err();

        match err {
            Error::Status { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "station offline");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn corrections_are_posted_as_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/learning/correct")
            .match_body(mockito::Matcher::Json(json!({
                "pointName": "AHU-1-FanStatus",
                "correctMatch": "fan_run_status",
                "equipmentType": "AHU"
            })))
            .with_status(200)
            .create_async()
            .await;

        let correction = Correction {
            point_name: "AHU-1-FanStatus".to_string(),
            correct_match: "fan_run_status".to_string(),
            equipment_type: Some("AHU".to_string()),
        };
        client_for(&server)
            .submit_correction(&correction)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn train_reports_the_outcome() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/learning/train")
            .with_status(200)
            .with_body(json!({"success": false, "message": "not enough corrections"}).to_string())
            .create_async()
            .await;

        let outcome = client_for(&server).train().await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("not enough corrections"));
    }

    #[tokio::test]
    async fn mappings_are_unwrapped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/mappings")
            .with_status(200)
            .with_body(
                json!({
                    "mappings": [
                        {
                            "originalName": "VAV-101-ZoneTemp",
                            "canonicalField": "zone_air_temperature_sensor",
                            "confidence": 88
                        }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let mappings = client_for(&server).mappings().await.unwrap();

        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].canonical_field, "zone_air_temperature_sensor");
    }
}
