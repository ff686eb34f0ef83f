use async_trait::async_trait;
use chrono::SecondsFormat;
use color_eyre::{eyre::eyre, Result};
use reqwest::{Client, StatusCode};

use crate::models::{BoundingBox, TimeWindow};

/// Where target history comes from. The HTTP client implements this; tests
/// substitute canned newline-delimited bodies.
#[async_trait]
pub trait FlightDataSource: Send + Sync {
    /// Raw newline-delimited JSON for all target updates inside a time
    /// window and bounding box.
    async fn search_area(&self, window: &TimeWindow, bbox: &BoundingBox) -> Result<String>;

    /// Raw newline-delimited JSON for one transponder's updates inside a
    /// time window.
    async fn icao_history(&self, icao_address: &str, window: &TimeWindow) -> Result<String>;
}

pub struct HistoryClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl HistoryClient {
    pub fn new(endpoint: &str, token: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap(),
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        }
    }

    async fn get_history(&self, params: &[(&str, String)]) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(eyre!("invalid token: history endpoint returned 401"));
        }

        Ok(response.error_for_status()?.text().await?)
    }
}

fn stamp(window: &TimeWindow) -> (String, String) {
    (
        window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
        window.end.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

#[async_trait]
impl FlightDataSource for HistoryClient {
    async fn search_area(&self, window: &TimeWindow, bbox: &BoundingBox) -> Result<String> {
        let (start, end) = stamp(window);
        self.get_history(&[
            ("start", start),
            ("end", end),
            ("longitude_between", bbox.longitude_between()),
            ("latitude_between", bbox.latitude_between()),
        ])
        .await
    }

    async fn icao_history(&self, icao_address: &str, window: &TimeWindow) -> Result<String> {
        let (start, end) = stamp(window);
        self.get_history(&[
            ("start", start),
            ("end", end),
            ("icao_address", icao_address.to_string()),
        ])
        .await
    }
}
