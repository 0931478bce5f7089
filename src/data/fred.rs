//! FRED observations API integration (the retrieval collaborator).
//!
//! The client fetches one raw observation sequence per configured series for
//! a `[start, end]` window. The core never talks to the network; everything
//! it consumes comes through here (or the offline sample source) first.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{Observation, RawSeries, SeriesSpec};
use crate::error::{PanelError, Result};

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 10000;

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY").map_err(|_| {
            PanelError::Config("Missing FRED_API_KEY in environment (.env).".to_string())
        })?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Fetch the raw observations for every configured series.
    ///
    /// Output order matches declaration order regardless of how each request
    /// completes, so downstream column ordering stays deterministic.
    pub fn fetch_all(
        &self,
        series: &[SeriesSpec],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawSeries>> {
        let mut out = Vec::with_capacity(series.len());
        for spec in series {
            let raw = self.fetch_series(spec, start, end)?;
            info!(
                code = %spec.code,
                rows = raw.observations.len(),
                "fetched series"
            );
            out.push(raw);
        }
        Ok(out)
    }

    /// Fetch one series' observations for the window, sorted ascending.
    ///
    /// FRED reports market holidays and suppressed readings as `"."`; those
    /// become missing values rather than being dropped, so the raw CSV
    /// mirrors what the source actually said.
    pub fn fetch_series(
        &self,
        spec: &SeriesSpec,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", spec.code.as_str()),
                ("api_key", &self.api_key),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("limit", &OBS_LIMIT.to_string()),
                ("observation_start", &start.to_string()),
                ("observation_end", &end.to_string()),
            ])
            .send()
            .map_err(|e| PanelError::Fetch {
                code: spec.code.clone(),
                message: format!("request failed: {e}"),
            })?;

        if !resp.status().is_success() {
            return Err(PanelError::Fetch {
                code: spec.code.clone(),
                message: format!("request failed with status {}", resp.status()),
            });
        }

        let body: ObservationsResponse = resp.json().map_err(|e| PanelError::Fetch {
            code: spec.code.clone(),
            message: format!("failed to parse response: {e}"),
        })?;
        debug!(code = %spec.code, rows = body.observations.len(), "parsed response");

        let mut observations = Vec::with_capacity(body.observations.len());
        for obs in body.observations {
            let date =
                NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").map_err(|e| PanelError::Fetch {
                    code: spec.code.clone(),
                    message: format!("invalid date '{}': {e}", obs.date),
                })?;
            observations.push(Observation::new(date, parse_value(&obs.value)));
        }

        // FRED already returns ascending order for `sort_order=asc`, but the
        // downstream contract is strict, so enforce it here.
        observations.sort_by_key(|o| o.date);

        Ok(RawSeries::new(spec.clone(), observations))
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<WireObservation>,
}

#[derive(Debug, Deserialize)]
struct WireObservation {
    date: String,
    value: String,
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
