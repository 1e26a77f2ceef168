use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::http_client::http_client;

/// One positional leaderboard row as delivered by the source.
///
/// Known columns: 1 name, 2 gender, 3 super region, 4 region, 5 score,
/// 6 sub score, 8 stable player id. Columns 0 and 7 are unused.
pub type RawRow = Vec<String>;

pub trait LeaderboardSource {
    fn fetch_raw(&self) -> Result<Vec<RawRow>>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardResponse {
    pub draw: u64,
    pub records: u64,
    pub records_filtered: u64,
    pub data: Vec<RawRow>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    draw: Option<Value>,
    #[serde(default)]
    records: Option<Value>,
    #[serde(default, rename = "recordsFiltered")]
    records_filtered: Option<Value>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

pub fn parse_leaderboard_json(raw: &str) -> Result<LeaderboardResponse> {
    let wire = serde_json::from_str::<Option<WireResponse>>(raw)
        .context("invalid leaderboard json")?;
    let Some(wire) = wire else {
        return Ok(LeaderboardResponse::default());
    };

    Ok(LeaderboardResponse {
        draw: wire.draw.as_ref().and_then(value_as_u64).unwrap_or(0),
        records: wire.records.as_ref().and_then(value_as_u64).unwrap_or(0),
        records_filtered: wire
            .records_filtered
            .as_ref()
            .and_then(value_as_u64)
            .unwrap_or(0),
        data: wire
            .data
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect(),
    })
}

/// The endpoint reports counts either as numbers or numeric strings.
fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Fixed-URL GET against the public ranking endpoint.
#[derive(Debug, Clone)]
pub struct HttpLeaderboardSource {
    url: String,
}

impl HttpLeaderboardSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl LeaderboardSource for HttpLeaderboardSource {
    fn fetch_raw(&self) -> Result<Vec<RawRow>> {
        let client = http_client()?;

        info!("calling leaderboard api");
        let resp = client
            .get(&self.url)
            .send()
            .with_context(|| format!("leaderboard request failed: {}", self.url))?;
        let status = resp.status();
        info!(ok = status.is_success(), status = status.as_u16(), "leaderboard api responded");

        let body = resp.text().context("failed reading leaderboard body")?;
        if !status.is_success() {
            return Err(anyhow!("http {}: {}", status, body));
        }

        let response = parse_leaderboard_json(&body)?;
        info!(records = response.records, rows = response.data.len(), "leaderboard data loaded");
        Ok(response.data)
    }
}

/// Serves a fixed set of rows; used for replays and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rows: Vec<RawRow>,
}

impl StaticSource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

impl LeaderboardSource for StaticSource {
    fn fetch_raw(&self) -> Result<Vec<RawRow>> {
        Ok(self.rows.clone())
    }
}
