use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{DEFAULT_API_URL, normalize_base_url};
use crate::http_client::http_client;
use crate::state::{PlayerSearchResult, SimulationResult, Team};

const SEARCH_PATH: &str = "/players/search";
const TEAMS_PATH: &str = "/teams";
const SIMULATE_PATH: &str = "/simulate-fit";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("http {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only calls against the fit scoring backend. One attempt per call.
pub trait FitService {
    fn search_players(&self, name: &str) -> Result<Vec<PlayerSearchResult>, TransportError>;

    fn list_teams(&self) -> Result<Vec<Team>, TransportError>;

    fn evaluate_fit(&self, player_id: u32, team_id: u32)
    -> Result<SimulationResult, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpFitService {
    client: Client,
    base_url: String,
}

impl HttpFitService {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = http_client()?.clone();
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        let mut base_url = normalize_base_url(base_url);
        if base_url.is_empty() {
            base_url = DEFAULT_API_URL.to_string();
        }
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get_body(&self, path: &str, query: &[(&str, String)]) -> Result<String, TransportError> {
        let mut req = self.client.get(self.endpoint(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        let resp = req.send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(TransportError::Status { status, body });
        }
        Ok(body)
    }
}

impl FitService for HttpFitService {
    fn search_players(&self, name: &str) -> Result<Vec<PlayerSearchResult>, TransportError> {
        let body = self.get_body(SEARCH_PATH, &[("name", name.to_string())])?;
        parse_players_json(&body)
    }

    fn list_teams(&self) -> Result<Vec<Team>, TransportError> {
        let body = self.get_body(TEAMS_PATH, &[])?;
        parse_teams_json(&body)
    }

    fn evaluate_fit(
        &self,
        player_id: u32,
        team_id: u32,
    ) -> Result<SimulationResult, TransportError> {
        let body = self.get_body(
            SIMULATE_PATH,
            &[
                ("player_id", player_id.to_string()),
                ("team_id", team_id.to_string()),
            ],
        )?;
        parse_simulation_json(&body)
    }
}

pub fn parse_players_json(raw: &str) -> Result<Vec<PlayerSearchResult>, TransportError> {
    parse_list(raw)
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<Team>, TransportError> {
    parse_list(raw)
}

pub fn parse_simulation_json(raw: &str) -> Result<SimulationResult, TransportError> {
    Ok(serde_json::from_str(raw.trim())?)
}

fn parse_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, TransportError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}
