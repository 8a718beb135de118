use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

use crate::config::AppConfig;

const USER_AGENT: &str = concat!("fit_terminal/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Process-wide client, built on first use from the environment config.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| build_client(AppConfig::from_env().http_timeout))
}

pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    // The blocking builder defaults to 30s; pass the option through so `None` disables it.
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("failed to build http client")
}
