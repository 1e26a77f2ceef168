use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("srpg_notifier/", env!("CARGO_PKG_VERSION"));

/// Requests run until the peer answers; the caller's invocation deadline is
/// the only bound. reqwest's blocking builder defaults to 30s otherwise.
pub const REQUEST_TIMEOUT: Option<Duration> = None;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build http client")
    })
}
