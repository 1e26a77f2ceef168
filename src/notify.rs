use serde::Serialize;
use tracing::{debug, info, warn};

use crate::http_client::http_client;

const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Result of one message post. Sends never abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered { status: u16 },
    Rejected { status: u16 },
    Failed { reason: String },
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }
}

pub trait NotificationSink {
    fn post(&self, content: &str) -> SendOutcome;
}

#[derive(Debug, Serialize)]
struct WebhookBody<'a> {
    content: &'a str,
}

#[derive(Debug, Clone)]
pub struct WebhookSink {
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl NotificationSink for WebhookSink {
    fn post(&self, content: &str) -> SendOutcome {
        let client = match http_client() {
            Ok(client) => client,
            Err(err) => {
                return SendOutcome::Failed {
                    reason: format!("{err:#}"),
                };
            }
        };
        let body = match serde_json::to_string(&WebhookBody { content }) {
            Ok(body) => body,
            Err(err) => {
                return SendOutcome::Failed {
                    reason: format!("serialize webhook body: {err}"),
                };
            }
        };

        let resp = client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send();
        match resp {
            Ok(resp) => {
                let status = resp.status();
                info!(ok = status.is_success(), status = status.as_u16(), "webhook call finished");
                if status.is_success() {
                    SendOutcome::Delivered {
                        status: status.as_u16(),
                    }
                } else {
                    SendOutcome::Rejected {
                        status: status.as_u16(),
                    }
                }
            }
            Err(err) => SendOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub title: SendOutcome,
    pub pages: Vec<SendOutcome>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> usize {
        std::iter::once(&self.title)
            .chain(self.pages.iter())
            .filter(|outcome| outcome.is_delivered())
            .count()
    }

    /// Failed sends with their position: 0 is the title, 1.. are pages.
    pub fn failures(&self) -> Vec<(usize, &SendOutcome)> {
        std::iter::once(&self.title)
            .chain(self.pages.iter())
            .enumerate()
            .filter(|(_, outcome)| !outcome.is_delivered())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }
}

/// Split lines into consecutive pages of `page_size`, each joined by newlines.
pub fn paginate(lines: &[String], page_size: usize) -> Vec<String> {
    lines
        .chunks(page_size.max(1))
        .map(|page| page.join("\n"))
        .collect()
}

/// Title first, then each page in order. Every send is attempted.
pub fn deliver(sink: &dyn NotificationSink, title: &str, pages: &[String]) -> DeliveryReport {
    info!("sending title");
    let title_outcome = sink.post(title);
    log_failure(0, &title_outcome);

    let pages = pages
        .iter()
        .enumerate()
        .map(|(idx, page)| {
            debug!(page = idx + 1, "{page}");
            info!(page = idx + 1, "sending page");
            let outcome = sink.post(page);
            log_failure(idx + 1, &outcome);
            outcome
        })
        .collect();

    DeliveryReport {
        title: title_outcome,
        pages,
    }
}

fn log_failure(position: usize, outcome: &SendOutcome) {
    match outcome {
        SendOutcome::Delivered { .. } => {}
        SendOutcome::Rejected { status } => {
            warn!(position, status, "webhook rejected message");
        }
        SendOutcome::Failed { reason } => {
            warn!(position, reason = %reason, "webhook call failed");
        }
    }
}
