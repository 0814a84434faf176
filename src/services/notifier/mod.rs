//! Client for the external notifier that reports transaction status changes
//! back to this service through the `/update` webhook.
use crate::{
    constants::{NOTIFIER_BLOCKCHAIN, NOTIFIER_WATCH_PATH},
    models::{Network, SecretString},
};
use async_trait::async_trait;
use log::debug;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Notifier responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WatchPayload<'a> {
    api_key: &'a str,
    hash: &'a str,
    blockchain: &'a str,
    network: &'a str,
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait NotifierClientTrait: Send + Sync {
    /// Asks the notifier to start reporting events for `hash` on `network`.
    async fn watch_transaction(&self, hash: &str, network: Network) -> Result<(), NotifierError>;
}

#[derive(Debug, Clone)]
pub struct NotifierClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl NotifierClient {
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn watch_url(&self) -> String {
        format!("{}{}", self.base_url, NOTIFIER_WATCH_PATH)
    }
}

#[async_trait]
impl NotifierClientTrait for NotifierClient {
    async fn watch_transaction(&self, hash: &str, network: Network) -> Result<(), NotifierError> {
        let api_key = self.api_key.to_str();
        let payload = WatchPayload {
            api_key: &api_key,
            hash,
            blockchain: NOTIFIER_BLOCKCHAIN,
            network: network.into(),
        };

        debug!("Registering {} on {} with notifier", hash, network);
        let response = self
            .client
            .post(self.watch_url())
            .json(&payload)
            .send()
            .await?;

        // Only a plain 200 counts as an accepted watch.
        if response.status() == StatusCode::OK {
            return Ok(());
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(NotifierError::UnexpectedStatus { status, body })
    }
}
