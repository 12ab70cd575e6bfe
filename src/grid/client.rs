use super::protocol::*;

use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_millis(500);
const ATTEMPTS: usize = 3;

/// HTTP client for one named map hosted by a remote grid member.
#[derive(Clone)]
pub struct GridClient {
    http_client: reqwest::Client,
    base_url: String,
    map_name: String,
}

impl GridClient {
    /// `address` is `host:port` or a full `http://` URL of the member.
    pub fn new(address: &str, map_name: &str) -> Self {
        let trimmed = address.trim().trim_end_matches('/');
        let base_url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        Self {
            http_client: reqwest::Client::new(),
            base_url,
            map_name: map_name.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub async fn contains_key(&self, key: &str) -> Result<bool> {
        let url = format!("{}{}", self.base_url, contains_path(&self.map_name, key));
        let response = self.send_with_retry(&url, |http| http.get(&url)).await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Contains request failed {}", response.status()));
        }

        let contains: ContainsResponse = response.json().await?;
        Ok(contains.present)
    }

    /// A member answers a missing key with 200 and no value. Any other status,
    /// including a 404 for an unknown map or route, is an error.
    pub async fn get<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        let url = format!("{}{}", self.base_url, get_path(&self.map_name, key));
        let response = self.send_with_retry(&url, |http| http.get(&url)).await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("GET request failed {}", response.status()));
        }

        let get_response: GetResponse = response.json().await?;

        match get_response.value_json {
            Some(json_str) => {
                let value: V = serde_json::from_str(&json_str)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Sends one batch. Retries reuse the same `op_id`, so the member applies it once.
    pub async fn put_all<V: Serialize>(&self, entries: &[(String, V)]) -> Result<usize> {
        let mut payload = PutAllRequest {
            op_id: Uuid::new_v4().to_string(),
            entries: Vec::with_capacity(entries.len()),
        };
        for (key, value) in entries {
            payload.entries.push(KeyValueJson {
                key: key.clone(),
                value_json: serde_json::to_string(value)?,
            });
        }

        let url = format!("{}{}", self.base_url, put_all_path(&self.map_name));
        let response = self
            .send_with_retry(&url, |http| http.post(&url).json(&payload))
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("PutAll failed {}", response.status()));
        }

        let ack: PutAllResponse = response.json().await?;
        if !ack.success {
            return Err(anyhow::anyhow!("PutAll rejected by member"));
        }
        Ok(ack.applied)
    }

    /// Retries transport failures with exponential backoff and jitter. A reply
    /// with any status ends the loop.
    async fn send_with_retry<F>(&self, url: &str, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut delay_ms = 150u64;
        let mut attempt = 1;

        loop {
            match build(&self.http_client).timeout(REQUEST_TIMEOUT).send().await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt >= ATTEMPTS => {
                    return Err(anyhow::anyhow!(e).context(format!(
                        "{} unreachable after {} attempts",
                        url, ATTEMPTS
                    )));
                }
                Err(e) => {
                    tracing::debug!("Request to {} failed (attempt {}): {}", url, attempt, e);
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                    attempt += 1;
                }
            }
        }
    }
}
