use std::time::Duration;

use tracing::warn;

use gridlot_shared::Region;

/// Server-side region API behind the sync layer. Errors use the same plain
/// string shape as the rest of the I/O plumbing; callers log and carry on,
/// since a dead remote never takes the session down.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    async fn fetch_all(&self) -> Result<Vec<Region>, String>;
    async fn append(&self, regions: &[Region]) -> Result<(), String>;
}

/// HTTP implementation talking to the region server.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("gridlot-engine/0.1")
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build configured HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn regions_url(&self) -> String {
        format!("{}/api/regions", self.base_url)
    }
}

impl RemoteStore for HttpRemoteStore {
    async fn fetch_all(&self) -> Result<Vec<Region>, String> {
        let resp = self
            .client
            .get(self.regions_url())
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| format!("failed to read response body: {e}"))?;

        if !status.is_success() {
            let preview = String::from_utf8_lossy(&bytes)
                .chars()
                .take(200)
                .collect::<String>();
            return Err(format!("remote status {status}; body preview: {preview}"));
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            let preview = String::from_utf8_lossy(&bytes)
                .chars()
                .take(200)
                .collect::<String>();
            format!("failed to decode region payload: {e}; body preview: {preview}")
        })
    }

    async fn append(&self, regions: &[Region]) -> Result<(), String> {
        if regions.is_empty() {
            return Ok(());
        }
        let resp = self
            .client
            .post(self.regions_url())
            .json(regions)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;
        let status = resp.status();
        if !status.is_success() {
            let preview = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect::<String>();
            return Err(format!("remote status {status}; body preview: {preview}"));
        }
        Ok(())
    }
}
