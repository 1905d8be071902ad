use super::types::*;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Header carrying the opaque device identity on authenticated calls.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Client contract for the remote food-ordering service.
#[async_trait]
pub trait DeliveryApi: Send + Sync {
    /// GET /me — preference bootstrap. `None` for a device the service has
    /// never seen.
    async fn load_preferences(&self, device_id: &str) -> Result<Option<Preferences>>;

    /// POST /preferences — upsert the full preference object.
    async fn save_preferences(&self, device_id: &str, preferences: &Preferences) -> Result<()>;

    /// GET /recommend/v1 — structured recommendation.
    async fn get_recommendation(&self, device_id: &str) -> Result<Recommendation>;

    /// GET /recommend — minimal variant; no identity header, arbitrary JSON.
    async fn get_recommendation_raw(&self) -> Result<RecoPayload>;
}

pub struct HttpDeliveryApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDeliveryApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Applies the shared error policy: transport failures map to
    /// `Error::Network`, non-2xx responses to `Error::Api` carrying the
    /// body's `error` field or an `HTTP <status>` fallback.
    async fn read_json(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;
        let json: Option<Value> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = json
                .as_ref()
                .and_then(|v| v.get("error"))
                .and_then(|e| e.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(Error::api(message));
        }

        json.ok_or_else(|| Error::api(format!("invalid JSON in response (HTTP {})", status.as_u16())))
    }
}

#[async_trait]
impl DeliveryApi for HttpDeliveryApi {
    async fn load_preferences(&self, device_id: &str) -> Result<Option<Preferences>> {
        debug!("Loading preferences for device: {}", device_id);

        let response = self
            .client
            .get(format!("{}/me", self.base_url))
            .header(USER_ID_HEADER, device_id)
            .send()
            .await?;

        let json = self.read_json(response).await?;
        let me: MeResponse = serde_json::from_value(json)?;
        Ok(me.preferences)
    }

    async fn save_preferences(&self, device_id: &str, preferences: &Preferences) -> Result<()> {
        debug!("Saving preferences for device: {}", device_id);

        let response = self
            .client
            .post(format!("{}/preferences", self.base_url))
            .header(USER_ID_HEADER, device_id)
            .json(preferences)
            .send()
            .await?;

        self.read_json(response).await?;
        Ok(())
    }

    async fn get_recommendation(&self, device_id: &str) -> Result<Recommendation> {
        debug!("Requesting recommendation for device: {}", device_id);

        let response = self
            .client
            .get(format!("{}/recommend/v1", self.base_url))
            .header(USER_ID_HEADER, device_id)
            .send()
            .await?;

        let json = self.read_json(response).await?;
        let reco: Recommendation = serde_json::from_value(json)?;
        Ok(reco)
    }

    async fn get_recommendation_raw(&self) -> Result<RecoPayload> {
        debug!("Requesting raw recommendation");

        let response = self
            .client
            .get(format!("{}/recommend", self.base_url))
            .send()
            .await?;

        let json = self.read_json(response).await?;
        Ok(RecoPayload::from(json))
    }
}
