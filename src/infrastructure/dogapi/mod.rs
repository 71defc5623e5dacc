//! dog.ceo API client - breed catalog loading and random image fetching

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::errors::{BotError, CatalogError, FetchError};
use crate::domain::entities::BreedCatalog;
use crate::domain::traits::{BreedImageSource, ImageTarget};

/// Client for the public dog.ceo breed/image API.
pub struct DogApiClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ListAllResponse {
    message: BreedCatalog,
}

#[derive(Deserialize)]
struct ImageResponse {
    message: String,
}

impl DogApiClient {
    pub fn new(base_url: impl Into<String>, proxy: Option<&str>) -> Result<Self, BotError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(30));
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| BotError::Network(format!("invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Load the full breed catalog. Called once before the bot starts
    /// serving; any failure here is fatal to startup.
    pub async fn load_catalog(&self) -> Result<BreedCatalog, CatalogError> {
        let url = self.url("api/breeds/list/all");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        let data: ListAllResponse =
            serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))?;

        tracing::info!("Loaded breed catalog with {} breeds", data.message.len());
        Ok(data.message)
    }

    fn image_path(target: &ImageTarget) -> String {
        match target.identifier() {
            None => "api/breeds/image/random".to_string(),
            Some(id) => format!("api/breed/{}/images/random", id),
        }
    }
}

#[async_trait]
impl BreedImageSource for DogApiClient {
    async fn random_image(&self, target: &ImageTarget) -> Result<String, FetchError> {
        let url = self.url(&Self::image_path(target));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        match response.status().as_u16() {
            200 => {
                let data: ImageResponse = response
                    .json()
                    .await
                    .map_err(|e| FetchError::Parse(e.to_string()))?;
                Ok(data.message)
            }
            404 => Err(FetchError::NotFound),
            status => Err(FetchError::Upstream { status }),
        }
    }
}
