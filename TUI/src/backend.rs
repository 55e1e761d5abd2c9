// Backend communication with the vibe server over HTTP

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::image::SelectedImage;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub text: String,
    /// Open set; unknown values render unstyled
    pub sentiment: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawMeme")]
pub struct MemeResult {
    pub url: String,
    pub name: String,
    #[serde(rename = "postLink", skip_serializing_if = "Option::is_none")]
    pub post_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
}

/// Meme objects relayed from meme-api carry `title`; ours carry `name`.
/// Some carry both, and `name` wins.
#[derive(Debug, Deserialize)]
struct RawMeme {
    url: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "postLink")]
    post_link: Option<String>,
    #[serde(default)]
    subreddit: Option<String>,
}

impl From<RawMeme> for MemeResult {
    fn from(raw: RawMeme) -> Self {
        Self {
            url: raw.url,
            name: raw.name.or(raw.title).unwrap_or_default(),
            post_link: raw.post_link,
            subreddit: raw.subreddit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RecommendResponse {
    #[serde(default)]
    pub memes: Option<Vec<MemeResult>>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
}

impl RecommendResponse {
    pub fn into_memes(self) -> Vec<MemeResult> {
        self.memes.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
}

impl HealthResponse {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

#[derive(Debug, Serialize)]
struct RecommendRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url {0}")]
    InvalidUrl(String),
    #[error("server returned {status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The two (plus health) endpoints the UI talks to.
#[async_trait]
pub trait VibeApi: Send + Sync {
    async fn analyze(&self, image: &SelectedImage) -> Result<AnalysisResult, ClientError>;
    async fn recommend(&self, text: &str) -> Result<RecommendResponse, ClientError>;
    async fn health(&self) -> Result<HealthResponse, ClientError>;
}

pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(server_url).map_err(|_| ClientError::InvalidUrl(server_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(server_url.to_string()));
        }
        // Url::join replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, name: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(name)
            .map_err(|_| ClientError::InvalidUrl(format!("{}{}", self.base_url, name)))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl VibeApi for HttpBackend {
    async fn analyze(&self, image: &SelectedImage) -> Result<AnalysisResult, ClientError> {
        let url = self.endpoint("analyze")?;
        info!(file = %image.file_name, bytes = image.size(), "POST {}", url);

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)?;
        let form = Form::new().part("image", part);

        let response = self.client.post(url).multipart(form).send().await?;
        debug!(status = %response.status(), "analyze response");
        Self::decode(response).await
    }

    async fn recommend(&self, text: &str) -> Result<RecommendResponse, ClientError> {
        let url = self.endpoint("recommend")?;
        info!(chars = text.chars().count(), "POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&RecommendRequest { text })
            .send()
            .await?;
        debug!(status = %response.status(), "recommend response");
        Self::decode(response).await
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.endpoint("health")?;
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }
}
