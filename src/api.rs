use reqwest::Client;
use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};

#[derive(Serialize)]
struct RecommendRequest<'a> {
    preference: &'a str,
}

/// Weather summary returned alongside recommendations. All fields are
/// opaque backend-formatted strings; the client does no validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherInfo {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub temp: String,
    #[serde(default)]
    pub humidity: Option<String>,
    #[serde(default)]
    pub alert: Option<String>,
}

/// One recommended trail. The backend returns either a plain-text
/// description (AI fallback output) or a structured record; a
/// `description` field always wins, even if structured fields are
/// present on the same item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Trail {
    Freeform {
        description: String,
    },
    Structured {
        name: String,
        #[serde(default)]
        difficulty: Option<String>,
        #[serde(default)]
        length: Option<f64>,
        #[serde(default)]
        station: Option<String>,
        #[serde(default)]
        distance: Option<f64>,
        #[serde(default)]
        website: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub weather: Option<WeatherInfo>,
    #[serde(default)]
    pub recommendations: Vec<Trail>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Lightweight readiness probe. Ok iff the backend answered 2xx.
    pub async fn ready(&self) -> Result<()> {
        let url = format!("{}/api/ready", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("Server responded with {}", response.status().as_u16()));
        }

        Ok(())
    }

    pub async fn recommend(&self, preference: &str) -> Result<Recommendations> {
        let url = format!("{}/api/recommend", self.base_url);

        let request = RecommendRequest { preference };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Server responded with {}", response.status().as_u16()));
        }

        let recommendations: Recommendations = response.json().await?;
        Ok(recommendations)
    }
}
