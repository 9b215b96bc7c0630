use async_trait::async_trait;
use reqwest::Response;
use tracing::{debug, warn};

use super::error::ApiError;
use super::{ApplicationSink, InstitutionDirectory};
use crate::config::ApiConfig;
use crate::model::{DonorSignup, Institution, StudentApplication};

const SEARCH_PATH: &str = "/api/universities/search";
const STUDENTS_PATH: &str = "/api/students";
const DONORS_PATH: &str = "/api/donors";

/// `reqwest`-backed client for the platform API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client for the configured origin.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("medici/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the origin requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<T: serde::Serialize + Sync>(
        &self,
        path: &'static str,
        body: &T,
    ) -> Result<(), ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        check_status(path, response).map(drop)
    }
}

fn check_status(endpoint: &'static str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!(endpoint, status = status.as_u16(), "API call failed");
        Err(ApiError::Status {
            endpoint,
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl InstitutionDirectory for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<Institution>, ApiError> {
        debug!(query, "searching institutions");
        let response = self
            .client
            .get(self.url(SEARCH_PATH))
            .query(&[("query", query)])
            .send()
            .await?;
        let institutions = check_status(SEARCH_PATH, response)?.json().await?;
        Ok(institutions)
    }
}

#[async_trait]
impl ApplicationSink for ApiClient {
    async fn submit_application(&self, application: &StudentApplication) -> Result<(), ApiError> {
        self.post_json(STUDENTS_PATH, application).await
    }

    async fn join_waitlist(&self, signup: &DonorSignup) -> Result<(), ApiError> {
        self.post_json(DONORS_PATH, signup).await
    }
}
