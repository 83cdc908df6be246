// src/backend/http.rs

use async_trait::async_trait;
use reqwest::{Client, Response, header};
use serde::{Deserialize, Serialize};

use crate::backend::{ResultsBackend, ResultsResponse};
use crate::config::AppConfig;
use crate::errors::{ExtractError, Result};
use crate::export::{ExportPayload, ReportFormat};
use crate::models::QueryRequest;

/// Talks to the results backend over HTTP/JSON. Every endpoint hangs off the
/// same configured base URL.
pub struct HttpBackend {
    client: Client,
    api_base: String,
}

#[derive(Serialize)]
struct ResultsRequest<'a> {
    start_roll: &'a str,
    end_roll: &'a str,
}

/// Error document the backend sends with 4xx/5xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

impl HttpBackend {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

/// Turns a non-2xx response into `ExtractError::Rejected`, keeping the
/// backend's own message when it sent one.
async fn reject(resp: Response) -> ExtractError {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error body".to_string());

    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { error, details: Some(details) }) => format!("{error} ({details})"),
        Ok(ErrorBody { error, details: None }) => error,
        Err(_) => body,
    };

    ExtractError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl ResultsBackend for HttpBackend {
    async fn fetch_results(&self, query: &QueryRequest) -> Result<ResultsResponse> {
        let url = self.url("/api/results");
        let body = ResultsRequest {
            start_roll: query.start_roll(),
            end_roll: query.end_roll(),
        };

        let resp = self.client.post(&url).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(reject(resp).await);
        }

        Ok(resp.json::<ResultsResponse>().await?)
    }

    async fn download_report(
        &self,
        format: ReportFormat,
        payload: &ExportPayload,
    ) -> Result<Vec<u8>> {
        let url = self.url(format.endpoint());
        let resp = self
            .client
            .post(&url)
            .header(header::ACCEPT, format.mime_type())
            .json(payload)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(reject(resp).await);
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
