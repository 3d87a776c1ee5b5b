use crate::jira::transport::{RawIssue, RawVersion, SearchPage, SearchRequest, ISSUE_FIELDS};
use crate::jira::{TrackerError, TrackerTransport};
use crate::model::TrackerSettings;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

const API_PATH: &str = "rest/api/2";

/// Jira REST v2 over HTTPS with basic authentication.
pub struct JiraRestTransport {
    base_url: String,
    username: String,
    password: String,
    client: Client,
}

impl JiraRestTransport {
    pub fn new(settings: &TrackerSettings) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        info!("Jira transport initialized (url={})", base_url);
        Ok(Self {
            base_url,
            username: settings.username.clone(),
            password: settings.password.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PATH, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        subject: &str,
    ) -> Result<T, TrackerError> {
        let response = self.authorized(request).send().await?;
        let response = check_status(response, subject).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl TrackerTransport for JiraRestTransport {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, TrackerError> {
        let builder = self.client.post(self.url("search")).json(request);
        self.send(builder, &request.jql).await
    }

    async fn issue(&self, key: &str) -> Result<RawIssue, TrackerError> {
        let builder = self
            .client
            .get(self.url(&format!("issue/{}", key)))
            .query(&[("fields", ISSUE_FIELDS.join(","))]);
        self.send(builder, key).await
    }

    async fn project_versions(&self, project: &str) -> Result<Vec<RawVersion>, TrackerError> {
        let builder = self
            .client
            .get(self.url(&format!("project/{}/versions", project)));
        self.send(builder, project).await
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ErrorBody {
    error_messages: Vec<String>,
}

async fn check_status(response: Response, subject: &str) -> Result<Response, TrackerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, subject, body))
}

fn status_error(status: StatusCode, subject: &str, body: String) -> TrackerError {
    match status {
        StatusCode::NOT_FOUND => TrackerError::NotFound(subject.to_string()),
        StatusCode::BAD_REQUEST => {
            let messages = serde_json::from_str::<ErrorBody>(&body)
                .map(|body| body.error_messages)
                .unwrap_or_default();
            TrackerError::Rejected {
                status: status.as_u16(),
                messages: if messages.is_empty() { vec![body] } else { messages },
            }
        }
        _ => TrackerError::Status {
            status: status.as_u16(),
            body,
        },
    }
}
