use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use tracing::{debug, instrument};

use super::{ApiError, ApiResult, WorklogApi};
use crate::config::{AuthType, Config};
use crate::error::{ConfigError, ConfigResult};

const API_PREFIX: &str = "rest/api/2";

/// Connection settings for [`JiraClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL without a trailing slash.
    pub server: String,
    /// Login for basic auth.
    pub login: Option<String>,
    /// API token or personal access token.
    pub api_token: String,
    /// Auth scheme.
    pub auth_type: AuthType,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Log request payloads and response bodies.
    pub debug: bool,
}

impl ClientConfig {
    /// Derive client settings from loaded configuration.
    ///
    /// # Errors
    ///
    /// Fails when the server or token is missing, or when basic auth is
    /// selected without a login.
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        let server = config.server_url()?.to_string();
        let api_token = config
            .api_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingSetting {
                key: "api_token",
                hint: "export JIRA_API_TOKEN",
            })?;
        let login = config.login.clone().filter(|l| !l.is_empty());
        if config.auth_type == AuthType::Basic && login.is_none() {
            return Err(ConfigError::MissingSetting {
                key: "login",
                hint: "set `login` in config or JIRA_LOGIN, or use auth_type = \"bearer\"",
            });
        }

        Ok(Self {
            server,
            login,
            api_token,
            auth_type: config.auth_type,
            timeout: Duration::from_secs(config.timeout_secs),
            debug: false,
        })
    }

    /// Enable verbose request/response logging.
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Blocking client for the Jira v2 REST API.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: HttpClient,
    config: ClientConfig,
}

impl JiraClient {
    /// Build a client.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("jira-cli/", env!("CARGO_PKG_VERSION"))),
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Other(err.to_string()))?;

        Ok(Self { http, config })
    }

    /// Connection settings in use.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{API_PREFIX}/{}",
            self.config.server,
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.auth_type {
            AuthType::Basic => request.basic_auth(
                self.config.login.as_deref().unwrap_or_default(),
                Some(&self.config.api_token),
            ),
            AuthType::Bearer => request.bearer_auth(&self.config.api_token),
        }
    }

    fn post_expect_success<B>(&self, path: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path);
        if self.config.debug {
            debug!(
                method = "POST",
                %url,
                payload = %serde_json::to_string(body).unwrap_or_default(),
                "sending request"
            );
        } else {
            debug!(method = "POST", %url, "sending request");
        }

        let response = self.authorize(self.http.post(&url)).json(body).send()?;
        self.ensure_success(response)
    }

    fn ensure_success(&self, response: Response) -> ApiResult<()> {
        let status = response.status();
        debug!(status = status.as_u16(), "received response");
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        if self.config.debug {
            debug!(%body, "error response body");
        }
        Err(ApiError::from_response(status, body))
    }
}

impl WorklogApi for JiraClient {
    #[instrument(skip(self, comment), fields(server = %self.config.server))]
    fn add_issue_worklog(
        &self,
        issue_key: &str,
        comment: &str,
        started: &str,
        time_spent: &str,
    ) -> ApiResult<()> {
        let path = format!("issue/{issue_key}/worklog");
        let payload = WorklogCreateRequest {
            comment,
            started,
            time_spent,
        };
        self.post_expect_success(&path, &payload)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorklogCreateRequest<'a> {
    comment: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    started: &'a str,
    time_spent: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server, auth_type: AuthType) -> JiraClient {
        JiraClient::new(ClientConfig {
            server: server.url(),
            login: Some("me@example.com".to_string()),
            api_token: "secret".to_string(),
            auth_type,
            timeout: Duration::from_secs(5),
            debug: true,
        })
        .unwrap()
    }

    #[test]
    fn add_worklog_posts_json_payload() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/rest/api/2/issue/PROJ-1/worklog")
            .match_header("authorization", Matcher::Regex("^Basic ".to_string()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "comment": "Did work",
                "started": "2023-01-01T09:00:00.000+0100",
                "timeSpent": "2h",
            })))
            .with_status(201)
            .with_body(r#"{"id":"10000"}"#)
            .create();

        client_for(&server, AuthType::Basic)
            .add_issue_worklog("PROJ-1", "Did work", "2023-01-01T09:00:00.000+0100", "2h")
            .unwrap();

        mock.assert();
    }

    #[test]
    fn bearer_auth_sends_token() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/rest/api/2/issue/PROJ-2/worklog")
            .match_header("authorization", "Bearer secret")
            .with_status(201)
            .create();

        client_for(&server, AuthType::Bearer)
            .add_issue_worklog("PROJ-2", "x", "2023-01-01T09:00:00.000+0000", "1h")
            .unwrap();

        mock.assert();
    }

    #[test]
    fn empty_started_is_omitted() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/rest/api/2/issue/PROJ-3/worklog")
            .match_body(Matcher::Json(json!({"comment": "c", "timeSpent": "5m"})))
            .with_status(201)
            .create();

        client_for(&server, AuthType::Basic)
            .add_issue_worklog("PROJ-3", "c", "", "5m")
            .unwrap();

        mock.assert();
    }

    #[test]
    fn rejected_worklog_surfaces_server_message() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/rest/api/2/issue/PROJ-1/worklog")
            .with_status(400)
            .with_body(r#"{"errorMessages":[],"errors":{"timeLogged":"Invalid time duration entered."}}"#)
            .create();

        let err = client_for(&server, AuthType::Basic)
            .add_issue_worklog("PROJ-1", "c", "2023-01-01T09:00:00.000+0000", "soon")
            .unwrap_err();

        assert!(matches!(err, ApiError::Http { status, .. } if status.as_u16() == 400));
        assert!(err.to_string().contains("Invalid time duration entered."));
    }

    #[test]
    fn unauthorized_is_authentication_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/rest/api/2/issue/PROJ-1/worklog")
            .with_status(401)
            .create();

        let err = client_for(&server, AuthType::Basic)
            .add_issue_worklog("PROJ-1", "c", "", "1h")
            .unwrap_err();

        assert!(matches!(err, ApiError::Authentication { .. }));
    }

    #[test]
    fn unreachable_server_is_network_error() {
        let client = JiraClient::new(ClientConfig {
            server: "http://127.0.0.1:9".to_string(),
            login: Some("me".to_string()),
            api_token: "t".to_string(),
            auth_type: AuthType::Basic,
            timeout: Duration::from_secs(5),
            debug: false,
        })
        .unwrap();

        let err = client.add_issue_worklog("PROJ-1", "c", "", "1h").unwrap_err();

        assert!(matches!(err, ApiError::Network(_) | ApiError::Other(_)));
    }

    #[test]
    fn client_config_requires_token() {
        let config = Config {
            server: Some("https://jira.example.com".to_string()),
            login: Some("me".to_string()),
            ..Config::default()
        };
        let err = ClientConfig::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting { key: "api_token", .. }));
    }

    #[test]
    fn client_config_basic_requires_login() {
        let config = Config {
            server: Some("https://jira.example.com".to_string()),
            api_token: Some("t".to_string()),
            ..Config::default()
        };
        let err = ClientConfig::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting { key: "login", .. }));
    }

    #[test]
    fn client_config_bearer_needs_no_login() {
        let config = Config {
            server: Some("https://jira.example.com/".to_string()),
            api_token: Some("t".to_string()),
            auth_type: AuthType::Bearer,
            timeout_secs: 7,
            ..Config::default()
        };
        let cc = ClientConfig::from_config(&config).unwrap().with_debug(true);
        assert_eq!(cc.server, "https://jira.example.com");
        assert_eq!(cc.timeout, Duration::from_secs(7));
        assert!(cc.debug);
    }
}
