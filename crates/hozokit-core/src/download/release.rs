//! Latest-release lookup against a GitHub-style releases API

use super::http_client;
use crate::error::{Result, ScaffoldError};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Release resolved from the metadata endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub name: String,
    pub zipball_url: Url,
}

/// Resolves the latest release of the starter kit
#[derive(Debug, Clone)]
pub struct ReleaseResolver {
    client: reqwest::Client,
}

impl ReleaseResolver {
    pub fn new(user_agent: &str) -> Self {
        Self::with_client(http_client(user_agent))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch release metadata from `api_url`
    pub async fn resolve_latest(&self, api_url: &str) -> Result<ReleaseInfo> {
        debug!(api_url, "looking up latest release");

        let response = self
            .client
            .get(api_url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| ScaffoldError::Transport {
                url: api_url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(ScaffoldError::Api {
                url: api_url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ScaffoldError::Transport {
                url: api_url.to_string(),
                source,
            })?;

        let release = parse_release(&body).map_err(|e| match e {
            ParseFailure::Json(source) => ScaffoldError::Parse {
                url: api_url.to_string(),
                source,
            },
            ParseFailure::Other(err) => err,
        })?;

        debug!(name = %release.name, zipball = %release.zipball_url, "resolved release");
        Ok(release)
    }
}

enum ParseFailure {
    Json(serde_json::Error),
    Other(ScaffoldError),
}

fn parse_release(body: &str) -> std::result::Result<ReleaseInfo, ParseFailure> {
    let json: Value = serde_json::from_str(body).map_err(ParseFailure::Json)?;

    let name = string_field(&json, "name").map_err(ParseFailure::Other)?;
    let zipball = string_field(&json, "zipball_url").map_err(ParseFailure::Other)?;
    let zipball_url = Url::parse(&zipball).map_err(|source| {
        ParseFailure::Other(ScaffoldError::InvalidUrl {
            value: zipball.clone(),
            source,
        })
    })?;

    Ok(ReleaseInfo { name, zipball_url })
}

fn string_field(json: &Value, field: &'static str) -> Result<String> {
    json.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ScaffoldError::MissingField { field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UA: &str = "Hozokit Generator test";

    async fn server_with(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .and(header("user-agent", UA))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_resolves_name_and_zipball() {
        let server = server_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "v1.2.0 Fern",
            "tag_name": "v1.2.0",
            "zipball_url": "https://api.github.com/repos/csalmeida/hozokit/zipball/v1.2.0"
        })))
        .await;

        let release = ReleaseResolver::new(UA)
            .resolve_latest(&format!("{}/releases/latest", server.uri()))
            .await
            .unwrap();

        assert_eq!(release.name, "v1.2.0 Fern");
        assert_eq!(release.zipball_url.path(), "/repos/csalmeida/hozokit/zipball/v1.2.0");
    }

    #[tokio::test]
    async fn test_non_success_is_api_error() {
        let server = server_with(ResponseTemplate::new(403)).await;

        let result = ReleaseResolver::new(UA)
            .resolve_latest(&format!("{}/releases/latest", server.uri()))
            .await;

        assert!(matches!(result, Err(ScaffoldError::Api { status: 403, .. })));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = server_with(ResponseTemplate::new(200).set_body_string("<html>")).await;

        let result = ReleaseResolver::new(UA)
            .resolve_latest(&format!("{}/releases/latest", server.uri()))
            .await;

        assert!(matches!(result, Err(ScaffoldError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_missing_zipball_is_missing_field_error() {
        let server = server_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "v1.2.0" })),
        )
        .await;

        let result = ReleaseResolver::new(UA)
            .resolve_latest(&format!("{}/releases/latest", server.uri()))
            .await;

        assert!(matches!(
            result,
            Err(ScaffoldError::MissingField { field: "zipball_url" })
        ));
    }

    #[test]
    fn test_non_string_name_is_missing_field() {
        let result = parse_release(r#"{"name": 12, "zipball_url": "https://example.test/z"}"#);
        assert!(matches!(
            result,
            Err(ParseFailure::Other(ScaffoldError::MissingField { field: "name" }))
        ));
    }

    #[test]
    fn test_unparsable_zipball_is_invalid_url() {
        let result = parse_release(r#"{"name": "v1", "zipball_url": "not a url"}"#);
        assert!(matches!(
            result,
            Err(ParseFailure::Other(ScaffoldError::InvalidUrl { .. }))
        ));
    }
}
