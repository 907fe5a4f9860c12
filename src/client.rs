use crate::{Credential, Error, PageAccount};
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Graph API version used for every versioned endpoint.
pub(crate) const API_VERSION: &str = "v2.8";

const GRAPH_URL: &str = "https://graph.facebook.com";
const VIDEO_URL: &str = "https://graph-video.facebook.com";

macro_rules! request_impl {
    ($($f:ident),* $(,)*) => {
        $(
            #[inline]
            pub(crate) fn $f(&self, path: &str) -> RequestBuilder {
                tracing::info!(path, concat!("Client::", stringify!($f)));
                self.client.$f(format!("{}/{}", self.graph_url, path))
            }
        )*
    };
}

/// HTTP client for the Facebook Graph API.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) graph_url: Cow<'static, str>,
    pub(crate) video_url: Cow<'static, str>,
    pub(crate) client: reqwest::Client,
}

impl Client {
    /// Creates a new `Client` talking to `https://graph.facebook.com`, with video uploads
    /// going to `https://graph-video.facebook.com`. Use [`Client::with_graph_url`] and
    /// [`Client::with_video_url`] to change them.
    #[must_use]
    #[allow(clippy::missing_panics_doc)] // tested to not panic
    pub fn new() -> Client {
        const USER_AGENT: &str = concat!("fbscheduler/", env!("CARGO_PKG_VERSION"));

        Client {
            graph_url: Cow::Borrowed(GRAPH_URL),
            video_url: Cow::Borrowed(VIDEO_URL),
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap(),
        }
    }

    /// Creates a new `Client` with a custom Graph API host.
    #[must_use]
    pub fn with_graph_url(mut self, graph_url: String) -> Client {
        self.graph_url = Cow::Owned(trim_host(graph_url));
        self
    }

    /// Creates a new `Client` with a custom video upload host.
    #[must_use]
    pub fn with_video_url(mut self, video_url: String) -> Client {
        self.video_url = Cow::Owned(trim_host(video_url));
        self
    }

    /// Lists the pages the owner of `user_token` manages, along with their page tokens.
    #[tracing::instrument(skip(self, user_token))]
    pub async fn page_accounts(&self, user_token: &str) -> Result<Vec<PageAccount>, Error> {
        if user_token.is_empty() {
            return Err(Error::MissingCredentials(Credential::ExtendedToken));
        }

        let response = self
            .get(&format!("{}/me/accounts", API_VERSION))
            .query(&[("access_token", user_token)])
            .send()
            .await
            .map_err(|err| Error::Transport(err.without_url()))?;
        let AccountsResponse { data } =
            serde_json::from_value(Value::Object(read_graph_response(response).await?))
                .map_err(Error::ResponseDecode)?;
        tracing::info!(pages = data.len(), "listed pages");
        Ok(data)
    }

    request_impl!(get);
}

impl Default for Client {
    fn default() -> Client {
        Client::new()
    }
}

fn trim_host(mut host: String) -> String {
    while host.ends_with('/') {
        host.pop();
    }
    host
}

/// Decodes a Graph API response body, turning an `error` member into
/// [`Error::PlatformApi`] whatever the status code.
pub(crate) async fn read_graph_response(response: Response) -> Result<Map<String, Value>, Error> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| Error::Transport(err.without_url()))?;
    let map: Map<String, Value> = serde_json::from_slice(&body).map_err(Error::ResponseDecode)?;
    match map.get("error") {
        Some(error) if !error.is_null() => {
            tracing::warn!(%status, %error, "Facebook API error");
            Err(Error::PlatformApi(error.to_string()))
        }
        _ => Ok(map),
    }
}

#[derive(Deserialize)]
struct AccountsResponse {
    #[serde(default)]
    data: Vec<PageAccount>,
}

#[cfg(test)]
mod tests {
    use super::Client;
    use crate::{Credential, Error, PageAccount};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn client_new_doesnt_panic() {
        drop(Client::new());
    }

    #[test]
    fn custom_hosts_lose_trailing_slash() {
        let client = Client::new()
            .with_graph_url("http://localhost:1234/".into())
            .with_video_url("http://localhost:5678//".into());
        assert_eq!(client.graph_url, "http://localhost:1234");
        assert_eq!(client.video_url, "http://localhost:5678");
    }

    #[tokio::test]
    async fn lists_page_accounts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.8/me/accounts"))
            .and(query_param("access_token", "EXT"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":[{"id":"P1","name":"My Page","access_token":"TOK","category":"Blog"}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let pages = Client::new()
            .with_graph_url(server.uri())
            .page_accounts("EXT")
            .await
            .unwrap();
        assert_eq!(
            pages,
            vec![PageAccount {
                id: "P1".into(),
                name: "My Page".into(),
                access_token: "TOK".into(),
            }]
        );
    }

    #[tokio::test]
    async fn page_accounts_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"error":{"message":"Invalid OAuth access token.","code":190}}"#,
            ))
            .mount(&server)
            .await;

        let err = Client::new()
            .with_graph_url(server.uri())
            .page_accounts("EXT")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PlatformApi(message) if message.contains("190")));
    }

    #[tokio::test]
    async fn page_accounts_requires_token() {
        assert!(matches!(
            Client::new().page_accounts("").await,
            Err(Error::MissingCredentials(Credential::ExtendedToken))
        ));
    }
}
