use crate::{Client, Credential, Error};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(5);

impl Client {
    /// Exchanges a short-lived user token from the Facebook login dialog for a long-lived
    /// one.
    ///
    /// Fails with [`Error::MissingCredentials`] before touching the network if any argument is
    /// empty.
    #[tracing::instrument(skip(self, app_secret, temp_token))]
    pub async fn exchange_token(
        &self,
        app_id: &str,
        app_secret: &str,
        temp_token: &str,
    ) -> Result<String, Error> {
        if app_id.is_empty() || app_secret.is_empty() {
            return Err(Error::MissingCredentials(Credential::App));
        }
        if temp_token.is_empty() {
            return Err(Error::MissingCredentials(Credential::TemporaryToken));
        }

        let response = self
            .get("oauth/access_token")
            .query(&[
                ("grant_type", "fb_exchange_token"),
                ("client_id", app_id),
                ("client_secret", app_secret),
                ("fb_exchange_token", temp_token),
            ])
            .timeout(EXCHANGE_TIMEOUT)
            .send()
            .await
            .map_err(|err| Error::TokenExchangeTransport(err.without_url()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::TokenExchangeResponse(format!("status {}", status)));
        }
        let body = response
            .text()
            .await
            .map_err(|err| Error::TokenExchangeResponse(err.without_url().to_string()))?;

        let token = extended_token(&body)?;
        tracing::info!("obtained extended user token");
        Ok(token)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Pulls the long-lived token out of an exchange response.
///
/// The classic response is a form-encoded body whose first value is the token
/// (`access_token=...&expires_in=...`). Newer API versions answer with a JSON object instead.
fn extended_token(body: &str) -> Result<String, Error> {
    let body = body.trim();
    let token = if body.starts_with('{') {
        serde_json::from_str::<TokenResponse>(body)
            .map(|response| response.access_token)
            .map_err(|err| Error::TokenExchangeResponse(err.to_string()))?
    } else {
        url::form_urlencoded::parse(body.as_bytes())
            .next()
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default()
    };

    if token.is_empty() {
        Err(Error::TokenExchangeResponse("no token in response".into()))
    } else {
        Ok(token)
    }
}
