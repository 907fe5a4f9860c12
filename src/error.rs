use derive_more::Display;
use reqwest::StatusCode;

/// A credential an operation could not proceed without.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Credential {
    /// The Facebook application ID or secret.
    #[display(fmt = "app ID and app secret")]
    App,
    /// The destination page ID or its page token.
    #[display(fmt = "page ID and page token")]
    Page,
    /// The short-lived token from the Facebook login dialog.
    #[display(fmt = "temporary user token")]
    TemporaryToken,
    /// The long-lived user token.
    #[display(fmt = "extended user token")]
    ExtendedToken,
}

/// Errors that might occur when using the library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The stored configuration could not be read or decoded.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The configuration could not be written back to its store.
    #[error("failed to persist configuration: {0}")]
    ConfigPersist(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A credential required for the operation is empty.
    #[error("missing credentials: {0}")]
    MissingCredentials(Credential),

    /// A photo tag could not be parsed as a numeric user ID.
    #[error("invalid tag {tag:?}: {source}")]
    InvalidTag {
        /// The offending tag.
        tag: String,
        /// Why it failed to parse.
        source: std::num::ParseIntError,
    },

    /// The request URL could not be assembled.
    #[error("malformed request url: {0}")]
    RequestConstruction(#[from] url::ParseError),

    /// A network-level failure while posting.
    #[error("request error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body was not a JSON object.
    #[error("failed to decode response: {0}")]
    ResponseDecode(#[source] serde_json::Error),

    /// Facebook answered with an `error` payload.
    #[error("error from Facebook API: {0}")]
    PlatformApi(String),

    /// A network-level failure while exchanging a token.
    #[error("token exchange request error: {0}")]
    TokenExchangeTransport(#[source] reqwest::Error),

    /// The token exchange endpoint answered with a failure status or an unusable body.
    #[error("bad token exchange response: {0}")]
    TokenExchangeResponse(String),
}

impl Error {
    /// The HTTP status a caller should report for this error: 400 for credential and
    /// validation problems, 500 for everything else.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingCredentials(_) | Error::InvalidTag { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// A message suitable for showing to an administrator.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::MissingCredentials(Credential::App) => {
                "Configuration must have both Facebook App ID and Secret."
            }
            Error::MissingCredentials(Credential::Page) => {
                "Choose which Facebook Page to schedule posts on, then save."
            }
            Error::MissingCredentials(Credential::TemporaryToken) => {
                "Log in with Facebook to connect an account."
            }
            Error::MissingCredentials(Credential::ExtendedToken) => {
                "No Facebook account is connected. Log in with Facebook, then save."
            }
            Error::InvalidTag { .. } => "Photo tags must be numeric Facebook user IDs.",
            Error::RequestConstruction(_) => "Failed to make request object. Please try again.",
            Error::TokenExchangeTransport(_) => {
                "Failed to get extended token from Facebook. Make sure your App ID and Secret are correct."
            }
            Error::PlatformApi(_) => "Facebook rejected the request. Please try again later.",
            _ => "Internal server error.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Credential, Error};
    use reqwest::StatusCode;

    #[test]
    fn credential_errors_are_bad_requests() {
        let err = Error::MissingCredentials(Credential::App);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.user_message(),
            "Configuration must have both Facebook App ID and Secret."
        );

        let err = Error::InvalidTag {
            tag: "abc".into(),
            source: "abc".parse::<i64>().unwrap_err(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn messages_name_the_missing_credential() {
        let messages = [
            Credential::App,
            Credential::Page,
            Credential::TemporaryToken,
            Credential::ExtendedToken,
        ]
        .map(|credential| {
            let err = Error::MissingCredentials(credential);
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            err.user_message()
        });
        for (i, message) in messages.iter().enumerate() {
            assert!(!messages[i + 1..].contains(message), "{}", message);
        }
        assert_eq!(
            Error::MissingCredentials(Credential::Page).to_string(),
            "missing credentials: page ID and page token"
        );
    }

    #[test]
    fn remote_errors_are_server_errors() {
        let err = Error::PlatformApi("boom".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "error from Facebook API: boom");

        let err = Error::TokenExchangeResponse("status 400".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(
            err.user_message(),
            Error::MissingCredentials(Credential::App).user_message()
        );
    }
}
