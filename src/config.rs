use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::path::PathBuf;
use std::sync::RwLock;

/// Credentials and destination page for scheduled posts.
///
/// Serialized with the same keys the admin form uses (`facebook_app_id`, ...). Keys missing
/// from a stored document decode as empty strings.
#[derive(Clone, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Configuration {
    /// Facebook application ID.
    #[serde(rename = "facebook_app_id")]
    pub app_id: String,
    /// Facebook application secret.
    #[serde(rename = "facebook_app_secret")]
    pub app_secret: String,
    /// Long-lived user token obtained through [`Client::exchange_token`][crate::Client::exchange_token].
    #[serde(rename = "facebook_extended_user_token")]
    pub extended_user_token: String,
    /// Access token scoped to the destination page.
    #[serde(rename = "facebook_page_auth_token")]
    pub page_auth_token: String,
    /// ID of the destination page.
    #[serde(rename = "facebook_page_id")]
    pub page_id: String,
    /// Display name of the destination page.
    #[serde(rename = "facebook_page_name")]
    pub page_name: String,
}

impl Configuration {
    /// Returns true if both the application ID and secret are set.
    #[must_use]
    pub fn has_app_credentials(&self) -> bool {
        !self.app_id.is_empty() && !self.app_secret.is_empty()
    }

    /// Returns true if a destination page and its token are set.
    #[must_use]
    pub fn has_page(&self) -> bool {
        !self.page_id.is_empty() && !self.page_auth_token.is_empty()
    }

    /// Makes `page` the destination for scheduled posts.
    pub fn select_page(&mut self, page: &PageAccount) {
        self.page_id.clone_from(&page.id);
        self.page_name.clone_from(&page.name);
        self.page_auth_token.clone_from(&page.access_token);
    }

    /// Forgets the connected user and page, keeping the application credentials.
    pub fn reset_connection(&mut self) {
        self.extended_user_token.clear();
        self.page_auth_token.clear();
        self.page_id.clear();
        self.page_name.clear();
    }
}

impl Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("app_id", &self.app_id)
            .field("app_secret", &redacted(&self.app_secret))
            .field("extended_user_token", &redacted(&self.extended_user_token))
            .field("page_auth_token", &redacted(&self.page_auth_token))
            .field("page_id", &self.page_id)
            .field("page_name", &self.page_name)
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "<redacted>"
    }
}

/// What the admin surface submits when saving the configuration.
///
/// The temporary user token is only ever carried here; it is exchanged for a long-lived one
/// by [`Scheduler::save_configuration`][crate::Scheduler::save_configuration] and never
/// persisted.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigurationSubmission {
    /// The configuration as edited.
    #[serde(flatten)]
    pub configuration: Configuration,
    /// Short-lived token from the Facebook login dialog, if the user just logged in.
    #[serde(rename = "facebook_user_access_token")]
    pub user_access_token: Option<String>,
}

impl Debug for ConfigurationSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationSubmission")
            .field("configuration", &self.configuration)
            .field(
                "user_access_token",
                &self.user_access_token.as_deref().map(redacted),
            )
            .finish()
    }
}

/// A page the logged-in user manages, as listed by
/// [`Client::page_accounts`][crate::Client::page_accounts].
#[derive(Clone, Deserialize, Eq, PartialEq)]
pub struct PageAccount {
    /// Page ID.
    pub id: String,
    /// Page display name.
    pub name: String,
    /// Access token scoped to this page.
    pub access_token: String,
}

impl Debug for PageAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageAccount")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("access_token", &redacted(&self.access_token))
            .finish()
    }
}

/// Where the configuration lives. Loaded fresh on every operation.
pub trait ConfigStore: Send + Sync {
    /// Reads the current configuration.
    fn load(&self) -> Result<Configuration, Error>;

    /// Replaces the stored configuration.
    fn persist(&self, configuration: &Configuration) -> Result<(), Error>;
}

/// Stores the configuration as a JSON document on disk.
///
/// A missing file loads as an empty configuration.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> JsonFileStore {
        JsonFileStore { path: path.into() }
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Configuration, Error> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Configuration::default())
            }
            Err(err) => return Err(Error::ConfigLoad(err.into())),
        };
        serde_json::from_slice(&data).map_err(|err| Error::ConfigLoad(err.into()))
    }

    fn persist(&self, configuration: &Configuration) -> Result<(), Error> {
        let data = serde_json::to_vec_pretty(configuration)
            .map_err(|err| Error::ConfigPersist(err.into()))?;
        std::fs::write(&self.path, data).map_err(|err| Error::ConfigPersist(err.into()))
    }
}

/// Keeps the configuration in memory.
#[derive(Debug, Default)]
pub struct MemoryStore(RwLock<Configuration>);

impl MemoryStore {
    /// Creates a store holding `configuration`.
    #[must_use]
    pub fn new(configuration: Configuration) -> MemoryStore {
        MemoryStore(RwLock::new(configuration))
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Configuration, Error> {
        self.0
            .read()
            .map(|configuration| configuration.clone())
            .map_err(|err| Error::ConfigLoad(err.to_string().into()))
    }

    fn persist(&self, configuration: &Configuration) -> Result<(), Error> {
        let mut guard = self
            .0
            .write()
            .map_err(|err| Error::ConfigPersist(err.to_string().into()))?;
        *guard = configuration.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigStore, Configuration, ConfigurationSubmission, JsonFileStore, PageAccount};
    use crate::Error;
    use serde_json::json;

    #[test]
    fn decodes_stored_document() {
        let configuration: Configuration = serde_json::from_value(json!({
            "facebook_app_id": "123",
            "facebook_app_secret": "shh",
            "facebook_page_id": "P1",
            "facebook_page_auth_token": "TOK",
        }))
        .unwrap();
        assert_eq!(configuration.app_id, "123");
        assert_eq!(configuration.page_auth_token, "TOK");
        assert!(configuration.extended_user_token.is_empty());
        assert!(configuration.has_app_credentials());
        assert!(configuration.has_page());
    }

    #[test]
    fn debug_hides_secrets() {
        let configuration = Configuration {
            app_id: "123".into(),
            app_secret: "hunter2".into(),
            page_auth_token: "TOK".into(),
            ..Default::default()
        };
        let debug = format!("{:?}", configuration);
        assert!(debug.contains("123"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("TOK"));
    }

    #[test]
    fn submission_carries_temporary_token() {
        let submission: ConfigurationSubmission = serde_json::from_value(json!({
            "facebook_app_id": "123",
            "facebook_app_secret": "shh",
            "facebook_user_access_token": "TMP",
        }))
        .unwrap();
        assert_eq!(submission.configuration.app_id, "123");
        assert_eq!(submission.user_access_token.as_deref(), Some("TMP"));
        assert!(!format!("{:?}", submission).contains("TMP"));
    }

    #[test]
    fn select_and_reset_page() {
        let mut configuration = Configuration {
            app_id: "123".into(),
            app_secret: "shh".into(),
            extended_user_token: "EXT".into(),
            ..Default::default()
        };
        configuration.select_page(&PageAccount {
            id: "P1".into(),
            name: "My Page".into(),
            access_token: "TOK".into(),
        });
        assert!(configuration.has_page());
        assert_eq!(configuration.page_name, "My Page");

        configuration.reset_connection();
        assert!(!configuration.has_page());
        assert!(configuration.extended_user_token.is_empty());
        assert!(configuration.has_app_credentials());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("fbscheduler.json"));
        assert_eq!(store.load().unwrap(), Configuration::default());

        let configuration = Configuration {
            page_id: "P1".into(),
            page_auth_token: "TOK".into(),
            ..Default::default()
        };
        store.persist(&configuration).unwrap();
        assert_eq!(store.load().unwrap(), configuration);
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fbscheduler.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStore::new(path).load(),
            Err(Error::ConfigLoad(_))
        ));
    }
}
