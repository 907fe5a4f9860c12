use crate::client::read_graph_response;
use crate::{
    Client, ConfigStore, Configuration, ConfigurationSubmission, Credential, Error, PageAccount,
    Post,
};
use std::time::Duration;

const SCHEDULE_TIMEOUT: Duration = Duration::from_secs(30);

/// Schedules posts on the page named by the configuration in a [`ConfigStore`].
///
/// The configuration is loaded again for every operation, so changes saved through one
/// `Scheduler` (or any other writer of the store) apply to the next call.
#[derive(Debug, Clone)]
pub struct Scheduler<S> {
    pub(crate) client: Client,
    store: S,
}

impl<S: ConfigStore> Scheduler<S> {
    /// Creates a `Scheduler` using a default [`Client`].
    pub fn new(store: S) -> Scheduler<S> {
        Scheduler::with_client(Client::new(), store)
    }

    /// Creates a `Scheduler` using `client` for all requests.
    pub fn with_client(client: Client, store: S) -> Scheduler<S> {
        Scheduler { client, store }
    }

    /// The configuration store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sends `post` to Facebook to be published at its scheduled time.
    #[tracing::instrument(skip(self))]
    pub async fn schedule(&self, post: Post) -> Result<(), Error> {
        let configuration = self.store.load()?;
        let request = post.to_request(&configuration)?;

        let host = if request.kind().uses_video_host() {
            &self.client.video_url
        } else {
            &self.client.graph_url
        };
        let url = request.url(host)?;
        tracing::info!(url = %request.redacted_url(host), "schedule");

        let response = self
            .client
            .client
            .post(url)
            .timeout(SCHEDULE_TIMEOUT)
            .send()
            .await
            .map_err(|err| Error::Transport(err.without_url()))?;
        let body = read_graph_response(response).await?;
        tracing::info!(id = ?body.get("id"), "scheduled");
        Ok(())
    }

    /// Validates and stores a configuration submitted by an administrator.
    ///
    /// When the submission carries a temporary user token it is exchanged for a long-lived
    /// one, which replaces the stored extended token. Without one, the extended token already
    /// in the store is kept. Returns what was persisted.
    #[tracing::instrument(skip(self, submission))]
    pub async fn save_configuration(
        &self,
        submission: ConfigurationSubmission,
    ) -> Result<Configuration, Error> {
        let ConfigurationSubmission {
            mut configuration,
            user_access_token,
        } = submission;
        if !configuration.has_app_credentials() {
            return Err(Error::MissingCredentials(Credential::App));
        }

        match user_access_token.as_deref() {
            Some(temp_token) if !temp_token.is_empty() => {
                configuration.extended_user_token = self
                    .client
                    .exchange_token(&configuration.app_id, &configuration.app_secret, temp_token)
                    .await?;
            }
            _ if configuration.extended_user_token.is_empty() => {
                configuration.extended_user_token = self.store.load()?.extended_user_token;
            }
            _ => {}
        }

        self.store.persist(&configuration)?;
        tracing::info!(page_id = %configuration.page_id, "saved configuration");
        Ok(configuration)
    }

    /// Lists the pages the connected user manages.
    #[tracing::instrument(skip(self))]
    pub async fn pages(&self) -> Result<Vec<PageAccount>, Error> {
        let configuration = self.store.load()?;
        self.client
            .page_accounts(&configuration.extended_user_token)
            .await
    }

    /// Disconnects the user and page, keeping the application credentials.
    #[tracing::instrument(skip(self))]
    pub fn reset_connection(&self) -> Result<(), Error> {
        let mut configuration = self.store.load()?;
        configuration.reset_connection();
        self.store.persist(&configuration)
    }
}
