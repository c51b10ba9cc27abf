use entity::{NewName, SalaryEntry, Snapshot};
use reqwest::{Client, Method, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult},
};

/// Transport seam between the data service and the roster backend.
#[allow(async_fn_in_trait)]
pub trait RosterApi {
    /// `GET /data`
    async fn fetch_snapshot(&self) -> ClientResult<Snapshot>;
    /// `POST /names`, yields the backend's full name list.
    async fn add_name(&self, name: &str) -> ClientResult<Vec<String>>;
    /// `POST /entries`, yields the backend's full entry list.
    async fn save_entry(&self, entry: &SalaryEntry) -> ClientResult<Vec<SalaryEntry>>;
}

/// [`RosterApi`] over plain HTTP + JSON.
#[derive(Clone, Debug)]
pub struct HttpRosterApi {
    client: Client,
    base_url: String,
}

impl HttpRosterApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_client(Client::builder().build()?, config)
    }

    pub fn with_client(client: Client, config: &ClientConfig) -> ClientResult<Self> {
        let trimmed = config.api_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|err| ClientError::InvalidUrl {
            url: config.api_url.clone(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: config.api_url.clone(),
                reason: "not a base url".into(),
            });
        }
        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(%method, %url, "roster api request");
        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.inspect_err(|err| {
            warn!(%method, %url, error = %err, "roster api unreachable");
        })?;

        let status = response.status();
        let text = response.text().await.inspect_err(|err| {
            warn!(%method, %url, %status, error = %err, "roster api response body unreadable");
        })?;
        if !status.is_success() {
            warn!(%method, %url, %status, "roster api rejected request");
            return Err(ClientError::status(status, text));
        }
        serde_json::from_str(&text).map_err(|err| {
            warn!(%method, %url, error = %err, "roster api returned malformed body");
            ClientError::Decode(err)
        })
    }
}

impl RosterApi for HttpRosterApi {
    async fn fetch_snapshot(&self) -> ClientResult<Snapshot> {
        self.send::<(), _>(Method::GET, "/data", None).await
    }

    async fn add_name(&self, name: &str) -> ClientResult<Vec<String>> {
        let body = NewName {
            name: name.to_string(),
        };
        self.send(Method::POST, "/names", Some(&body)).await
    }

    async fn save_entry(&self, entry: &SalaryEntry) -> ClientResult<Vec<SalaryEntry>> {
        self.send(Method::POST, "/entries", Some(entry)).await
    }
}
