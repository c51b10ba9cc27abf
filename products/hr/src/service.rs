use entity::SalaryEntry;
use tracing::{debug, info, instrument, warn};

use crate::{api::RosterApi, error::ClientResult, publisher::Publisher};

/// Client-side source of truth for the roster.
///
/// Both collections are only ever replaced wholesale with what the backend
/// returned; nothing is patched locally.
pub struct DataService<A> {
    api: A,
    names: Publisher<Vec<String>>,
    entries: Publisher<Vec<SalaryEntry>>,
}

impl<A: RosterApi> DataService<A> {
    /// Build the service and load the initial snapshot.
    ///
    /// A failed load is logged and otherwise ignored: both streams keep their
    /// empty initial values until a later write succeeds.
    pub async fn new(api: A) -> Self {
        let service = Self {
            api,
            names: Publisher::default(),
            entries: Publisher::default(),
        };
        service.initialize().await;
        service
    }

    #[instrument(name = "roster.initialize", skip_all)]
    async fn initialize(&self) {
        match self.api.fetch_snapshot().await {
            Ok(snapshot) => {
                info!(
                    names = snapshot.names.len(),
                    entries = snapshot.entries.len(),
                    "roster snapshot loaded"
                );
                self.names.publish(snapshot.names);
                self.entries.publish(snapshot.entries);
            }
            Err(err) => warn!(error = %err, "initial roster load failed"),
        }
    }

    /// `names$`
    pub fn names(&self) -> Publisher<Vec<String>> {
        self.names.clone()
    }

    /// `entries$`
    pub fn entries(&self) -> Publisher<Vec<SalaryEntry>> {
        self.entries.clone()
    }

    /// Send `name` as is; callers own trimming and emptiness checks.
    #[instrument(name = "roster.add_name", skip(self))]
    pub async fn add_name(&self, name: &str) -> ClientResult<Vec<String>> {
        let names = self.api.add_name(name).await.inspect_err(|err| {
            debug!(error = %err, "add name failed; names left untouched");
        })?;
        self.names.publish(names.clone());
        Ok(names)
    }

    #[instrument(name = "roster.save_entry", skip_all, fields(name = %entry.name, year = entry.year))]
    pub async fn save_entry(&self, entry: &SalaryEntry) -> ClientResult<Vec<SalaryEntry>> {
        let entries = self.api.save_entry(entry).await.inspect_err(|err| {
            debug!(error = %err, "save entry failed; entries left untouched");
        })?;
        self.entries.publish(entries.clone());
        Ok(entries)
    }

    #[cfg(test)]
    pub(crate) fn api(&self) -> &A {
        &self.api
    }
}
