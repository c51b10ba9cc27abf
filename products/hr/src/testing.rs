//! Scripted in-memory backend for service and form tests.

use std::{cell::RefCell, collections::VecDeque};

use entity::{SalaryEntry, Snapshot};
use reqwest::StatusCode;
use tokio::sync::oneshot;

use crate::{
    api::RosterApi,
    error::{ClientError, ClientResult},
};

enum Reply<T> {
    Ready(Option<T>),
    Deferred(oneshot::Receiver<T>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> ClientResult<T> {
        match self {
            Reply::Ready(Some(value)) => Ok(value),
            Reply::Ready(None) => Err(ClientError::status(
                StatusCode::SERVICE_UNAVAILABLE,
                "scripted failure",
            )),
            Reply::Deferred(rx) => rx
                .await
                .map_err(|_| ClientError::status(StatusCode::BAD_GATEWAY, "reply dropped")),
        }
    }
}

/// Replies are consumed in call order; an unscripted call fails.
#[derive(Default)]
pub struct ScriptedApi {
    snapshot: RefCell<Option<Snapshot>>,
    names: RefCell<VecDeque<Reply<Vec<String>>>>,
    entries: RefCell<VecDeque<Reply<Vec<SalaryEntry>>>>,
    pub name_calls: RefCell<Vec<String>>,
    pub entry_calls: RefCell<Vec<SalaryEntry>>,
}

impl ScriptedApi {
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let api = Self::default();
        *api.snapshot.borrow_mut() = Some(snapshot);
        api
    }

    pub fn names_ok(&self, names: &[&str]) -> &Self {
        let names = names.iter().map(|n| n.to_string()).collect();
        self.names.borrow_mut().push_back(Reply::Ready(Some(names)));
        self
    }

    pub fn names_fail(&self) -> &Self {
        self.names.borrow_mut().push_back(Reply::Ready(None));
        self
    }

    pub fn names_deferred(&self) -> oneshot::Sender<Vec<String>> {
        let (tx, rx) = oneshot::channel();
        self.names.borrow_mut().push_back(Reply::Deferred(rx));
        tx
    }

    pub fn entries_ok(&self, entries: Vec<SalaryEntry>) -> &Self {
        self.entries
            .borrow_mut()
            .push_back(Reply::Ready(Some(entries)));
        self
    }

    pub fn entries_fail(&self) -> &Self {
        self.entries.borrow_mut().push_back(Reply::Ready(None));
        self
    }

    pub fn entries_deferred(&self) -> oneshot::Sender<Vec<SalaryEntry>> {
        let (tx, rx) = oneshot::channel();
        self.entries.borrow_mut().push_back(Reply::Deferred(rx));
        tx
    }
}

impl RosterApi for ScriptedApi {
    async fn fetch_snapshot(&self) -> ClientResult<Snapshot> {
        let snapshot = self.snapshot.borrow_mut().take();
        Reply::Ready(snapshot).resolve().await
    }

    async fn add_name(&self, name: &str) -> ClientResult<Vec<String>> {
        self.name_calls.borrow_mut().push(name.to_string());
        let reply = self.names.borrow_mut().pop_front();
        reply.unwrap_or(Reply::Ready(None)).resolve().await
    }

    async fn save_entry(&self, entry: &SalaryEntry) -> ClientResult<Vec<SalaryEntry>> {
        self.entry_calls.borrow_mut().push(entry.clone());
        let reply = self.entries.borrow_mut().pop_front();
        reply.unwrap_or(Reply::Ready(None)).resolve().await
    }
}
