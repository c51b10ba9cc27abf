//! Salary roster client for the HR vertical.
//!
//! [`DataService`] mirrors the backend's roster through two replay-latest
//! [`Publisher`] streams and [`FormComponent`] binds the two entry forms to it.
//! Everything here is single-threaded: handles are `Rc`-shared and futures are
//! meant to be driven on one event loop.

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod publisher;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{HttpRosterApi, RosterApi};
pub use config::ClientConfig;
pub use entity::{SalaryEntry, Snapshot};
pub use error::{ClientError, ClientResult};
pub use form::{FormComponent, Submission};
pub use publisher::{Publisher, Subscription};
pub use service::DataService;
