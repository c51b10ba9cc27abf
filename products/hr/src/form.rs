//! The name and salary-entry forms.
//!
//! Input buffers are cleared only after the backend accepted a submission. A
//! failed submission leaves everything as the user typed it. Submissions are
//! never disabled while one is in flight; whichever response lands last is what
//! the form shows.

use std::{cell::RefCell, rc::Rc};

use entity::SalaryEntry;
use tracing::debug;

use crate::{
    api::RosterApi,
    error::ClientResult,
    publisher::Subscription,
    service::DataService,
};

/// What a submit gesture did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Inputs were incomplete; the backend was not called.
    Skipped,
    /// The backend accepted the submission and the form was reset.
    Applied,
}

#[derive(Debug, Default)]
struct FormState {
    new_name: String,
    selected_name: String,
    salary: Option<f64>,
    year: Option<i32>,
    names: Vec<String>,
    entries: Vec<SalaryEntry>,
}

pub struct FormComponent<A> {
    service: Rc<DataService<A>>,
    state: Rc<RefCell<FormState>>,
    _subscriptions: [Subscription; 2],
}

impl<A: RosterApi> FormComponent<A> {
    pub fn new(service: Rc<DataService<A>>) -> Self {
        let state = Rc::new(RefCell::new(FormState::default()));

        let names_state = Rc::clone(&state);
        let names = service.names().subscribe(move |names: &Vec<String>| {
            names_state.borrow_mut().names = names.clone();
        });
        let entries_state = Rc::clone(&state);
        let entries = service
            .entries()
            .subscribe(move |entries: &Vec<SalaryEntry>| {
                entries_state.borrow_mut().entries = entries.clone();
            });

        Self {
            service,
            state,
            _subscriptions: [names, entries],
        }
    }

    pub fn set_new_name(&self, value: impl Into<String>) {
        self.state.borrow_mut().new_name = value.into();
    }

    pub fn select_name(&self, value: impl Into<String>) {
        self.state.borrow_mut().selected_name = value.into();
    }

    pub fn set_salary(&self, value: Option<f64>) {
        self.state.borrow_mut().salary = value;
    }

    pub fn set_year(&self, value: Option<i32>) {
        self.state.borrow_mut().year = value;
    }

    pub fn new_name(&self) -> String {
        self.state.borrow().new_name.clone()
    }

    pub fn selected_name(&self) -> String {
        self.state.borrow().selected_name.clone()
    }

    pub fn salary(&self) -> Option<f64> {
        self.state.borrow().salary
    }

    pub fn year(&self) -> Option<i32> {
        self.state.borrow().year
    }

    /// Names currently displayed.
    pub fn names(&self) -> Vec<String> {
        self.state.borrow().names.clone()
    }

    /// Entries currently displayed.
    pub fn entries(&self) -> Vec<SalaryEntry> {
        self.state.borrow().entries.clone()
    }

    pub async fn submit_name(&self) -> ClientResult<Submission> {
        let name = self.state.borrow().new_name.trim().to_string();
        if name.is_empty() {
            debug!("name form is blank; nothing submitted");
            return Ok(Submission::Skipped);
        }

        let names = self.service.add_name(&name).await?;

        let mut state = self.state.borrow_mut();
        state.names = names;
        state.new_name.clear();
        Ok(Submission::Applied)
    }

    pub async fn submit_entry(&self) -> ClientResult<Submission> {
        let Some(entry) = self.pending_entry() else {
            debug!("entry form is incomplete; nothing submitted");
            return Ok(Submission::Skipped);
        };

        let entries = self.service.save_entry(&entry).await?;

        let mut state = self.state.borrow_mut();
        state.entries = entries;
        state.selected_name.clear();
        state.salary = None;
        state.year = None;
        Ok(Submission::Applied)
    }

    fn pending_entry(&self) -> Option<SalaryEntry> {
        let state = self.state.borrow();
        if state.selected_name.is_empty() {
            return None;
        }
        Some(SalaryEntry::new(
            state.selected_name.clone(),
            state.salary?,
            state.year?,
        ))
    }
}
