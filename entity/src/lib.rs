//! Wire model for the salary roster API.

use serde::{Deserialize, Serialize};

/// One recorded salary for an employee in a given year.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SalaryEntry {
    pub name: String,
    pub salary: f64,
    pub year: i32,
}

impl SalaryEntry {
    pub fn new(name: impl Into<String>, salary: f64, year: i32) -> Self {
        Self {
            name: name.into(),
            salary,
            year,
        }
    }
}

/// Combined roster payload returned by `GET /data`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Snapshot {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub entries: Vec<SalaryEntry>,
}

/// Request body of `POST /names`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewName {
    pub name: String,
}
