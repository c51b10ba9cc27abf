//! In-memory roster backed by an append-only CSV file.
//!
//! Each line is `name,salary,year` with the salary written as `50000.00 NOK`.
//! Names are derived from entries on load; names added on their own are kept in
//! memory only.

use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use entity::{SalaryEntry, Snapshot};
use thiserror::Error;
use tracing::{debug, info, warn};

const SALARY_UNIT: &str = "NOK";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to write entry: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush entry: {0}")]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Default)]
struct Roster {
    names: Vec<String>,
    entries: Vec<SalaryEntry>,
}

impl Roster {
    fn remember_name(&mut self, name: &str) {
        if !self.names.iter().any(|existing| existing == name) {
            self.names.push(name.to_string());
        }
    }
}

#[derive(Debug)]
pub struct RosterStore {
    csv_path: PathBuf,
    roster: RwLock<Roster>,
}

impl RosterStore {
    /// Load `csv_path` if it exists; a missing file is an empty roster.
    pub fn open(csv_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let csv_path = csv_path.into();
        let roster = match File::open(&csv_path) {
            Ok(file) => load_roster(file, &csv_path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %csv_path.display(), "no roster file yet");
                Roster::default()
            }
            Err(source) => {
                return Err(StoreError::Open {
                    path: csv_path,
                    source,
                });
            }
        };
        info!(
            path = %csv_path.display(),
            names = roster.names.len(),
            entries = roster.entries.len(),
            "roster loaded"
        );
        Ok(Self {
            csv_path,
            roster: RwLock::new(roster),
        })
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &Path {
        &self.csv_path
    }

    pub fn snapshot(&self) -> Snapshot {
        let roster = self.roster.read().unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            names: roster.names.clone(),
            entries: roster.entries.clone(),
        }
    }

    /// Add `name` unless already known and return every name.
    pub fn add_name(&self, name: &str) -> Vec<String> {
        let mut roster = self.roster.write().unwrap_or_else(PoisonError::into_inner);
        roster.remember_name(name);
        roster.names.clone()
    }

    /// Persist `entry`, then add it in memory and return every entry.
    pub fn add_entry(&self, entry: SalaryEntry) -> StoreResult<Vec<SalaryEntry>> {
        let mut roster = self.roster.write().unwrap_or_else(PoisonError::into_inner);
        self.append(&entry)?;
        roster.remember_name(&entry.name);
        roster.entries.push(entry);
        Ok(roster.entries.clone())
    }

    /// The row is encoded up front and written in one call; a failed write is
    /// truncated back so the file never keeps a partial row.
    fn append(&self, entry: &SalaryEntry) -> StoreResult<()> {
        let row = encode_row(entry)?;
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.csv_path)
            .map_err(|source| StoreError::Open {
                path: self.csv_path.clone(),
                source,
            })?;
        let committed = file.metadata()?.len();
        if let Err(err) = file.write_all(&row).and_then(|()| file.flush()) {
            if let Err(truncate) = file.set_len(committed) {
                warn!(path = %self.csv_path.display(), error = %truncate, "failed to roll back partial row");
            }
            return Err(err.into());
        }
        Ok(())
    }
}

fn encode_row(entry: &SalaryEntry) -> StoreResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record([
        entry.name.clone(),
        format_salary(entry.salary),
        entry.year.to_string(),
    ])?;
    writer
        .into_inner()
        .map_err(|err| StoreError::Io(err.into_error()))
}

fn load_roster(file: File, path: &Path) -> Roster {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut roster = Roster::default();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(path = %path.display(), line = line + 1, error = %err, "unreadable roster row");
                continue;
            }
        };
        let Some(entry) = parse_record(&record) else {
            debug!(line = line + 1, "skipping malformed roster row");
            continue;
        };
        roster.remember_name(&entry.name);
        roster.entries.push(entry);
    }
    roster
}

fn parse_record(record: &csv::StringRecord) -> Option<SalaryEntry> {
    if record.len() != 3 {
        return None;
    }
    let salary = parse_salary(&record[1])?;
    let year = record[2].trim().parse().ok()?;
    Some(SalaryEntry::new(&record[0], salary, year))
}

fn parse_salary(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    raw.strip_suffix(SALARY_UNIT)
        .unwrap_or(raw)
        .trim()
        .parse()
        .ok()
        .filter(|salary: &f64| salary.is_finite())
}

fn format_salary(salary: f64) -> String {
    format!("{salary:.2} {SALARY_UNIT}")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> RosterStore {
        RosterStore::open(dir.path().join("salary_entries.csv")).unwrap()
    }

    #[test]
    fn missing_file_is_empty_roster() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.snapshot(), Snapshot::default());
    }

    #[test]
    fn add_name_is_idempotent_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.add_name("Alice");
        store.add_name("Bob");
        assert_eq!(store.add_name("Alice"), vec!["Alice", "Bob"]);
    }

    #[test]
    fn entries_persist_with_unit_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .add_entry(SalaryEntry::new("Alice", 50000.0, 2023))
            .unwrap();
        let all = store
            .add_entry(SalaryEntry::new("Bob, Jr.", 612345.5, 2024))
            .unwrap();
        assert_eq!(all.len(), 2);

        let written = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            written,
            "Alice,50000.00 NOK,2023\n\"Bob, Jr.\",612345.50 NOK,2024\n"
        );

        let reopened = store_in(&dir);
        let snapshot = reopened.snapshot();
        assert_eq!(snapshot.names, vec!["Alice", "Bob, Jr."]);
        assert_eq!(
            snapshot.entries,
            vec![
                SalaryEntry::new("Alice", 50000.0, 2023),
                SalaryEntry::new("Bob, Jr.", 612345.5, 2024),
            ]
        );
    }

    #[test]
    fn saving_an_entry_registers_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.add_name("Alice");
        store.add_entry(SalaryEntry::new("Carol", 1.0, 2020)).unwrap();
        assert_eq!(store.snapshot().names, vec!["Alice", "Carol"]);
    }

    #[test]
    fn names_only_added_by_name_are_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        store_in(&dir).add_name("Ghost");
        assert!(store_in(&dir).snapshot().names.is_empty());
    }

    #[test]
    fn load_skips_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salary_entries.csv");
        fs::write(
            &path,
            "Alice,100.00 NOK,2020\nBob,oops,2021\nCarol,5\nDana,7.5,2022\nEve,1 NOK,later\n\
             Finn,NaN NOK,2021\nGus,inf,2021\nHal,-infinity NOK,2021\nAlice,200,2021\n",
        )
        .unwrap();

        let snapshot = RosterStore::open(&path).unwrap().snapshot();

        assert_eq!(snapshot.names, vec!["Alice", "Dana"]);
        assert_eq!(
            snapshot.entries,
            vec![
                SalaryEntry::new("Alice", 100.0, 2020),
                SalaryEntry::new("Dana", 7.5, 2022),
                SalaryEntry::new("Alice", 200.0, 2021),
            ]
        );
    }

    #[test]
    fn loaded_roster_stays_json_encodable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salary_entries.csv");
        fs::write(&path, "Alice,100.00 NOK,2020\nEve,NaN NOK,2021\n").unwrap();

        let snapshot = RosterStore::open(&path).unwrap().snapshot();
        let body = serde_json::to_string(&snapshot).unwrap();
        let decoded: Snapshot = serde_json::from_str(&body).unwrap();

        assert_eq!(decoded.entries, vec![SalaryEntry::new("Alice", 100.0, 2020)]);
    }

    #[test]
    fn encoded_row_is_one_complete_line() {
        let row = encode_row(&SalaryEntry::new("Bob, Jr.", 612345.5, 2024)).unwrap();
        assert_eq!(row, b"\"Bob, Jr.\",612345.50 NOK,2024\n");
    }

    #[test]
    fn appends_follow_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salary_entries.csv");
        fs::write(&path, "Alice,100.00 NOK,2020\n").unwrap();

        let store = RosterStore::open(&path).unwrap();
        store.add_entry(SalaryEntry::new("Bob", 1.0, 2021)).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Alice,100.00 NOK,2020\nBob,1.00 NOK,2021\n"
        );
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::open(dir.path().join("missing").join("entries.csv")).unwrap();

        let err = store.add_entry(SalaryEntry::new("Alice", 1.0, 2020));

        assert!(matches!(err, Err(StoreError::Open { .. })));
        assert_eq!(store.snapshot(), Snapshot::default());
    }
}
