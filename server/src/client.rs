//! Command-line front end for the roster forms.

use std::{fmt::Write as _, rc::Rc};

use anyhow::{Context, Result};
use entity::SalaryEntry;
use products_hr::{ClientConfig, DataService, FormComponent, HttpRosterApi, Submission};
use tracing::debug;

pub type RosterForm = FormComponent<HttpRosterApi>;

pub async fn connect(config: &ClientConfig) -> Result<RosterForm> {
    let api = HttpRosterApi::new(config).context("invalid roster api configuration")?;
    debug!(api = api.base_url(), "connecting to roster backend");
    let service = DataService::new(api).await;
    Ok(FormComponent::new(Rc::new(service)))
}

pub async fn show(config: &ClientConfig) -> Result<()> {
    let form = connect(config).await?;
    print!("{}", render_roster(&form.names(), &form.entries()));
    Ok(())
}

pub async fn add_name(config: &ClientConfig, name: String) -> Result<()> {
    let form = connect(config).await?;
    form.set_new_name(name);
    match form
        .submit_name()
        .await
        .context("backend did not accept the name")?
    {
        Submission::Skipped => println!("name is blank; nothing submitted"),
        Submission::Applied => print!("{}", render_names(&form.names())),
    }
    Ok(())
}

pub async fn add_entry(
    config: &ClientConfig,
    name: Option<String>,
    salary: Option<f64>,
    year: Option<i32>,
) -> Result<()> {
    let form = connect(config).await?;
    form.select_name(name.unwrap_or_default());
    form.set_salary(salary);
    form.set_year(year);
    match form
        .submit_entry()
        .await
        .context("backend did not accept the entry")?
    {
        Submission::Skipped => println!("name, salary and year are all required; nothing submitted"),
        Submission::Applied => print!("{}", render_entries(&form.entries())),
    }
    Ok(())
}

fn render_roster(names: &[String], entries: &[SalaryEntry]) -> String {
    format!(
        "Names:\n{}Entries:\n{}",
        render_names(names),
        render_entries(entries)
    )
}

fn render_names(names: &[String]) -> String {
    if names.is_empty() {
        return "  (none)\n".to_string();
    }
    names.iter().fold(String::new(), |mut out, name| {
        let _ = writeln!(out, "  {name}");
        out
    })
}

fn render_entries(entries: &[SalaryEntry]) -> String {
    if entries.is_empty() {
        return "  (none)\n".to_string();
    }
    entries.iter().fold(String::new(), |mut out, entry| {
        let _ = writeln!(
            out,
            "  {}\t{:.2}\t{}",
            entry.name, entry.salary, entry.year
        );
        out
    })
}
