use crate::model::{Engineer, ResolvedAssignment, Roster, ShiftAssignment};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import d'ingénieurs depuis CSV: header `handle,display_name`
pub fn import_engineers_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Engineer>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        let display = rec.get(1).context("missing display_name")?.trim();
        if handle.is_empty() || display.is_empty() {
            bail!("invalid engineer row (empty)");
        }
        out.push(Engineer::new(handle, display));
    }
    Ok(out)
}

/// Import d'affectations: header `engineer_handle,date,duration_hours`.
///
/// Les handles sont résolus contre `roster` ; un handle inconnu est une erreur.
pub fn import_assignments_csv<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
) -> anyhow::Result<Vec<ShiftAssignment>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let handle = rec.get(0).context("missing engineer_handle")?.trim();
        let date = rec.get(1).context("missing date")?.trim();
        let hours = rec.get(2).context("missing duration_hours")?.trim();

        let engineer = roster
            .find_engineer_by_handle(handle)
            .with_context(|| format!("row {}: unknown engineer handle {handle}", line + 1))?;
        let date = parse_date(date).with_context(|| format!("row {}", line + 1))?;
        let hours: u32 = hours
            .parse()
            .with_context(|| format!("row {}: invalid duration_hours {hours}", line + 1))?;
        out.push(ShiftAssignment::new(engineer.id.clone(), date, hours));
    }
    Ok(out)
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Export JSON du roster (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des affectations: header `id,engineer_handle,date,duration_hours`
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    assignments: &[ResolvedAssignment],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "engineer_handle", "date", "duration_hours"])?;
    for r in assignments {
        let date = r.assignment.date.to_string();
        let hours = r.assignment.duration_hours.to_string();
        w.write_record([
            r.assignment.id.as_str(),
            r.engineer.handle.as_str(),
            date.as_str(),
            hours.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
