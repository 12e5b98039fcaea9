#![forbid(unsafe_code)]
use anyhow::{anyhow, Context, Result};
use bau::{
    config::AvailabilityConfig,
    io,
    model::{Engineer, EngineerId, ResolvedAssignment, ShiftAssignment},
    query::EngineerQuery,
    storage::JsonStorage,
    store::{ShiftRepository, ShiftStore},
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification BAU (roster JSON local)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de roster
    #[arg(long, global = true, default_value = "roster.json")]
    roster: PathBuf,

    /// Fichier JSON de configuration (`{"App": {...}}`), surchargé par BAU_*
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un ingénieur
    AddEngineer {
        #[arg(long)]
        handle: String,
        #[arg(long)]
        name: String,
    },

    /// Importer des ingénieurs depuis un CSV
    ImportEngineers {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Importer des affectations depuis un CSV (un seul lot atomique)
    ImportShifts {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Planifier une affectation
    Schedule {
        /// handle de l'ingénieur
        #[arg(long)]
        engineer: String,
        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        hours: u32,
    },

    /// Lister et optionnellement exporter
    List {
        /// handle de l'ingénieur
        #[arg(long)]
        engineer: Option<String>,
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        #[arg(long)]
        out_json: Option<PathBuf>,
        #[arg(long)]
        out_csv: Option<PathBuf>,
    },

    /// Ingénieurs disponibles à une date
    Available {
        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    io::parse_date(raw).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let storage = JsonStorage::open(&cli.roster)?;
    let store = ShiftStore::open(storage)
        .with_context(|| format!("opening roster {}", cli.roster.display()))?;

    match cli.cmd {
        Commands::AddEngineer { handle, name } => {
            let engineer = Engineer::new(handle, name);
            store.add_engineers(vec![engineer.clone()])?;
            println!("{} | {}", engineer.id.as_str(), engineer.handle);
        }
        Commands::ImportEngineers { csv } => {
            let engineers = io::import_engineers_csv(csv)?;
            let added = store.add_engineers(engineers)?;
            println!("{} engineer(s) imported", added.len());
        }
        Commands::ImportShifts { csv } => {
            let roster = store.snapshot()?;
            let shifts = io::import_assignments_csv(csv, &roster)?;
            let created = store.create_assignments(shifts)?;
            println!("{} assignment(s) created", created.len());
        }
        Commands::Schedule {
            engineer,
            date,
            hours,
        } => {
            let id = engineer_id(&store, &engineer)?;
            let created = store.schedule_engineer_shift(&id, date, hours)?;
            println!("{} | {} | {}h", created.id.as_str(), created.date, created.duration_hours);
        }
        Commands::List {
            engineer,
            from,
            to,
            out_json,
            out_csv,
        } => {
            let listed = list_assignments(&store, engineer.as_deref(), from, to)?;
            if let Some(path) = out_json {
                io::export_roster_json(path, &store.snapshot()?)?;
            }
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &listed)?;
            }
            // impression compacte
            for r in &listed {
                println!(
                    "{} | {} | {}h | {}",
                    r.assignment.id.as_str(),
                    r.assignment.date,
                    r.assignment.duration_hours,
                    r.engineer.handle
                );
            }
        }
        Commands::Available { date } => {
            let config = AvailabilityConfig::load(cli.config.as_deref())?;
            let query = EngineerQuery::new(&store, config);
            for engineer in query.find_available_engineers(date)? {
                println!("{} | {}", engineer.handle, engineer.display_name);
            }
        }
    }

    Ok(())
}

fn engineer_id(store: &impl ShiftRepository, handle: &str) -> Result<EngineerId> {
    store
        .snapshot()?
        .find_engineer_by_handle(handle)
        .map(|e| e.id.clone())
        .ok_or_else(|| anyhow!("unknown engineer: {handle}"))
}

fn list_assignments(
    store: &impl ShiftRepository,
    engineer: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<ResolvedAssignment>> {
    let in_range =
        |a: &ShiftAssignment| from.map_or(true, |f| f <= a.date) && to.map_or(true, |t| a.date <= t);

    let Some(handle) = engineer else {
        let mut all = store.find_all()?;
        all.retain(|r| in_range(&r.assignment));
        all.sort_by_key(|r| r.assignment.date);
        return Ok(all);
    };

    let owner = store
        .snapshot()?
        .find_engineer_by_handle(handle)
        .cloned()
        .ok_or_else(|| anyhow!("unknown engineer: {handle}"))?;
    let shifts = match (from, to) {
        (Some(from), Some(to)) => store.find_by_engineer_between(&owner.id, from, to)?,
        _ => {
            let mut shifts = store.find_by_engineer(&owner.id)?;
            shifts.retain(|a| in_range(a));
            shifts
        }
    };
    Ok(shifts
        .into_iter()
        .map(|assignment| ResolvedAssignment {
            assignment,
            engineer: owner.clone(),
        })
        .collect())
}
