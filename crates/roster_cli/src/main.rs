//! Command-line front end for the employee roster.
//!
//! # Responsibility
//! - Stand in for the table UI: list, add and delete employees.
//! - Talk to `roster_core` only through `RosterManager`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use roster_core::config::{DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
use roster_core::{
    format_display_date, format_salary, init_logging, EmployeeId, EmployeeStore, RosterConfig,
    RosterManager, RosterRow,
};
use std::io::Write;
use std::path::PathBuf;

/// Employee roster manager
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file (default: employees.db)
    #[arg(long, value_name = "FILE", env = DB_PATH_ENV)]
    db: Option<PathBuf>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, value_name = "DIR", env = LOG_DIR_ENV)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, value_name = "LEVEL", env = LOG_LEVEL_ENV)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every employee in insertion order
    List {
        /// Output as JSON for integrations
        #[arg(long)]
        json: bool,
    },

    /// Add an employee
    Add {
        name: String,
        /// Birth date as dd.MM.yyyy
        birth_date: String,
        salary: String,
    },

    /// Delete an employee by its id (see `list`)
    Delete { id: EmployeeId },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = RosterConfig::resolve(cli.db, cli.log_level.as_deref(), cli.log_dir)?;
    if let Some(mut logging) = config.logging() {
        logging.echo_warnings = true;
        init_logging(&logging)?;
    }

    let mut roster = RosterManager::open(&config.db_path).with_context(|| {
        format!(
            "failed to open employee database at {}",
            config.db_path.display()
        )
    })?;
    info!("event=cli_start module=cli status=ok rows={}", roster.len());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::List { json } => {
            if json {
                serde_json::to_writer_pretty(&mut out, roster.employees())?;
                writeln!(out)?;
            } else {
                print_table(&mut out, &roster)?;
            }
        }
        Commands::Add {
            name,
            birth_date,
            salary,
        } => {
            let id = roster
                .add(&name, &birth_date, &salary)
                .context("employee was not added")?;
            writeln!(out, "Added employee #{id}.")?;
            print_table(&mut out, &roster)?;
        }
        Commands::Delete { id } => {
            let existed = roster.get(id).is_some();
            roster.delete(id).context("employee was not deleted")?;
            if existed {
                writeln!(out, "Deleted employee #{id}.")?;
            } else {
                writeln!(out, "No employee with id {id}; nothing deleted.")?;
            }
            print_table(&mut out, &roster)?;
        }
    }

    Ok(())
}

fn print_table<S: EmployeeStore>(out: &mut impl Write, roster: &RosterManager<S>) -> Result<()> {
    if roster.is_empty() {
        writeln!(out, "No employees.")?;
        return Ok(());
    }

    let rows: Vec<[String; 5]> = roster.view().map(table_cells).collect();
    let header = [
        "#".to_string(),
        "Name".to_string(),
        "Birth Date".to_string(),
        "Salary".to_string(),
        "Id".to_string(),
    ];

    let mut widths = header.clone().map(|cell| cell.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    for row in std::iter::once(&header).chain(rows.iter()) {
        let line = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

fn table_cells(row: RosterRow<'_>) -> [String; 5] {
    [
        row.position.to_string(),
        row.employee.name.clone(),
        format_display_date(row.employee.birth_date),
        format_salary(row.employee.salary),
        row.employee.id.to_string(),
    ]
}
