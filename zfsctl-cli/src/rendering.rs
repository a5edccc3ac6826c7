// zfsctl-cli/src/rendering.rs
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use zfsctl_core::{Dataset, Pool, Property};

const MISSING: &str = "-";

/// Rows ready for tab-separated output. The first row is the header.
pub struct Table {
    header: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(header: Vec<&'static str>) -> Self {
        Self { header, rows: Vec::new() }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Body only, one tab-separated line per record.
    pub fn body(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn header_line(&self) -> String {
        self.header.join("\t").to_uppercase()
    }
}

fn opt_num(value: Option<u64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |n| n.to_string())
}

pub fn dataset_table(datasets: &[Dataset]) -> Table {
    let mut table = Table::new(vec!["name", "used", "avail", "refer", "mountpoint"]);
    for ds in datasets {
        table.push(vec![
            ds.name.clone(),
            ds.used.to_string(),
            opt_num(ds.avail),
            ds.refer.to_string(),
            ds.mountpoint.clone(),
        ]);
    }
    table
}

pub fn pool_table(pools: &[Pool]) -> Table {
    let mut table = Table::new(vec!["name", "size", "alloc", "free", "cap", "health", "altroot"]);
    for pool in pools {
        table.push(vec![
            pool.name.clone(),
            opt_num(pool.size),
            opt_num(pool.alloc),
            opt_num(pool.free),
            pool.capacity.map_or_else(|| MISSING.to_string(), |c| format!("{}%", c)),
            pool.health.to_string(),
            pool.altroot.clone().unwrap_or_else(|| MISSING.to_string()),
        ]);
    }
    table
}

pub fn property_table(properties: &[Property]) -> Table {
    let mut table = Table::new(vec!["name", "property", "value", "source"]);
    for prop in properties {
        table.push(vec![
            prop.name.clone(),
            prop.property.clone(),
            prop.value.clone(),
            prop.source.to_string(),
        ]);
    }
    table
}

pub fn to_json<T: Serialize + ?Sized>(records: &T) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize records as JSON")
}

/// Prints records either as JSON or as a table with a bold header.
pub fn print_records<T: Serialize + ?Sized>(records: &T, table: Table, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(records)?);
        return Ok(());
    }
    if table.rows.is_empty() {
        eprintln!("{}", "no records".dimmed());
        return Ok(());
    }
    println!("{}", table.header_line().bold());
    println!("{}", table.body());
    Ok(())
}

pub fn print_done(action: &str, target: &str) {
    eprintln!("{} {} {}", "✔".green(), action, target.bold());
}

pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".yellow(), cause);
    }
}
