//! Shared table / JSON rendering for resolved records.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use pathvector_core::Protocol;

#[derive(Serialize)]
struct ResolvedJson<'a> {
    identifier: &'a str,
    #[serde(flatten)]
    protocol: &'a Protocol,
}

#[derive(Tabled)]
struct ResolvedRow {
    #[tabled(rename = "identifier")]
    identifier: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "tags")]
    tags: String,
    #[tabled(rename = "asn")]
    asn: String,
}

pub fn print_json(resolved: &[(String, Protocol)]) -> Result<()> {
    let payload: Vec<ResolvedJson<'_>> = resolved
        .iter()
        .map(|(identifier, protocol)| ResolvedJson {
            identifier,
            protocol,
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize records JSON")?
    );
    Ok(())
}

pub fn print_table(resolved: Vec<(String, Protocol)>) {
    if resolved.is_empty() {
        println!("No protocols.");
        return;
    }

    let rows: Vec<ResolvedRow> = resolved
        .into_iter()
        .map(|(identifier, protocol)| ResolvedRow {
            identifier,
            name: protocol.name,
            tags: protocol.tags.join(", "),
            asn: format_asn(protocol.asn),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn format_asn(asn: i64) -> String {
    if asn == 0 {
        "unknown".bright_black().to_string()
    } else {
        format!("AS{asn}")
    }
}
