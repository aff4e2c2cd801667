use chrono::SecondsFormat;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;
use tally_ledger::entry::parse_entries;
use tally_ledger::LedgerEntry;

use super::read_ledger;

pub fn run(ledger: &Path) -> anyhow::Result<()> {
    let content = read_ledger(ledger)?;
    let entries = parse_entries(&content);

    println!("\nLedger {}", ledger.display());
    println!("--------------------");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Line", "Kind", "Details"]);

    for (line, entry) in &entries {
        table.add_row(vec![line.to_string(), entry.kind().to_string(), describe(entry)]);
    }

    println!("{table}");
    println!("{} lines, {} bytes\n", entries.len(), content.len());
    Ok(())
}

fn describe(entry: &LedgerEntry) -> String {
    match entry {
        LedgerEntry::Transaction(tx) => {
            let instance = tx.instance();
            format!(
                "{} with [{}] at {} {}",
                instance.op,
                instance.counterparties.join(", "),
                instance.date.to_rfc3339_opts(SecondsFormat::Secs, true),
                instance.op_info
            )
        }
        LedgerEntry::Signature(sig) => format!("{} attests {}", sig.author, sig.digest),
        LedgerEntry::Unrecognized(text) => text.clone(),
    }
}
