use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;
use tally_ledger::audit::{audit, AttestationStatus, AuditReport};
use tally_ledger::DigestAlgorithm;

use super::read_ledger;

/// Audit the signatures `counterpart` left in `ledger` against the
/// counterpart's own ledger file.
pub fn execute(
    ledger: &Path,
    counterpart: &str,
    counterpart_ledger: &Path,
    algorithm: DigestAlgorithm,
) -> anyhow::Result<AuditReport> {
    let local = read_ledger(ledger)?;
    let remote = read_ledger(counterpart_ledger)?;
    Ok(audit(&local, counterpart, &remote, algorithm))
}

pub fn run(
    ledger: &Path,
    counterpart: &str,
    counterpart_ledger: &Path,
    algorithm: DigestAlgorithm,
) -> anyhow::Result<()> {
    let report = execute(ledger, counterpart, counterpart_ledger, algorithm)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Line", "Digest", "Status", "Counterpart Line"]);

    for attestation in &report.attestations {
        let (status, counterpart_line) = match attestation.status {
            AttestationStatus::Attested { counterpart_line } => {
                ("ATTESTED", counterpart_line.to_string())
            }
            AttestationStatus::Diverged { counterpart_line } => {
                ("DIVERGED", counterpart_line.to_string())
            }
            AttestationStatus::Unmatched => ("UNMATCHED", "-".to_string()),
        };
        table.add_row(vec![
            attestation.line.to_string(),
            attestation.signature.digest.to_hex(),
            status.to_string(),
            counterpart_line,
        ]);
    }
    println!("{table}\n");

    let failed = report.failures().count();
    if failed > 0 {
        anyhow::bail!(
            "{} of {} attestations by {} do not match {}",
            failed,
            report.attestations.len(),
            counterpart,
            counterpart_ledger.display()
        );
    }
    println!("{} attestations by {} verified", report.attestations.len(), counterpart);
    Ok(())
}
