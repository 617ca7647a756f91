//! Verification result formatting for terminal display.

use algo_spv_verify::{BatchReport, TxnOutcome, VerificationResult};

const BOX_WIDTH: usize = 90;

/// Format a single successful verification
pub fn format_verification(result: &VerificationResult) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str(&format!("┌─ Algorand Transaction {}┐\n", "─".repeat(BOX_WIDTH - 23)));
    output.push_str(&format!("│ \x1b[33mTXID:\x1b[0m      {}\n", result.txid));
    output.push_str(&format!("│ \x1b[33mRound:\x1b[0m     {}\n", result.round));
    output.push_str(&format!("│ \x1b[33mIndex:\x1b[0m     {}\n", result.leaf_index));
    output.push_str(&format!(
        "│ \x1b[33mTxn root:\x1b[0m  {} ({})\n",
        result.txn_root, result.hash_type
    ));
    output.push_str("│ \x1b[32mINCLUDED\x1b[0m\n");
    output.push_str(&format!("└{}┘\n", "─".repeat(BOX_WIDTH)));

    output
}

/// Format one line per transaction of a batch, followed by a summary line
pub fn format_batch_report(report: &BatchReport) -> String {
    let mut output = String::new();

    for txn in &report.reports {
        let line = match &txn.outcome {
            TxnOutcome::Verified(result) => format!(
                "\x1b[32mVERIFIED\x1b[0m     {} (index {})",
                txn.txid, result.leaf_index
            ),
            TxnOutcome::Rejected(err) => {
                format!("\x1b[31mREJECTED\x1b[0m     {}: {}", txn.txid, err)
            }
            TxnOutcome::Unavailable(err) => {
                format!("\x1b[33mUNAVAILABLE\x1b[0m  {}: {:#}", txn.txid, err)
            }
        };
        output.push_str(&line);
        output.push('\n');
    }

    output.push_str(&format!(
        "Round {}: {}/{} verified",
        report.round,
        report.verified_count(),
        report.reports.len()
    ));

    output
}
