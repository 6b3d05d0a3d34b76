//! Terminal formatting for verification results.

use metafield::lineage::{VerifyRecord, VerifyStatus};

const RESET: &str = "\x1b[0m";

fn status_color(status: VerifyStatus) -> &'static str {
    match status {
        VerifyStatus::Ok => "\x1b[1;36m",
        VerifyStatus::Miss => "\x1b[1;33m",
        VerifyStatus::Diff => "\x1b[1;31m",
    }
}

/// One row: `[ OK ] f572d39 data/x.csv`. The hash column shows the observed fingerprint.
pub fn verify_row(record: &VerifyRecord, color: bool) -> String {
    let observed = record.observed_str();
    let short = &observed[..observed.len().min(7)];
    let (open, close) = if color {
        (status_color(record.status), RESET)
    } else {
        ("", "")
    };
    format!(
        "[{open}{:^4}{close}] {short:<7} {}",
        record.status, record.path
    )
}
