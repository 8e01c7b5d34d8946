//! Console line protocol of the bench simulator.
//!
//! | Line              | Meaning                      |
//! |-------------------|------------------------------|
//! | `manual`          | manual override button       |
//! | `pairing`         | pairing button               |
//! | `status`          | print a status snapshot      |
//! | `pair:<token>`    | provision a new identity     |
//! | `code_length` chars | submit an access code      |
//!
//! Keywords are matched before codes, so a keyword whose length equals the
//! code length is never submitted as a code.

use lockin_controller::EventReport;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Code(String),
    Pair(String),
    BeginPairing,
    Manual,
    Status,
}

/// Parse one console line; `None` for anything the core must not see.
pub fn parse_line(line: &str, code_length: usize) -> Option<ConsoleCommand> {
    let line = line.trim();

    match line {
        "manual" => return Some(ConsoleCommand::Manual),
        "pairing" => return Some(ConsoleCommand::BeginPairing),
        "status" => return Some(ConsoleCommand::Status),
        _ => {}
    }

    if let Some(token) = line.strip_prefix("pair:") {
        let token = token.trim();
        return (!token.is_empty()).then(|| ConsoleCommand::Pair(token.to_string()));
    }

    (line.chars().count() == code_length).then(|| ConsoleCommand::Code(line.to_string()))
}

/// One JSON line per report.
pub fn render_report(report: &EventReport) -> Value {
    match report {
        EventReport::Submission(outcome) => json!({ "event": "submission", "outcome": outcome }),
        EventReport::ManualUnlocked => json!({ "event": "manual_unlock" }),
        EventReport::Paired => json!({ "event": "paired" }),
        EventReport::PairingFailed(error) => {
            json!({ "event": "pairing_failed", "error": error.to_string() })
        }
        EventReport::PairingMode => json!({ "event": "pairing_mode" }),
        EventReport::Status(status) => json!({ "event": "status", "status": status }),
    }
}
