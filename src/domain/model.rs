use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One source row as read, keyed by the original column label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub data: HashMap<String, serde_json::Value>,
}

/// A normalized row: canonical field key -> string value. The phone field,
/// once present, is always in `+<countrycode><subscriber>` form.
#[derive(Debug, Clone, Default)]
pub struct CleanRecord {
    pub data: HashMap<String, String>,
}

impl CleanRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

/// Request body for one user-creation call. Built once per record, sent exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct UserPayload {
    pub name: String,
    pub role: String,
    pub phone: String,
    pub email: String,
    pub agency: AgencyDetails,
}

/// Nested agency object; the key set depends on the configured schema variant.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AgencyDetails {
    #[serde(rename_all = "camelCase")]
    Supplier { supplier_number: String },
    #[serde(rename_all = "camelCase")]
    Debit {
        debit_number: String,
        branch_name: String,
    },
}

/// Terminal classification of one submission attempt.
#[derive(Debug, Clone)]
pub enum Outcome {
    Created {
        email: String,
        body: serde_json::Value,
    },
    SkippedDuplicate {
        email: String,
        message: String,
    },
    InvalidPhone {
        email: String,
        message: String,
    },
    UnexpectedApiError {
        email: String,
        status: i64,
        message: String,
    },
    MalformedResponse {
        email: String,
        http_status: u16,
        body: String,
    },
    TransportError {
        email: String,
        detail: String,
    },
}

impl Outcome {
    pub fn email(&self) -> &str {
        match self {
            Outcome::Created { email, .. }
            | Outcome::SkippedDuplicate { email, .. }
            | Outcome::InvalidPhone { email, .. }
            | Outcome::UnexpectedApiError { email, .. }
            | Outcome::MalformedResponse { email, .. }
            | Outcome::TransportError { email, .. } => email,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Outcome::Created { .. })
    }
}

/// Aggregated result of a run, built incrementally in source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub attempted: usize,
    pub created: usize,
    pub failed_emails: Vec<String>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        self.attempted += 1;
        if outcome.is_created() {
            self.created += 1;
        } else {
            self.failed_emails.push(outcome.email().to_string());
        }
    }

    pub fn failed(&self) -> usize {
        self.failed_emails.len()
    }
}
