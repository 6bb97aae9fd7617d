use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum JtlensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid label filter: {0}")]
    Regex(#[from] regex::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A record (or CSV row) that cannot be analysed. `row` is 1-based over
    /// data rows; 0 means the problem is not tied to a single row.
    #[error("Malformed record at row {row}: field '{field}' {reason}")]
    MalformedRecord {
        row: usize,
        field: &'static str,
        reason: String,
    },
}

impl JtlensError {
    pub fn malformed(row: usize, field: &'static str, reason: impl Into<String>) -> Self {
        JtlensError::MalformedRecord {
            row,
            field,
            reason: reason.into(),
        }
    }
}

impl Serialize for JtlensError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
