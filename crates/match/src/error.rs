use std::fmt;

#[derive(Debug)]
pub enum MatchError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad weights, bad threshold, empty file name).
    ConfigValidation(String),
    /// A structurally required column is missing from an input CSV.
    MissingColumn { origin: String, column: String },
    /// CSV-level read error (malformed record, bad encoding).
    Csv { origin: String, message: String },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { origin, column } => {
                write!(f, "{origin}: missing column '{column}'")
            }
            Self::Csv { origin, message } => write!(f, "{origin}: CSV error: {message}"),
        }
    }
}

impl std::error::Error for MatchError {}
