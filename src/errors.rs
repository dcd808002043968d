use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiTreeError {
    #[error("JSON syntax error: {message}")]
    DecodeSyntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Schema error at {path}: {message}")]
    DecodeSchema { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

impl UiTreeError {
    pub(crate) fn schema(path: &str, message: impl Into<String>) -> Self {
        UiTreeError::DecodeSchema {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for UiTreeError {
    fn from(e: serde_json::Error) -> Self {
        UiTreeError::DecodeSyntax {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

impl serde::Serialize for UiTreeError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

pub type UiTreeResult<T> = Result<T, UiTreeError>;

/// Failure to recover a 32-bit coordinate from a captured 64-bit numeral.
/// Never leaves the region resolver; the affected node just loses its region.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumeralError {
    #[error("invalid numeral: {0:?}")]
    InvalidNumeral(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}
