use std::fmt;

/// Errors from the catalog / data-loading surface.
///
/// This is the only part of the crate where `Result` is the right shape:
/// malformed RON or a missing file is a data-authoring problem, detected
/// before combat ever starts. The engine's own public operations never
/// return `Err` (see `PlayResult` / `TurnReport`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The RON source failed to parse.
    Parse(String),
    /// A catalog file could not be read.
    Io(String),
    /// A lookup referenced a definition id the catalog does not contain.
    DefinitionNotFound(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Parse(details) => write!(f, "catalog parse error: {}", details),
            CatalogError::Io(details) => write!(f, "catalog io error: {}", details),
            CatalogError::DefinitionNotFound(id) => {
                write!(f, "definition not found in catalog: {}", id)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<ron::error::SpannedError> for CatalogError {
    fn from(err: ron::error::SpannedError) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
