use std::path::PathBuf;

use thiserror::Error;

/// Every hard failure a pipeline stage can hit.
///
/// Soft conditions (an absent dark overlay, a missing color branch) are not
/// errors; they are logged and replaced by an empty result.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("required input {} does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must contain a JSON object at the top level", .0.display())]
    NotAnObject(PathBuf),

    #[error("token set name `{0}` cannot be used as a file name")]
    InvalidSetName(String),

    #[error("braces of `{rule}` opened at byte {offset} never balance")]
    UnbalancedBraces { rule: String, offset: usize },

    #[error("`{rule}` at byte {offset} has no opening brace")]
    UnterminatedRule { rule: String, offset: usize },
}

pub type Result<T, E = TokenError> = std::result::Result<T, E>;

impl TokenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TokenError::Io {
            path: path.into(),
            source,
        }
    }
    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        TokenError::Json {
            path: path.into(),
            source,
        }
    }
}
