//! Resolves a user-typed station name pattern to exactly one station.

use tracing::debug;

use super::models::Station;
use super::storage::Storage;

/// Why a name pattern did not identify a single station
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("**No station found...")]
    NotFound { pattern: String },

    #[error("**Multiple stations found...")]
    Ambiguous {
        pattern: String,
        matches: Vec<Station>,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ResolveError {
    /// The pattern that failed to resolve, if the store was reachable
    pub fn pattern(&self) -> Option<&str> {
        match self {
            ResolveError::NotFound { pattern } | ResolveError::Ambiguous { pattern, .. } => {
                Some(pattern)
            }
            ResolveError::Storage(_) => None,
        }
    }
}

/// Look up the single station whose name matches `pattern`.
///
/// `pattern` uses SQL `LIKE` wildcards: `_` for one character, `%` for any
/// run of characters. Zero or several matches are reported as errors; the
/// caller decides whether to re-prompt or give up.
pub fn resolve(storage: &Storage, pattern: &str) -> Result<Station, ResolveError> {
    let mut matches = storage.stations_like(pattern)?;
    match matches.len() {
        0 => Err(ResolveError::NotFound {
            pattern: pattern.to_string(),
        }),
        1 => {
            let station = matches.remove(0);
            debug!(pattern, id = station.id, name = %station.name, "resolved station");
            Ok(station)
        }
        _ => Err(ResolveError::Ambiguous {
            pattern: pattern.to_string(),
            matches,
        }),
    }
}
