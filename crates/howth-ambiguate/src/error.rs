use thiserror::Error;

/// Errors raised by the property ambiguation pass.
///
/// Ordinary input never fails: anything the pass cannot prove safe is left
/// unrenamed. Only configuration problems abort the pass.
#[derive(Error, Debug)]
pub enum AmbiguateError {
    #[error("alphabet exhausted: {clusters} properties need names but only {available} identifiers can be generated")]
    AlphabetExhausted { clusters: usize, available: usize },

    #[error("invalid alphabet: {reason}")]
    InvalidAlphabet { reason: String },

    #[error("failed to parse ambiguation config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl AmbiguateError {
    #[must_use]
    pub fn invalid_alphabet(reason: impl Into<String>) -> Self {
        Self::InvalidAlphabet {
            reason: reason.into(),
        }
    }
}
