use crate::error::AmbiguateError;
use serde::{Deserialize, Serialize};

/// Characters used for the first position of generated names.
pub const DEFAULT_LEADING: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";

/// Characters used for subsequent positions (includes digits).
pub const DEFAULT_CONTINUING: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_$";

/// Longest identifier the default alphabet will produce.
pub const DEFAULT_MAX_LENGTH: usize = 8;

/// Call targets that name a property through a string argument.
pub const DEFAULT_RENAME_FUNCTIONS: &[&str] = &["JSCompiler_renameProperty"];

/// Configuration for the property ambiguation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AmbiguateConfig {
    /// Characters generated names are built from.
    pub alphabet: Alphabet,

    /// Names that are never renamed and never generated.
    pub reserved: Vec<String>,

    /// Functions whose first argument is a property name given as a string.
    /// Properties named this way keep their name.
    pub rename_functions: Vec<String>,
}

impl Default for AmbiguateConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            reserved: Vec::new(),
            rename_functions: DEFAULT_RENAME_FUNCTIONS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl AmbiguateConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, AmbiguateError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the alphabet.
    #[must_use]
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Add reserved names.
    #[must_use]
    pub fn with_reserved<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
        self
    }

    /// Replace the list of rename functions.
    #[must_use]
    pub fn with_rename_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rename_functions = names.into_iter().map(Into::into).collect();
        self
    }
}

/// The ordered character sets generated identifiers are built from.
///
/// Names are enumerated shortest first. Within one length the first
/// character varies fastest: `a, b, ..., $, aa, ba, ..., $a, ab, ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Alphabet {
    pub leading: String,
    pub continuing: String,
    pub max_length: usize,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            leading: DEFAULT_LEADING.to_string(),
            continuing: DEFAULT_CONTINUING.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl Alphabet {
    #[must_use]
    pub fn new(leading: &str, continuing: &str) -> Self {
        Self {
            leading: leading.to_string(),
            continuing: continuing.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Set the maximum identifier length.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Check that every character can appear in its position of an identifier.
    pub fn validate(&self) -> Result<(), AmbiguateError> {
        if self.leading.is_empty() {
            return Err(AmbiguateError::invalid_alphabet("no leading characters"));
        }
        if self.max_length == 0 {
            return Err(AmbiguateError::invalid_alphabet("maximum length is zero"));
        }
        if let Some(c) = self.leading.chars().find(|c| !is_id_start(*c)) {
            return Err(AmbiguateError::invalid_alphabet(format!(
                "{c:?} cannot start an identifier"
            )));
        }
        if let Some(c) = self.continuing.chars().find(|c| !is_id_continue(*c)) {
            return Err(AmbiguateError::invalid_alphabet(format!(
                "{c:?} cannot appear in an identifier"
            )));
        }
        for (set, label) in [(&self.leading, "leading"), (&self.continuing, "continuing")] {
            let mut seen = Vec::with_capacity(set.len());
            for c in set.chars() {
                if seen.contains(&c) {
                    return Err(AmbiguateError::invalid_alphabet(format!(
                        "{c:?} repeated in {label} characters"
                    )));
                }
                seen.push(c);
            }
        }
        Ok(())
    }
}

fn is_id_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_id_continue(c: char) -> bool {
    is_id_start(c) || c.is_ascii_digit()
}
