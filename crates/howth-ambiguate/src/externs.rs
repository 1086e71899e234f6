//! Externally visible property names.
//!
//! Any name declared by an extern definition is consumed by code outside the
//! compilation unit and must keep its spelling everywhere.

use crate::ast::{NodeKind, Program, PropertyKey};
use rustc_hash::FxHashSet;

/// Always extern: renaming it would break every constructor function.
const ALWAYS_EXTERN: &[&str] = &["prototype"];

/// The set of property names that must never be renamed.
#[derive(Debug, Clone)]
pub struct ExternProperties {
    names: FxHashSet<String>,
}

impl Default for ExternProperties {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternProperties {
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: ALWAYS_EXTERN.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Build from an explicit list of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut externs = Self::new();
        externs.extend(names);
        externs
    }

    /// Gather names from an externs program: every dotted property and every
    /// object-literal or class member key.
    #[must_use]
    pub fn collect(externs: &Program) -> Self {
        let mut result = Self::new();
        for (_, node) in externs.nodes() {
            match node {
                NodeKind::Member { property, .. } => {
                    result.insert(property);
                }
                NodeKind::Property(prop) => {
                    if let PropertyKey::Ident(name) | PropertyKey::String(name) = &prop.key {
                        result.insert(name);
                    }
                }
                NodeKind::ClassMember(member) => {
                    if let PropertyKey::Ident(name) | PropertyKey::String(name) = &member.key {
                        result.insert(name);
                    }
                }
                _ => {}
            }
        }
        result
    }

    pub fn insert(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(name.to_string());
        }
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
