//! Canonical option table.
//!
//! Maps every canonical name (short and long forms) to the option record it
//! denotes. The alias core only sees the table through [`CanonicalNames`].

use std::collections::HashMap;

use tracing::debug;

use crate::validate::validate_spec;
use crate::{OptionError, OptionSpec, Result};

/// Index of an option record in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionIndex(usize);

impl OptionIndex {
    /// Returns the declaration position of the record.
    pub fn position(self) -> usize {
        self.0
    }
}

/// Lookup of canonical option names.
///
/// The alias registry validates and resolves against any implementor, so it
/// does not depend on how options are actually stored.
pub trait CanonicalNames {
    /// Returns `true` if `name` is the short or long form of a defined option.
    fn is_canonical(&self, name: &str) -> bool;
}

impl<S: std::hash::BuildHasher> CanonicalNames for std::collections::HashSet<String, S> {
    fn is_canonical(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Option records in declaration order, indexed by short and long name.
///
/// # Examples
///
/// ```
/// use option_alias_core::{CanonicalNames, OptionSpec, OptionTable};
///
/// let mut table = OptionTable::new();
/// let idx = table.insert(OptionSpec::boolean(Some("h"), Some("help"))).unwrap();
///
/// assert!(table.is_canonical("h"));
/// assert!(table.is_canonical("help"));
/// assert_eq!(table.index_of("help"), Some(idx));
/// assert!(table.insert(OptionSpec::boolean(Some("h"), None)).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionTable {
    records: Vec<OptionSpec>,
    names: HashMap<String, OptionIndex>,
}

impl OptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends an option record.
    ///
    /// # Errors
    ///
    /// Returns any [`validate_spec`] error, or
    /// [`DuplicateOption`](OptionError::DuplicateOption) if one of its names
    /// is already taken.
    pub fn insert(&mut self, spec: OptionSpec) -> Result<OptionIndex> {
        validate_spec(&spec)?;
        if let Some(taken) = spec.names().find(|name| self.names.contains_key(*name)) {
            return Err(OptionError::DuplicateOption(taken.to_string()));
        }

        let index = OptionIndex(self.records.len());
        for name in spec.names() {
            self.names.insert(name.to_string(), index);
        }
        debug!(option = spec.display_name(), position = index.0, "registered option");
        self.records.push(spec);
        Ok(index)
    }

    /// Returns the record index a canonical name denotes.
    pub fn index_of(&self, name: &str) -> Option<OptionIndex> {
        self.names.get(name).copied()
    }

    pub fn get(&self, index: OptionIndex) -> Option<&OptionSpec> {
        self.records.get(index.0)
    }

    /// Returns the record a canonical name denotes.
    pub fn record(&self, name: &str) -> Option<&OptionSpec> {
        self.index_of(name).and_then(|index| self.get(index))
    }

    /// Iterates records in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionIndex, &OptionSpec)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, spec)| (OptionIndex(i), spec))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CanonicalNames for OptionTable {
    fn is_canonical(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use crate::ValueKind;

    use super::*;

    #[test]
    fn test_short_and_long_share_a_record() {
        let mut table = OptionTable::new();
        table
            .insert(OptionSpec::boolean(Some("v"), Some("version")))
            .unwrap();
        let output = table
            .insert(OptionSpec::with_value(
                Some("o"),
                Some("output"),
                ValueKind::String,
            ))
            .unwrap();

        assert_eq!(table.index_of("o"), Some(output));
        assert_eq!(table.index_of("output"), Some(output));
        assert_eq!(output.position(), 1);
        assert_eq!(table.record("v").map(OptionSpec::display_name), Some("version"));
    }

    #[test]
    fn test_duplicate_long_name_is_rejected_without_mutation() {
        let mut table = OptionTable::new();
        table
            .insert(OptionSpec::boolean(Some("x"), Some("xray")))
            .unwrap();

        let err = table
            .insert(OptionSpec::boolean(Some("y"), Some("xray")))
            .unwrap_err();
        assert_eq!(err, OptionError::DuplicateOption("xray".to_string()));
        assert_eq!(table.len(), 1);
        assert!(!table.is_canonical("y"));
    }

    #[test]
    fn test_iter_follows_declaration_order() {
        let mut table = OptionTable::new();
        for long in ["alpha", "beta", "gamma"] {
            table.insert(OptionSpec::boolean(None, Some(long))).unwrap();
        }
        let order: Vec<_> = table.iter().map(|(_, spec)| spec.display_name()).collect();
        assert_eq!(order, vec!["alpha", "beta", "gamma"]);
    }
}
