//! Name validation for options and aliases.
//!
//! Names are stored bare: `o` and `output`, never `-o` or `--output`. These
//! checks run before anything is inserted, so a rejected definition leaves
//! the option table and alias registry untouched.
//!
//! # Examples
//!
//! ```
//! use option_alias_core::*;
//!
//! assert!(validate_name("output").is_ok());
//! assert!(validate_name("?").is_ok());
//! assert_eq!(
//!     validate_name("--output"),
//!     Err(OptionError::InvalidName("--output".to_string()))
//! );
//! ```

use std::collections::HashSet;

use crate::{OptionError, OptionSpec, Result};

/// Validates a single option or alias name.
///
/// # Errors
///
/// Returns [`OptionError::InvalidName`] if the name is empty, starts with a
/// dash, or contains whitespace or `=`.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.starts_with('-')
        || name.chars().any(|c| c.is_whitespace() || c == '=');
    if invalid {
        return Err(OptionError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Validates an option definition in isolation.
///
/// Checks that at least one name is present, that the short form is a single
/// character, that both forms are valid names and distinct, and that default
/// and implicit values parse as the option's kind.
///
/// # Errors
///
/// Returns the first problem found as an [`OptionError`].
pub fn validate_spec(spec: &OptionSpec) -> Result<()> {
    if spec.short.is_none() && spec.long.is_none() {
        return Err(OptionError::MissingOptionName);
    }

    if let Some(short) = &spec.short {
        validate_name(short)?;
        if short.chars().count() != 1 {
            return Err(OptionError::InvalidName(short.clone()));
        }
    }

    if let Some(long) = &spec.long {
        validate_name(long)?;
    }

    let mut seen = HashSet::new();
    for name in spec.names() {
        if !seen.insert(name) {
            return Err(OptionError::DuplicateOption(name.to_string()));
        }
    }

    for raw in spec.default_value.iter().chain(&spec.implicit_value) {
        if spec.kind.parse(raw).is_none() {
            return Err(OptionError::InvalidValue {
                option: spec.display_name().to_string(),
                value: raw.clone(),
                kind: spec.kind,
            });
        }
    }

    Ok(())
}
