//! Option table, alias registry and alias-aware parsing.
//!
//! This crate models the options of a command-line program and lets callers
//! register extra names (aliases) that behave exactly like an existing option:
//!
//! - [`OptionSpec`] — an option with short/long forms and a value kind.
//! - [`OptionTable`] — the canonical option names, in declaration order.
//! - [`AliasRegistry`] — `alias -> target` edges, validated against the
//!   table; rejects conflicts with option names and cycles.
//! - [`Options`] — the parser configuration tying both together, with
//!   [`parse`](Options::parse) producing a [`ParseResult`] and
//!   [`help`](Options::help) listing each option's aliases.
//! - [`OptionsConfig`] — YAML/JSON definitions of a whole [`Options`].
//!
//! # Example
//!
//! ```
//! use option_alias_core::*;
//!
//! let mut options = Options::new("app", "Example application");
//! options
//!     .add_option(OptionSpec::boolean(Some("h"), Some("help")).with_description("Print help"))
//!     .unwrap();
//! options.add_alias("h", "?").unwrap();
//! options.add_alias("?", "usage").unwrap();
//!
//! assert_eq!(options.resolve_alias("usage").unwrap(), "h");
//! assert_eq!(options.get_aliases("h").unwrap(), vec!["?", "usage"]);
//! assert!(options.help().contains("aliases: ?, usage"));
//!
//! let err = options.add_alias("h", "help").unwrap_err();
//! assert!(matches!(err, OptionError::AliasConflict(_)));
//! ```

mod alias;
mod config;
mod error;
mod help;
mod options;
mod parse;
mod table;
mod types;
mod validate;

pub use alias::{AddPlan, AliasEntry, AliasRegistry};
pub use config::{AliasSpec, ConfigError, OptionsConfig};
pub use error::{OptionError, Result};
pub use help::{ALIAS_LABEL, HelpRenderer};
pub use options::Options;
pub use parse::{KeyValue, ParseResult, ParseSettings};
pub use table::{CanonicalNames, OptionIndex, OptionTable};
pub use types::*;
pub use validate::{validate_name, validate_spec};
