//! The [`Options`] facade: one parser configuration.

use tracing::debug;

use crate::help::HelpRenderer;
use crate::parse::{ParseSettings, Parser};
use crate::{AliasRegistry, CanonicalNames, OptionError, OptionIndex, OptionSpec, OptionTable, ParseResult, Result};

/// A parser configuration: options, their aliases, and parse settings.
///
/// Each instance owns its own option table and alias registry; nothing is
/// shared between instances.
///
/// # Examples
///
/// ```
/// use option_alias_core::{OptionSpec, Options, ValueKind};
///
/// let mut options = Options::new("app", "Example application");
/// options.add_option(OptionSpec::boolean(Some("v"), Some("version"))).unwrap();
/// options
///     .add_option(OptionSpec::with_value(Some("o"), Some("output"), ValueKind::String))
///     .unwrap();
/// options.add_alias("v", "V").unwrap();
/// options.add_alias("output", "target").unwrap();
///
/// let result = options.parse(["app", "-V", "--target", "test.txt"]).unwrap();
/// assert!(result.get::<bool>("version").unwrap());
/// assert_eq!(result.get::<String>("o").unwrap(), "test.txt");
/// assert!(options.help().contains("aliases: target"));
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    program: String,
    description: String,
    positional_help: String,
    table: OptionTable,
    aliases: AliasRegistry,
    settings: ParseSettings,
}

impl Options {
    pub fn new(program: &str, description: &str) -> Self {
        Self {
            program: program.to_string(),
            description: description.to_string(),
            positional_help: String::new(),
            table: OptionTable::new(),
            aliases: AliasRegistry::new(),
            settings: ParseSettings::default(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Defines an option.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed definitions,
    /// [`DuplicateOption`](OptionError::DuplicateOption) if a name is already
    /// an option, or [`AliasConflict`](OptionError::AliasConflict) if a name
    /// is already an alias or the missing hop of a dangling alias.
    pub fn add_option(&mut self, spec: OptionSpec) -> Result<OptionIndex> {
        if let Some(name) = spec
            .names()
            .find(|name| self.aliases.contains(name) || self.is_missing_hop(name))
        {
            return Err(OptionError::AliasConflict(name.to_string()));
        }
        self.table.insert(spec)
    }

    fn is_missing_hop(&self, name: &str) -> bool {
        !self.table.is_canonical(name) && self.aliases.is_referenced(name)
    }

    /// Makes `alias` a secondary name for `existing`.
    ///
    /// `existing` may itself be an alias; chains are followed.
    ///
    /// # Errors
    ///
    /// [`UnknownOption`](OptionError::UnknownOption) if `existing` does not
    /// resolve, [`AliasConflict`](OptionError::AliasConflict) if `alias` is an
    /// option name, [`CycleDetected`](OptionError::CycleDetected) if the new
    /// edge would close a loop, [`InvalidName`](OptionError::InvalidName) for a
    /// malformed alias. The registry is unchanged on error.
    pub fn add_alias(&mut self, existing: &str, alias: &str) -> Result<()> {
        self.aliases.add(&self.table, existing, alias)
    }

    /// Resolves a canonical name or alias to the canonical name it denotes.
    ///
    /// # Errors
    ///
    /// [`UnknownOption`](OptionError::UnknownOption) or
    /// [`CycleDetected`](OptionError::CycleDetected).
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> Result<&'a str> {
        self.aliases.resolve(&self.table, name)
    }

    /// Lists aliases of the canonical name `name` resolves to, in insertion
    /// order.
    ///
    /// # Errors
    ///
    /// [`UnknownOption`](OptionError::UnknownOption) if `name` does not
    /// resolve.
    pub fn get_aliases(&self, name: &str) -> Result<Vec<&str>> {
        let canonical = self.aliases.resolve(&self.table, name)?;
        Ok(self.aliases.aliases_of(&self.table, canonical))
    }

    /// Removes one alias; aliases chained through it stop resolving.
    ///
    /// # Errors
    ///
    /// [`UnknownAlias`](OptionError::UnknownAlias) if `alias` is not a live
    /// alias.
    pub fn remove_alias(&mut self, alias: &str) -> Result<()> {
        self.aliases.remove(alias).map(|_| ())
    }

    /// Returns the option record any name (canonical or alias) denotes.
    ///
    /// # Errors
    ///
    /// As [`resolve_alias`](Self::resolve_alias).
    pub fn option(&self, name: &str) -> Result<&OptionSpec> {
        let canonical = self.resolve_alias(name)?;
        self.table
            .record(canonical)
            .ok_or_else(|| OptionError::UnknownOption(name.to_string()))
    }

    pub fn table(&self) -> &OptionTable {
        &self.table
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Number of aliases that currently resolve to an option.
    pub fn alias_count(&self) -> usize {
        self.aliases.resolvable_len(&self.table)
    }

    /// Routes positional arguments to the named options, one each, in order.
    pub fn parse_positional<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.positional = names.into_iter().map(Into::into).collect();
    }

    /// Sets the text shown after `[OPTION...]` on the usage line.
    pub fn positional_help(&mut self, text: &str) {
        self.positional_help = text.to_string();
    }

    /// Collects unknown options as unmatched arguments instead of failing.
    pub fn allow_unrecognised_options(&mut self) {
        self.settings.allow_unrecognised = true;
    }

    /// Parses an argument vector whose first element is the program name.
    ///
    /// # Errors
    ///
    /// Returns the first tokenizer error; see [`OptionError`].
    pub fn parse<I, S>(&self, args: I) -> Result<ParseResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        debug!(program = %self.program, argc = args.len(), "parsing arguments");
        Parser::new(&self.table, &self.aliases, &self.settings).run(&args)
    }

    /// Renders help for all groups.
    pub fn help(&self) -> String {
        self.renderer().render()
    }

    /// Renders help for the named groups only.
    pub fn help_groups(&self, groups: &[&str]) -> String {
        self.renderer().render_groups(groups)
    }

    fn renderer(&self) -> HelpRenderer<'_> {
        HelpRenderer {
            program: &self.program,
            description: &self.description,
            positional_help: &self.positional_help,
            table: &self.table,
            aliases: &self.aliases,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ValueKind;

    use super::*;

    fn file_options() -> Options {
        let mut options = Options::new("prog", "");
        options
            .add_option(OptionSpec::with_value(Some("f"), Some("file"), ValueKind::String))
            .unwrap();
        options
    }

    #[test]
    fn test_get_aliases_through_any_name() {
        let mut options = file_options();
        options.add_alias("f", "input").unwrap();
        options.add_alias("input", "in").unwrap();

        assert_eq!(options.get_aliases("f").unwrap(), vec!["input", "in"]);
        assert_eq!(options.get_aliases("in").unwrap(), vec!["input", "in"]);
        assert!(options.get_aliases("file").unwrap().is_empty());
        assert_eq!(
            options.get_aliases("nope"),
            Err(OptionError::UnknownOption("nope".to_string()))
        );
    }

    #[test]
    fn test_option_after_alias_cannot_shadow_it() {
        let mut options = file_options();
        options.add_alias("f", "input").unwrap();

        let err = options
            .add_option(OptionSpec::boolean(Some("i"), Some("input")))
            .unwrap_err();
        assert_eq!(err, OptionError::AliasConflict("input".to_string()));
        assert!(!options.table().is_canonical("i"));
    }

    #[test]
    fn test_option_cannot_relink_dangling_aliases() {
        let mut options = Options::new("prog", "");
        options
            .add_option(OptionSpec::boolean(Some("a"), Some("alpha")))
            .unwrap();
        options.add_alias("a", "b").unwrap();
        options.add_alias("b", "c").unwrap();
        options.remove_alias("b").unwrap();

        let err = options
            .add_option(OptionSpec::with_value(None, Some("b"), ValueKind::String))
            .unwrap_err();
        assert_eq!(err, OptionError::AliasConflict("b".to_string()));
        assert!(!options.table().is_canonical("b"));
        assert_eq!(
            options.resolve_alias("c"),
            Err(OptionError::UnknownOption("c".to_string()))
        );
        assert_eq!(options.alias_count(), 0);

        // Restoring the link itself is still allowed.
        options.add_alias("a", "b").unwrap();
        assert_eq!(options.resolve_alias("c").unwrap(), "a");
        assert_eq!(options.alias_count(), 2);
    }

    #[test]
    fn test_option_record_lookup_by_alias() {
        let mut options = file_options();
        options.add_alias("file", "path").unwrap();
        assert_eq!(options.option("path").unwrap().short.as_deref(), Some("f"));
    }

    #[test]
    fn test_instances_do_not_share_aliases() {
        let mut first = file_options();
        let second = file_options();
        first.add_alias("f", "input").unwrap();

        assert!(first.resolve_alias("input").is_ok());
        assert!(second.resolve_alias("input").is_err());
    }
}
