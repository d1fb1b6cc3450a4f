//! Command-line tokenizer and parse results.
//!
//! Every option name seen on the command line, and every name later used to
//! query a [`ParseResult`], goes through alias resolution first. A value set
//! through an alias is therefore visible through the short form, the long form
//! and every other alias of the same option.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::{
    AliasRegistry, FromValue, OptionError, OptionIndex, OptionSpec, OptionTable, Result, Value,
};

/// Parser behaviour set on [`Options`](crate::Options).
#[derive(Debug, Clone, Default)]
pub struct ParseSettings {
    /// Option names (canonical or alias) that receive positional arguments,
    /// one argument each, in order.
    pub positional: Vec<String>,
    /// Collect unknown options in [`ParseResult::unmatched`] instead of
    /// failing.
    pub allow_unrecognised: bool,
}

/// One option occurrence, with the name as it was typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValue {
    /// Option name without dashes (may be an alias).
    pub key: String,
    /// Raw argument text (`true` for flags).
    pub value: String,
}

#[derive(Debug, Clone)]
struct Slot {
    value: Value,
    count: usize,
}

/// Values produced by [`Options::parse`](crate::Options::parse).
///
/// Holds a snapshot of the option table and alias registry taken at parse
/// time; later changes to the [`Options`](crate::Options) do not affect it.
#[derive(Debug, Clone)]
pub struct ParseResult {
    table: OptionTable,
    aliases: AliasRegistry,
    values: HashMap<OptionIndex, Slot>,
    arguments: Vec<KeyValue>,
    unmatched: Vec<String>,
}

impl ParseResult {
    fn index_for(&self, name: &str) -> Result<OptionIndex> {
        let canonical = self.aliases.resolve(&self.table, name)?;
        self.table
            .index_of(canonical)
            .ok_or_else(|| OptionError::UnknownOption(name.to_string()))
    }

    /// Returns the stored value for any name of an option.
    ///
    /// # Errors
    ///
    /// [`UnknownOption`](OptionError::UnknownOption) if the name does not
    /// resolve, [`MissingValue`](OptionError::MissingValue) if the option was
    /// not supplied and has no default.
    pub fn value(&self, name: &str) -> Result<&Value> {
        let index = self.index_for(name)?;
        self.values
            .get(&index)
            .map(|slot| &slot.value)
            .ok_or_else(|| OptionError::MissingValue(name.to_string()))
    }

    /// Returns the stored value converted to `T`.
    ///
    /// # Errors
    ///
    /// As [`value`](Self::value), plus
    /// [`TypeMismatch`](OptionError::TypeMismatch) if the stored value is of
    /// another kind.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.value(name)?;
        T::from_value(value).ok_or_else(|| OptionError::TypeMismatch {
            option: name.to_string(),
            actual: value.kind(),
        })
    }

    /// Number of times the option appeared on the command line.
    ///
    /// Defaults do not count. Unresolvable names count zero.
    pub fn count(&self, name: &str) -> usize {
        self.index_for(name)
            .ok()
            .and_then(|index| self.values.get(&index))
            .map_or(0, |slot| slot.count)
    }

    /// Returns `true` if the option has a value (supplied or default).
    pub fn contains(&self, name: &str) -> bool {
        self.value(name).is_ok()
    }

    /// Option occurrences in command-line order.
    pub fn arguments(&self) -> &[KeyValue] {
        &self.arguments
    }

    /// Arguments not consumed by any option.
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    /// Iterates options holding a value, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&OptionSpec, &Value)> {
        self.table.iter().filter_map(|(index, spec)| {
            self.values.get(&index).map(|slot| (spec, &slot.value))
        })
    }
}

/// Single-use tokenizer over one argument vector.
pub(crate) struct Parser<'a> {
    table: &'a OptionTable,
    aliases: &'a AliasRegistry,
    settings: &'a ParseSettings,
    values: HashMap<OptionIndex, Slot>,
    arguments: Vec<KeyValue>,
    unmatched: Vec<String>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        table: &'a OptionTable,
        aliases: &'a AliasRegistry,
        settings: &'a ParseSettings,
    ) -> Self {
        Self {
            table,
            aliases,
            settings,
            values: HashMap::new(),
            arguments: Vec::new(),
            unmatched: Vec::new(),
        }
    }

    /// Parses `args`, whose first element is the program name.
    pub(crate) fn run(mut self, args: &[String]) -> Result<ParseResult> {
        let mut positional = Vec::new();
        let mut i = 1;

        while let Some(arg) = args.get(i) {
            i += 1;
            if arg == "--" {
                positional.extend(args.iter().skip(i).cloned());
                break;
            }
            if let Some(body) = arg.strip_prefix("--").filter(|b| !b.is_empty()) {
                self.long_option(arg, body, args, &mut i)?;
            } else if let Some(body) = arg.strip_prefix('-').filter(|b| !b.is_empty()) {
                self.short_options(body, args, &mut i)?;
            } else {
                positional.push(arg.clone());
            }
        }

        self.route_positional(positional)?;
        self.apply_defaults()?;

        Ok(ParseResult {
            table: self.table.clone(),
            aliases: self.aliases.clone(),
            values: self.values,
            arguments: self.arguments,
            unmatched: self.unmatched,
        })
    }

    /// Resolves a command-line name; `Ok(None)` means unknown.
    fn lookup(&self, name: &str) -> Result<Option<(OptionIndex, &'a OptionSpec)>> {
        let canonical = match self.aliases.resolve(self.table, name) {
            Ok(canonical) => canonical,
            Err(OptionError::UnknownOption(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        let table = self.table;
        Ok(table
            .index_of(canonical)
            .and_then(|index| table.get(index).map(|spec| (index, spec))))
    }

    fn unknown(&mut self, arg: &str, name: &str) -> Result<()> {
        if self.settings.allow_unrecognised {
            debug!(arg, "collecting unrecognised option");
            self.unmatched.push(arg.to_string());
            Ok(())
        } else {
            Err(OptionError::UnknownOption(name.to_string()))
        }
    }

    fn long_option(&mut self, arg: &str, body: &str, args: &[String], i: &mut usize) -> Result<()> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let Some((index, spec)) = self.lookup(name)? else {
            return self.unknown(arg, name);
        };

        if !spec.takes_value() {
            if inline.is_some() {
                return Err(OptionError::UnexpectedArgument(name.to_string()));
            }
            return self.store(index, spec, name, "true");
        }

        match inline {
            Some(value) => self.store(index, spec, name, value),
            None => {
                let value = self.argument_for(spec, name, args, i)?;
                self.store(index, spec, name, &value)
            }
        }
    }

    fn short_options(
        &mut self,
        body: &str,
        args: &[String],
        i: &mut usize,
    ) -> Result<()> {
        for (pos, ch) in body.char_indices() {
            let mut buf = [0u8; 4];
            let name: &str = ch.encode_utf8(&mut buf);
            let Some((index, spec)) = self.lookup(name)? else {
                self.unknown(&format!("-{name}"), name)?;
                continue;
            };

            if !spec.takes_value() {
                self.store(index, spec, name, "true")?;
                continue;
            }

            let rest = body.get(pos + ch.len_utf8()..).unwrap_or_default();
            if rest.is_empty() {
                let value = self.argument_for(spec, name, args, i)?;
                return self.store(index, spec, name, &value);
            }
            return self.store(index, spec, name, rest);
        }
        Ok(())
    }

    /// Implicit value if defined, otherwise the next argument.
    fn argument_for(
        &self,
        spec: &OptionSpec,
        name: &str,
        args: &[String],
        i: &mut usize,
    ) -> Result<String> {
        if let Some(implicit) = &spec.implicit_value {
            return Ok(implicit.clone());
        }
        let value = args
            .get(*i)
            .cloned()
            .ok_or_else(|| OptionError::MissingArgument(name.to_string()))?;
        *i += 1;
        Ok(value)
    }

    fn store(&mut self, index: OptionIndex, spec: &OptionSpec, name: &str, raw: &str) -> Result<()> {
        let value = spec
            .kind
            .parse(raw)
            .ok_or_else(|| OptionError::InvalidValue {
                option: name.to_string(),
                value: raw.to_string(),
                kind: spec.kind,
            })?;
        debug!(option = spec.display_name(), typed = name, %value, "stored value");

        let slot = self.values.entry(index).or_insert(Slot {
            value: value.clone(),
            count: 0,
        });
        slot.value = value;
        slot.count += 1;
        self.arguments.push(KeyValue {
            key: name.to_string(),
            value: raw.to_string(),
        });
        Ok(())
    }

    fn route_positional(&mut self, positional: Vec<String>) -> Result<()> {
        let settings = self.settings;
        let mut targets = settings.positional.iter();
        for arg in positional {
            let Some(name) = targets.next() else {
                self.unmatched.push(arg);
                continue;
            };
            let (index, spec) = self
                .lookup(name)?
                .ok_or_else(|| OptionError::UnknownOption(name.clone()))?;
            self.store(index, spec, name, &arg)?;
        }
        Ok(())
    }

    /// Fills unset options from their defaults; flags default to `false`.
    fn apply_defaults(&mut self) -> Result<()> {
        for (index, spec) in self.table.iter() {
            if self.values.contains_key(&index) {
                continue;
            }
            let value = match (&spec.default_value, spec.takes_value()) {
                (Some(raw), _) => spec.kind.parse(raw).ok_or_else(|| OptionError::InvalidValue {
                    option: spec.display_name().to_string(),
                    value: raw.clone(),
                    kind: spec.kind,
                })?,
                (None, false) => Value::Bool(false),
                (None, true) => continue,
            };
            self.values.insert(index, Slot { value, count: 0 });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{OptionSpec, Options, ValueKind};

    use super::*;

    fn sample() -> Options {
        let mut options = Options::new("prog", "test program");
        options
            .add_option(OptionSpec::boolean(Some("v"), Some("verbose")))
            .unwrap();
        options
            .add_option(OptionSpec::boolean(Some("q"), Some("quiet")))
            .unwrap();
        options
            .add_option(OptionSpec::with_value(
                Some("o"),
                Some("output"),
                ValueKind::String,
            ))
            .unwrap();
        options
            .add_option(
                OptionSpec::with_value(Some("n"), Some("count"), ValueKind::Integer)
                    .with_default("1"),
            )
            .unwrap();
        options
    }

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("prog")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_long_forms() {
        let options = sample();
        let result = options.parse(argv(&["--verbose", "--output=a.txt", "--count", "3"])).unwrap();

        assert!(result.get::<bool>("v").unwrap());
        assert_eq!(result.get::<String>("o").unwrap(), "a.txt");
        assert_eq!(result.get::<i64>("count").unwrap(), 3);
    }

    #[test]
    fn test_grouped_short_flags_and_attached_value() {
        let options = sample();
        let result = options.parse(argv(&["-vqoout.txt"])).unwrap();

        assert!(result.get::<bool>("verbose").unwrap());
        assert!(result.get::<bool>("quiet").unwrap());
        assert_eq!(result.get::<String>("output").unwrap(), "out.txt");
    }

    #[test]
    fn test_short_value_takes_next_argument() {
        let options = sample();
        let result = options.parse(argv(&["-o", "-weird-name"])).unwrap();
        assert_eq!(result.get::<String>("output").unwrap(), "-weird-name");
    }

    #[test]
    fn test_defaults_and_counts() {
        let options = sample();
        let result = options.parse(argv(&["-v", "-v"])).unwrap();

        assert_eq!(result.count("v"), 2);
        assert_eq!(result.count("n"), 0);
        assert_eq!(result.get::<i64>("n").unwrap(), 1);
        assert!(!result.get::<bool>("quiet").unwrap());
        assert_eq!(
            result.value("output"),
            Err(OptionError::MissingValue("output".to_string()))
        );
    }

    #[test]
    fn test_terminator_and_unmatched_positionals() {
        let options = sample();
        let result = options.parse(argv(&["file1", "--", "-v"])).unwrap();

        assert_eq!(result.unmatched(), ["file1".to_string(), "-v".to_string()]);
        assert_eq!(result.count("verbose"), 0);
    }

    #[test]
    fn test_missing_argument() {
        let options = sample();
        assert_eq!(
            options.parse(argv(&["--output"])).unwrap_err(),
            OptionError::MissingArgument("output".to_string())
        );
    }

    #[test]
    fn test_flag_rejects_inline_argument() {
        let options = sample();
        assert_eq!(
            options.parse(argv(&["--verbose=yes"])).unwrap_err(),
            OptionError::UnexpectedArgument("verbose".to_string())
        );
    }

    #[test]
    fn test_invalid_value() {
        let options = sample();
        assert_eq!(
            options.parse(argv(&["-n", "lots"])).unwrap_err(),
            OptionError::InvalidValue {
                option: "n".to_string(),
                value: "lots".to_string(),
                kind: ValueKind::Integer,
            }
        );
    }

    #[test]
    fn test_unknown_option_fails_unless_allowed() {
        let mut options = sample();
        assert_eq!(
            options.parse(argv(&["--nope"])).unwrap_err(),
            OptionError::UnknownOption("nope".to_string())
        );

        options.allow_unrecognised_options();
        let result = options.parse(argv(&["--nope", "-x", "-v"])).unwrap();
        assert_eq!(result.unmatched(), ["--nope".to_string(), "-x".to_string()]);
        assert!(result.get::<bool>("v").unwrap());
    }

    #[test]
    fn test_unknown_char_in_group_is_collected_alone() {
        let mut options = sample();
        options.allow_unrecognised_options();
        let result = options.parse(argv(&["-vxq"])).unwrap();

        assert_eq!(result.unmatched(), ["-x".to_string()]);
        assert_eq!(result.count("v"), 1);
        assert!(result.get::<bool>("quiet").unwrap());
    }

    #[test]
    fn test_type_mismatch() {
        let options = sample();
        let result = options.parse(argv(&["-v"])).unwrap();
        assert_eq!(
            result.get::<String>("v").unwrap_err(),
            OptionError::TypeMismatch {
                option: "v".to_string(),
                actual: ValueKind::Bool,
            }
        );
    }

    #[test]
    fn test_implicit_value() {
        let mut options = Options::new("prog", "");
        options
            .add_option(
                OptionSpec::with_value(None, Some("color"), ValueKind::String)
                    .with_implicit("always"),
            )
            .unwrap();

        let result = options.parse(argv(&["--color", "file"])).unwrap();
        assert_eq!(result.get::<String>("color").unwrap(), "always");
        assert_eq!(result.unmatched(), ["file".to_string()]);

        let result = options.parse(argv(&["--color=never"])).unwrap();
        assert_eq!(result.get::<String>("color").unwrap(), "never");
    }

    #[test]
    fn test_positional_routing() {
        let mut options = sample();
        options
            .add_option(OptionSpec::with_value(None, Some("input"), ValueKind::String))
            .unwrap();
        options.add_alias("input", "src").unwrap();
        options.parse_positional(["src", "output"]);

        let result = options.parse(argv(&["in.txt", "out.txt", "extra"])).unwrap();
        assert_eq!(result.get::<String>("input").unwrap(), "in.txt");
        assert_eq!(result.get::<String>("o").unwrap(), "out.txt");
        assert_eq!(result.unmatched(), ["extra".to_string()]);
    }

    #[test]
    fn test_arguments_keep_typed_names() {
        let mut options = sample();
        options.add_alias("o", "target").unwrap();
        let result = options.parse(argv(&["--target", "t.txt", "-v"])).unwrap();

        let keys: Vec<_> = result.arguments().iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys, vec!["target", "v"]);
    }

    #[test]
    fn test_result_is_a_snapshot() {
        let mut options = sample();
        options.add_alias("v", "V").unwrap();
        let result = options.parse(argv(&["-V"])).unwrap();

        options.remove_alias("V").unwrap();
        assert!(result.get::<bool>("V").unwrap());
    }

    #[test]
    fn test_last_occurrence_wins() {
        let options = sample();
        let result = options.parse(argv(&["-o", "a", "--output", "b"])).unwrap();
        assert_eq!(result.get::<String>("output").unwrap(), "b");
        assert_eq!(result.count("o"), 2);
    }
}
