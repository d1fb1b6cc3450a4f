//! Option definitions and parsed values.
//!
//! These types describe what an option looks like before parsing
//! ([`OptionSpec`], [`ValueKind`]) and what a parse produced ([`Value`]).
//! They serialize with [`serde`] so option sets can be declared in YAML or
//! JSON files (see [`OptionsConfig`](crate::OptionsConfig)).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of value an option accepts.
///
/// # Examples
///
/// ```
/// use option_alias_core::{Value, ValueKind};
///
/// assert_eq!(ValueKind::default(), ValueKind::Bool);
/// assert_eq!(ValueKind::Integer.parse("42"), Some(Value::Integer(42)));
/// assert_eq!(ValueKind::Bool.parse("maybe"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Flag with no argument; presence stores `true` (the default).
    #[default]
    Bool,
    /// Free-form text.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
}

impl ValueKind {
    /// Returns `true` if options of this kind consume an argument.
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::Bool)
    }

    /// Parses raw argument text into a [`Value`] of this kind.
    ///
    /// Booleans accept `true`/`t`/`yes`/`1` and `false`/`f`/`no`/`0`,
    /// ignoring case.
    pub fn parse(self, raw: &str) -> Option<Value> {
        match self {
            Self::Bool => parse_bool(raw).map(Value::Bool),
            Self::String => Some(Value::String(raw.to_string())),
            Self::Integer => raw.trim().parse().ok().map(Value::Integer),
            Self::Float => raw.trim().parse().ok().map(Value::Float),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
        };
        f.write_str(name)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "1" => Some(true),
        "false" | "f" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// A parsed option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag state.
    Bool(bool),
    /// Integer argument.
    Integer(i64),
    /// Float argument.
    Float(f64),
    /// Text argument.
    String(String),
}

impl Value {
    /// Returns the kind this value was parsed as.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Typed extraction from a stored [`Value`].
///
/// Implemented for the Rust types matching each [`ValueKind`]; used by
/// [`ParseResult::get`](crate::ParseResult::get).
pub trait FromValue: Sized {
    /// Converts the value, or returns `None` on a kind mismatch.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(String::from)
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

/// Definition of a single command-line option.
///
/// An option has an optional short form (a single character, e.g. `v`) and/or
/// a long form (e.g. `version`). Names are stored bare, without dashes. Both
/// forms denote the same option.
///
/// Use [`boolean`](OptionSpec::boolean) and
/// [`with_value`](OptionSpec::with_value) to create options, then chain
/// builder methods.
///
/// # Examples
///
/// ```
/// use option_alias_core::{OptionSpec, ValueKind};
///
/// let version = OptionSpec::boolean(Some("v"), Some("version"))
///     .with_description("Print version");
/// assert_eq!(version.display_name(), "version");
/// assert!(!version.takes_value());
///
/// let output = OptionSpec::with_value(Some("o"), Some("output"), ValueKind::String)
///     .with_arg_name("FILE");
/// assert!(output.takes_value());
/// assert_eq!(output.names().collect::<Vec<_>>(), vec!["o", "output"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Help group; the empty group renders first without a header.
    #[serde(default)]
    pub group: String,
    /// Short form (e.g. "o")
    #[serde(default)]
    pub short: Option<String>,
    /// Long form (e.g. "output")
    #[serde(default)]
    pub long: Option<String>,
    /// Description shown in help
    #[serde(default)]
    pub description: Option<String>,
    /// Type of value this option accepts
    #[serde(default)]
    pub kind: ValueKind,
    /// Value used when the option is absent, in argument text form
    #[serde(default)]
    pub default_value: Option<String>,
    /// Value used when a value-taking option is given without an argument
    #[serde(default)]
    pub implicit_value: Option<String>,
    /// Argument label for help (defaults to `arg`)
    #[serde(default)]
    pub arg_name: Option<String>,
}

impl OptionSpec {
    /// Creates a boolean flag.
    pub fn boolean(short: Option<&str>, long: Option<&str>) -> Self {
        Self::with_value(short, long, ValueKind::Bool)
    }

    /// Creates an option of the given kind.
    pub fn with_value(short: Option<&str>, long: Option<&str>, kind: ValueKind) -> Self {
        Self {
            group: String::new(),
            short: short.map(String::from),
            long: long.map(String::from),
            description: None,
            kind,
            default_value: None,
            implicit_value: None,
            arg_name: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets the default value, in argument text form.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Sets the implicit value, in argument text form.
    pub fn with_implicit(mut self, value: &str) -> Self {
        self.implicit_value = Some(value.to_string());
        self
    }

    /// Sets the argument label shown in help.
    pub fn with_arg_name(mut self, name: &str) -> Self {
        self.arg_name = Some(name.to_string());
        self
    }

    /// Places the option in a help group.
    pub fn in_group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    pub fn takes_value(&self) -> bool {
        self.kind.takes_value()
    }

    /// Returns the defined names, short form first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.short.as_deref().into_iter().chain(self.long.as_deref())
    }

    /// Returns the long form if present, else the short form.
    pub fn display_name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or("unknown")
    }

    /// Checks if this option is named `name` (short or long form).
    pub fn matches(&self, name: &str) -> bool {
        self.short.as_deref() == Some(name) || self.long.as_deref() == Some(name)
    }
}
