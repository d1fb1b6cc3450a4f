//! Help text rendering.
//!
//! Options render in declaration order, grouped by help group. Each option
//! that has live aliases gets an `(aliases: ...)` clause listing them.

use crate::{AliasRegistry, OptionSpec, OptionTable};

/// Label that introduces the alias list of an option.
pub const ALIAS_LABEL: &str = "aliases: ";

/// Renders help for an option table and its aliases.
#[derive(Debug, Clone, Copy)]
pub struct HelpRenderer<'a> {
    /// Program name for the usage line.
    pub program: &'a str,
    /// Description printed first.
    pub description: &'a str,
    /// Text appended to the usage line (e.g. `<FILE>...`).
    pub positional_help: &'a str,
    pub table: &'a OptionTable,
    pub aliases: &'a AliasRegistry,
}

impl HelpRenderer<'_> {
    /// Renders every group.
    pub fn render(&self) -> String {
        let groups = self.groups();
        self.render_groups(&groups)
    }

    /// Renders only the named groups, in the order given.
    pub fn render_groups(&self, groups: &[&str]) -> String {
        let mut out = String::new();
        if !self.description.is_empty() {
            out.push_str(self.description);
            out.push('\n');
        }
        out.push_str("Usage:\n  ");
        out.push_str(self.program);
        out.push_str(" [OPTION...]");
        if !self.positional_help.is_empty() {
            out.push(' ');
            out.push_str(self.positional_help);
        }
        out.push('\n');

        let rows: Vec<(&str, String, String)> = self
            .table
            .iter()
            .filter(|(_, spec)| groups.contains(&spec.group.as_str()))
            .map(|(_, spec)| (spec.group.as_str(), option_column(spec), self.description_column(spec)))
            .collect();
        let width = rows.iter().map(|(_, col, _)| col.chars().count()).max().unwrap_or(0) + 2;

        for group in groups {
            let mut group_rows = rows.iter().filter(|(g, _, _)| g == group).peekable();
            if group_rows.peek().is_none() {
                continue;
            }
            out.push('\n');
            if !group.is_empty() {
                out.push_str(&format!(" {group} options:\n"));
            }
            for (_, col, desc) in group_rows {
                let line = format!("  {col:<width$}{desc}");
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }
        out
    }

    /// Group names in order of first declaration.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for (_, spec) in self.table.iter() {
            if !groups.contains(&spec.group.as_str()) {
                groups.push(spec.group.as_str());
            }
        }
        groups
    }

    /// Returns `aliases: a, b` for an option with live aliases.
    ///
    /// Aliases rooted at the short form come first, then those rooted at the
    /// long form, each in insertion order.
    pub fn alias_clause(&self, spec: &OptionSpec) -> Option<String> {
        let names: Vec<&str> = spec
            .names()
            .flat_map(|name| self.aliases.aliases_of(self.table, name))
            .collect();
        if names.is_empty() {
            return None;
        }
        Some(format!("{ALIAS_LABEL}{}", names.join(", ")))
    }

    fn description_column(&self, spec: &OptionSpec) -> String {
        let mut desc = spec.description.clone().unwrap_or_default();
        if spec.takes_value() {
            if let Some(default) = &spec.default_value {
                push_clause(&mut desc, &format!("(default: {default})"));
            }
        }
        if let Some(clause) = self.alias_clause(spec) {
            push_clause(&mut desc, &format!("({clause})"));
        }
        desc
    }
}

fn push_clause(desc: &mut String, clause: &str) {
    if !desc.is_empty() {
        desc.push(' ');
    }
    desc.push_str(clause);
}

/// `-s, --long arg` column.
fn option_column(spec: &OptionSpec) -> String {
    let mut col = match (&spec.short, &spec.long) {
        (Some(short), Some(long)) => format!("-{short}, --{long}"),
        (Some(short), None) => format!("-{short}"),
        (None, Some(long)) => format!("    --{long}"),
        (None, None) => String::new(),
    };
    if spec.takes_value() {
        let arg = spec.arg_name.as_deref().unwrap_or("arg");
        match &spec.implicit_value {
            Some(implicit) => col.push_str(&format!(" [={arg}(={implicit})]")),
            None => {
                col.push(' ');
                col.push_str(arg);
            }
        }
    }
    col
}
