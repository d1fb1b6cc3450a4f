//! Alias registry and resolver.
//!
//! An alias is a directed edge `alias -> target`, where the target is a
//! canonical option name or another alias. Resolution follows edges until a
//! canonical name is reached.
//!
//! The registry keeps these invariants after every mutation:
//!
//! - no alias name is a canonical option name;
//! - every alias has at most one target;
//! - no chain revisits a name.
//!
//! Mutations are planned first and committed only when the plan is valid, so a
//! rejected [`AliasRegistry::add`] has no observable effect.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashSet;
//! use option_alias_core::AliasRegistry;
//!
//! let canonical: HashSet<String> = ["a".to_string()].into_iter().collect();
//! let mut registry = AliasRegistry::new();
//! registry.add(&canonical, "a", "b").unwrap();
//! registry.add(&canonical, "b", "c").unwrap();
//!
//! assert_eq!(registry.resolve(&canonical, "c").unwrap(), "a");
//! assert_eq!(registry.aliases_of(&canonical, "a"), vec!["b", "c"]);
//! ```

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::validate::validate_name;
use crate::{CanonicalNames, OptionError, Result};

/// A live `alias -> target` edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    /// The secondary name.
    pub alias: String,
    /// Canonical name or alias this entry points at.
    pub target: String,
}

/// Outcome of validating an add, applied by [`AliasRegistry::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddPlan {
    /// A new alias name.
    Insert(AliasEntry),
    /// A live alias pointed at a different target; it moves to the end of the
    /// insertion order.
    Repoint(AliasEntry),
    /// The alias already points at this target.
    Unchanged,
}

/// Instance-owned mapping of alias names to their targets.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    order: Vec<String>,
    targets: HashMap<String, String>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates adding `alias -> existing` without touching the registry.
    ///
    /// Checks run in this order: name validity, `existing` resolves, `alias`
    /// is not canonical, then a simulated walk from `alias` with the candidate
    /// edge in place must reach a canonical name without revisiting anything.
    ///
    /// # Errors
    ///
    /// [`InvalidName`](OptionError::InvalidName),
    /// [`UnknownOption`](OptionError::UnknownOption),
    /// [`AliasConflict`](OptionError::AliasConflict) or
    /// [`CycleDetected`](OptionError::CycleDetected).
    pub fn plan_add<N: CanonicalNames + ?Sized>(
        &self,
        names: &N,
        existing: &str,
        alias: &str,
    ) -> Result<AddPlan> {
        validate_name(alias)?;
        self.resolve(names, existing)?;
        if names.is_canonical(alias) {
            return Err(OptionError::AliasConflict(alias.to_string()));
        }

        let live = self.targets.get(alias);
        if live.map(String::as_str) == Some(existing) {
            return Ok(AddPlan::Unchanged);
        }

        let candidate = AliasEntry {
            alias: alias.to_string(),
            target: existing.to_string(),
        };
        self.walk(names, alias, Some(&candidate))?;

        Ok(if live.is_some() {
            AddPlan::Repoint(candidate)
        } else {
            AddPlan::Insert(candidate)
        })
    }

    /// Applies a plan produced by [`plan_add`](Self::plan_add) on this
    /// registry state.
    pub fn commit(&mut self, plan: AddPlan) {
        match plan {
            AddPlan::Insert(entry) => {
                debug!(alias = %entry.alias, target = %entry.target, "added alias");
                self.order.push(entry.alias.clone());
                self.targets.insert(entry.alias, entry.target);
            }
            AddPlan::Repoint(entry) => {
                debug!(alias = %entry.alias, target = %entry.target, "re-pointed alias");
                self.order.retain(|name| *name != entry.alias);
                self.order.push(entry.alias.clone());
                self.targets.insert(entry.alias, entry.target);
            }
            AddPlan::Unchanged => {}
        }
    }

    /// Registers `alias` as a secondary name for `existing`.
    ///
    /// # Errors
    ///
    /// See [`plan_add`](Self::plan_add); on error the registry is unchanged.
    pub fn add<N: CanonicalNames + ?Sized>(
        &mut self,
        names: &N,
        existing: &str,
        alias: &str,
    ) -> Result<()> {
        let plan = self.plan_add(names, existing, alias)?;
        self.commit(plan);
        Ok(())
    }

    /// Removes exactly the entry keyed by `alias`.
    ///
    /// Aliases that pointed through it are left dangling and stop resolving.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownAlias`](OptionError::UnknownAlias) if `alias` is not
    /// a live alias.
    pub fn remove(&mut self, alias: &str) -> Result<AliasEntry> {
        let target = self
            .targets
            .remove(alias)
            .ok_or_else(|| OptionError::UnknownAlias(alias.to_string()))?;
        self.order.retain(|name| name != alias);
        debug!(alias, target = %target, "removed alias");
        Ok(AliasEntry {
            alias: alias.to_string(),
            target,
        })
    }

    /// Resolves `name` to the canonical name its chain ends at.
    ///
    /// Canonical names resolve to themselves.
    ///
    /// # Errors
    ///
    /// [`UnknownOption`](OptionError::UnknownOption) if the name (or a hop in
    /// its chain) is neither canonical nor a live alias;
    /// [`CycleDetected`](OptionError::CycleDetected) if the chain loops.
    pub fn resolve<'a, N: CanonicalNames + ?Sized>(
        &'a self,
        names: &N,
        name: &'a str,
    ) -> Result<&'a str> {
        self.walk(names, name, None)
    }

    /// Iterative chain walk, optionally with one extra edge overlaid.
    fn walk<'a, N: CanonicalNames + ?Sized>(
        &'a self,
        names: &N,
        start: &'a str,
        pending: Option<&'a AliasEntry>,
    ) -> Result<&'a str> {
        let mut chain: Vec<&str> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = start;

        loop {
            if names.is_canonical(current) {
                return Ok(current);
            }
            chain.push(current);
            if !visited.insert(current) {
                return Err(OptionError::CycleDetected(chain.join(" -> ")));
            }

            let next = match pending {
                Some(entry) if entry.alias == current => Some(entry.target.as_str()),
                _ => self.target_of(current),
            };
            current = next.ok_or_else(|| OptionError::UnknownOption(start.to_string()))?;
        }
    }

    /// Returns the live aliases resolving to exactly `canonical`, in
    /// insertion order.
    ///
    /// Dangling aliases are skipped.
    pub fn aliases_of<N: CanonicalNames + ?Sized>(&self, names: &N, canonical: &str) -> Vec<&str> {
        self.order
            .iter()
            .map(String::as_str)
            .filter(|alias| match self.resolve(names, alias) {
                Ok(root) => root == canonical,
                Err(err) => {
                    debug!(alias, %err, "skipping unresolvable alias");
                    false
                }
            })
            .collect()
    }

    /// Returns the direct target of a live alias.
    pub fn target_of(&self, alias: &str) -> Option<&str> {
        self.targets.get(alias).map(String::as_str)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.targets.contains_key(alias)
    }

    /// Whether any stored entry, live or dangling, points at `name`.
    pub fn is_referenced(&self, name: &str) -> bool {
        self.targets.values().any(|target| target == name)
    }

    /// Number of entries that currently resolve to a canonical name.
    pub fn resolvable_len<N: CanonicalNames + ?Sized>(&self, names: &N) -> usize {
        self.order
            .iter()
            .filter(|alias| self.resolve(names, alias).is_ok())
            .count()
    }

    /// Iterates live entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order.iter().filter_map(|alias| {
            self.targets
                .get(alias)
                .map(|target| (alias.as_str(), target.as_str()))
        })
    }

    /// Number of stored entries, dangling ones included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
