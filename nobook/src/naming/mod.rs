//! Collision-free block naming.
//!
//! Every decode or encode pass owns one [`NameRegistry`]. Registries are never
//! shared between passes, so independent documents cannot affect each other's
//! names.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a taken name is turned into a free one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamePolicy {
    /// `base`, then `base-1`, `base-2`, ...
    #[default]
    Counter,
    /// `base`, then `base-copy`, then `base-copy-1`, `base-copy-2`, ...
    CopySuffix,
}

impl fmt::Display for NamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePolicy::Counter => write!(f, "counter"),
            NamePolicy::CopySuffix => write!(f, "copy-suffix"),
        }
    }
}

/// How the base name for a cell without a name is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnnamedStyle {
    /// `<prefix>-<index>`
    #[default]
    Indexed,
    /// `<prefix>`
    Plain,
}

/// A host-supplied name as it can appear in a marker line.
///
/// Surrounding whitespace is trimmed. `None` if nothing is left or the name
/// still contains whitespace, since such a name would not survive decoding.
pub fn marker_name(name: &str) -> Option<&str> {
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        None
    } else {
        Some(name)
    }
}

/// Base name for the unnamed cell at `index`.
pub fn unnamed_base(prefix: &str, index: usize, style: UnnamedStyle) -> String {
    match style {
        UnnamedStyle::Indexed => format!("{}-{}", prefix, index),
        UnnamedStyle::Plain => prefix.to_string(),
    }
}

/// Return `base` if free, otherwise the first free variant under `policy`.
///
/// Does not insert the result into `used`. The counter is unbounded, so the
/// search ends after at most `used.len() + 1` candidates.
pub fn unique_name(base: &str, used: &HashSet<String>, policy: NamePolicy) -> String {
    if !used.contains(base) {
        return base.to_string();
    }
    let stem = match policy {
        NamePolicy::Counter => base.to_string(),
        NamePolicy::CopySuffix => {
            let copy = format!("{}-copy", base);
            if !used.contains(&copy) {
                return copy;
            }
            copy
        }
    };
    let mut i: u64 = 1;
    loop {
        let candidate = format!("{}-{}", stem, i);
        if !used.contains(&candidate) {
            return candidate;
        }
        i += 1;
    }
}

/// The set of names taken during a single pass.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
    policy: NamePolicy,
}

impl NameRegistry {
    pub fn new(policy: NamePolicy) -> Self {
        NameRegistry {
            used: HashSet::new(),
            policy,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Record `name` as taken. Returns false if it already was.
    pub fn insert(&mut self, name: &str) -> bool {
        self.used.insert(name.to_string())
    }

    /// Resolve `base` to a free name and take it.
    pub fn claim(&mut self, base: &str) -> String {
        let name = unique_name(base, &self.used, self.policy);
        if name != base {
            log::debug!("block name '{}' taken, using '{}'", base, name);
        }
        self.used.insert(name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
