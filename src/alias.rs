use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Maps raw counter names (`sun.gc.generation.0.used`) to the aliases they
/// are reported under, and remembers which aliases are monotonic counters
/// rather than gauges.
///
/// An empty table means "inspect everything": nothing is selected and every
/// decoded counter is dumped instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    by_counter: BTreeMap<String, String>,
    monotonic: BTreeSet<String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `counter_name` and reports it as `alias`.
    ///
    /// Binding a counter a second time replaces its alias. Binding an alias
    /// that is already used for a different counter is an error, since the
    /// two would overwrite each other in the output.
    pub fn insert(&mut self, binding: AliasBinding) -> Result<(), AliasError> {
        if let Some((existing, _)) = self
            .by_counter
            .iter()
            .find(|(counter, alias)| **alias == binding.alias && **counter != binding.counter_name)
        {
            return Err(AliasError::AliasAlreadyBound {
                alias: binding.alias,
                existing: existing.clone(),
                requested: binding.counter_name,
            });
        }
        if binding.monotonic {
            self.monotonic.insert(binding.alias.clone());
        }
        self.by_counter.insert(binding.counter_name, binding.alias);
        Ok(())
    }

    pub fn alias_for(&self, counter_name: &str) -> Option<&str> {
        self.by_counter.get(counter_name).map(String::as_str)
    }

    /// Whether `alias` was declared with a trailing `+`.
    pub fn is_monotonic(&self, alias: &str) -> bool {
        self.monotonic.contains(alias)
    }

    pub fn is_empty(&self) -> bool {
        self.by_counter.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_counter.len()
    }

    pub fn clear(&mut self) {
        self.by_counter.clear();
        self.monotonic.clear();
    }

    /// Iterates over `(counter_name, alias)` pairs, ordered by counter name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_counter
            .iter()
            .map(|(counter, alias)| (counter.as_str(), alias.as_str()))
    }
}

/// One `alias[+]=counterName` token from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasBinding {
    pub alias: String,
    pub counter_name: String,
    pub monotonic: bool,
}

impl AliasBinding {
    pub fn new(alias: &str, counter_name: &str, monotonic: bool) -> Self {
        AliasBinding {
            alias: alias.to_string(),
            counter_name: counter_name.to_string(),
            monotonic,
        }
    }
}

impl FromStr for AliasBinding {
    type Err = AliasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (alias, counter_name) = s
            .split_once('=')
            .ok_or_else(|| AliasError::MissingEquals(s.to_string()))?;
        let (alias, monotonic) = match alias.strip_suffix('+') {
            Some(alias) => (alias, true),
            None => (alias, false),
        };
        if alias.is_empty() {
            return Err(AliasError::EmptyAlias(s.to_string()));
        }
        if counter_name.is_empty() {
            return Err(AliasError::EmptyCounterName(s.to_string()));
        }
        Ok(AliasBinding::new(alias, counter_name, monotonic))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AliasError {
    #[error("Expected alias=counter, got {0:?}")]
    MissingEquals(String),

    #[error("Missing alias in {0:?}")]
    EmptyAlias(String),

    #[error("Missing counter name in {0:?}")]
    EmptyCounterName(String),

    #[error("Alias {alias:?} is already used for {existing:?}, cannot also use it for {requested:?}")]
    AliasAlreadyBound {
        alias: String,
        existing: String,
        requested: String,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_bindings() {
        assert_eq!(
            "heapUsed=sun.gc.generation.0.used".parse(),
            Ok(AliasBinding::new(
                "heapUsed",
                "sun.gc.generation.0.used",
                false
            ))
        );
        assert_eq!(
            "gcCount+=sun.gc.collector.0.invocations".parse(),
            Ok(AliasBinding::new(
                "gcCount",
                "sun.gc.collector.0.invocations",
                true
            ))
        );
        // Only the first '=' separates.
        assert_eq!(
            "a=b=c".parse(),
            Ok(AliasBinding::new("a", "b=c", false))
        );
        assert!("+=x".parse::<AliasBinding>().is_err());
        assert!("a=".parse::<AliasBinding>().is_err());
        assert!("nothing".parse::<AliasBinding>().is_err());
    }

    #[test]
    fn lookup_and_monotonic_flag() {
        let mut table = AliasTable::new();
        assert!(table.is_empty());
        table
            .insert(AliasBinding::new("heapUsed", "x", false))
            .unwrap();
        table
            .insert(AliasBinding::new("gcCount", "y", true))
            .unwrap();
        assert_eq!(table.alias_for("x"), Some("heapUsed"));
        assert_eq!(table.alias_for("heapUsed"), None);
        assert!(table.is_monotonic("gcCount"));
        assert!(!table.is_monotonic("heapUsed"));
        assert_eq!(table.len(), 2);

        table.clear();
        assert!(table.is_empty());
        assert!(!table.is_monotonic("gcCount"));
    }

    #[test]
    fn alias_used_for_two_counters() {
        let mut table = AliasTable::new();
        table.insert(AliasBinding::new("a", "x", false)).unwrap();
        // Same binding again is fine.
        table.insert(AliasBinding::new("a", "x", false)).unwrap();
        assert_eq!(
            table.insert(AliasBinding::new("a", "y", false)),
            Err(AliasError::AliasAlreadyBound {
                alias: "a".to_string(),
                existing: "x".to_string(),
                requested: "y".to_string(),
            })
        );
        // Rebinding a counter to a new alias replaces the old one.
        table.insert(AliasBinding::new("b", "x", false)).unwrap();
        assert_eq!(table.alias_for("x"), Some("b"));
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![("x", "b")]);
    }
}
