use std::collections::BTreeMap;

/// Rendered counter values of a whole run, by group and alias.
///
/// Both levels are sorted so the output is stable from run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    groups: BTreeMap<String, BTreeMap<String, String>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds the values of one decoded file into `group`. A value for an
    /// alias that the group already has replaces the old one.
    pub fn merge<I>(&mut self, group: &str, values: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return;
        }
        self.groups
            .entry(group.to_string())
            .or_default()
            .extend(values);
    }

    pub fn get(&self, group: &str, alias: &str) -> Option<&str> {
        self.groups.get(group)?.get(alias).map(String::as_str)
    }

    /// Group names in lexicographic order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
