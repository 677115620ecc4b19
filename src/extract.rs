use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use crate::alias::AliasTable;
use crate::perf_data::Counter;

/// Selects the aliased counters and renders their values.
///
/// Counters without an alias are dropped. With an empty alias table
/// nothing is selected.
pub fn extract<'a, I>(counters: I, aliases: &AliasTable) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a Counter>,
{
    let mut values = BTreeMap::new();
    for counter in counters {
        if let Some(alias) = aliases.alias_for(&counter.name) {
            values.insert(alias.to_string(), counter.value.to_string());
        }
    }
    values
}

/// Writes every counter of one file as `name: value` lines, preceded by
/// the file's path and followed by an empty line.
pub fn dump<'a, I, W>(path: &Path, counters: I, out: &mut W) -> io::Result<()>
where
    I: IntoIterator<Item = &'a Counter>,
    W: Write + ?Sized,
{
    writeln!(out, "{}", path.display())?;
    for counter in counters {
        writeln!(out, "{}: {}", counter.name, counter.value)?;
    }
    writeln!(out)
}
