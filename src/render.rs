use std::io::{self, Write};

use crate::aggregate::ResultTable;
use crate::alias::AliasTable;
use crate::graph::GraphSpec;

/// Munin category all graphs are filed under.
pub const GRAPH_CATEGORY: &str = "hsperf";

/// The two passes of the Munin plugin protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// `plugin config`: declare graphs and fields.
    Config,
    /// `plugin`: report the current values.
    Values,
}

/// Writes one `multigraph` block per graph, in the order given.
pub fn render<W>(
    graphs: &[GraphSpec],
    table: &ResultTable,
    aliases: &AliasTable,
    mode: RenderMode,
    out: &mut W,
) -> io::Result<()>
where
    W: Write + ?Sized,
{
    for graph in graphs {
        writeln!(out, "multigraph hsperf_{}", graph.name)?;
        match mode {
            RenderMode::Config => render_config(graph, table, aliases, out)?,
            RenderMode::Values => render_values(graph, table, out)?,
        }
        writeln!(out)?;
    }
    Ok(())
}

fn render_config<W>(
    graph: &GraphSpec,
    table: &ResultTable,
    aliases: &AliasTable,
    out: &mut W,
) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out, "graph_title {}", graph.title)?;
    writeln!(out, "graph_vlabel {}", graph.vlabel)?;
    writeln!(out, "graph_category {}", GRAPH_CATEGORY)?;
    for group in table.groups() {
        for alias in &graph.aliases {
            writeln!(out, "{group}_{alias}.label {group} {alias}")?;
            if aliases.is_monotonic(alias) {
                writeln!(out, "{group}_{alias}.type COUNTER")?;
                writeln!(out, "{group}_{alias}.min 0")?;
            }
        }
    }
    Ok(())
}

fn render_values<W>(graph: &GraphSpec, table: &ResultTable, out: &mut W) -> io::Result<()>
where
    W: Write + ?Sized,
{
    for group in table.groups() {
        for alias in &graph.aliases {
            // Counters missing from this JVM are left out, not zero filled.
            if let Some(value) = table.get(group, alias) {
                writeln!(out, "{group}_{alias}.value {value}")?;
            }
        }
    }
    Ok(())
}
