//! Reads the performance counters HotSpot JVMs publish in their hsperfdata
//! files (`/tmp/hsperfdata_<user>/<pid>`) and reports selected ones as a
//! Munin multigraph plugin.
//!
//! The pieces, from the bytes up:
//!
//! - [`cursor::ByteCursor`] reads little-endian fields without ever leaving
//!   its buffer.
//! - [`perf_data`] validates the prologue and walks the entry table.
//! - [`extract`] picks the counters named in the [`AliasTable`].
//! - [`ResultTable`] holds the values of all files, by group and alias.
//! - [`render()`] writes the `config` or values output per [`GraphSpec`].

pub mod aggregate;
pub mod alias;
pub mod collect;
pub mod cursor;
pub mod error;
pub mod extract;
pub mod graph;
pub mod perf_data;
pub mod render;
pub mod source;
pub mod writer;

pub use aggregate::ResultTable;
pub use alias::{AliasBinding, AliasTable};
pub use collect::{run, Collector, Invocation};
pub use error::{RunError, SourceError};
pub use graph::GraphSpec;
pub use perf_data::{decode, Counter, CounterValue, PerfData};
pub use render::{render, RenderMode};
pub use source::SourceFile;
pub use writer::PerfDataWriter;
