use std::io::Write;
use std::path::{Path, PathBuf};

use crate::aggregate::ResultTable;
use crate::alias::AliasTable;
use crate::error::{RunError, SourceError};
use crate::extract::{dump, extract};
use crate::graph::GraphSpec;
use crate::perf_data;
use crate::render::{render, RenderMode};
use crate::source::{discover, read_source, SourceFile};

/// Everything one plugin invocation was asked to do.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub mode: RenderMode,
    /// Dump every counter of every file instead of rendering graphs.
    pub show_props: bool,
    pub aliases: AliasTable,
    pub graphs: Vec<GraphSpec>,
    pub folders: Vec<PathBuf>,
}

/// Decodes hsperfdata files one after the other and folds the selected
/// counters into a [`ResultTable`].
pub struct Collector<'a> {
    aliases: &'a AliasTable,
    table: ResultTable,
    files_read: usize,
}

impl<'a> Collector<'a> {
    pub fn new(aliases: &'a AliasTable) -> Self {
        Collector {
            aliases,
            table: ResultTable::new(),
            files_read: 0,
        }
    }

    /// Reads and decodes one file. With an empty alias table the counters
    /// are dumped to `inspect` instead of being collected.
    pub fn collect_file<W>(&mut self, source: &SourceFile, inspect: &mut W) -> Result<(), RunError>
    where
        W: Write + ?Sized,
    {
        let data = read_source(&source.path)?;
        let counters = perf_data::decode(&data)
            .map_err(|err| SourceError::from_format(&source.path, err))?;
        self.files_read += 1;
        log::debug!(
            "Decoded {} counters from {:?} for group {:?}",
            counters.len(),
            source.path,
            source.group
        );

        if self.aliases.is_empty() {
            dump(&source.path, &counters, inspect)?;
        } else {
            self.table
                .merge(&source.group, extract(&counters, self.aliases));
        }
        Ok(())
    }

    /// Collects every file of `folder`, except the one named after
    /// `exclude_pid`. A folder that can't be listed is skipped.
    pub fn collect_folder<W>(
        &mut self,
        folder: &Path,
        exclude_pid: u32,
        inspect: &mut W,
    ) -> Result<(), RunError>
    where
        W: Write + ?Sized,
    {
        let sources = match discover(folder, exclude_pid) {
            Ok(sources) => sources,
            Err(err) => {
                log::warn!("Could not list folder {:?}: {}", folder, err);
                return Ok(());
            }
        };
        for source in &sources {
            self.collect_file(source, &mut *inspect)?;
        }
        Ok(())
    }

    pub fn files_read(&self) -> usize {
        self.files_read
    }

    pub fn finish(self) -> ResultTable {
        self.table
    }
}

/// Runs one plugin invocation, writing the plugin output to `out`.
///
/// The first unusable file aborts the run before anything is rendered.
pub fn run<W>(invocation: &Invocation, exclude_pid: u32, out: &mut W) -> Result<(), RunError>
where
    W: Write + ?Sized,
{
    if invocation.folders.is_empty() {
        log::info!("No hsperfdata folders given, nothing to report");
        return Ok(());
    }

    let mut aliases = invocation.aliases.clone();
    if invocation.show_props {
        aliases.clear();
    }
    log::debug!("Selecting {} counters", aliases.len());
    for (counter_name, alias) in aliases.iter() {
        log::trace!("{counter_name} -> {alias}");
    }

    let mut collector = Collector::new(&aliases);
    for folder in &invocation.folders {
        collector.collect_folder(folder, exclude_pid, &mut *out)?;
    }
    log::debug!("Read {} hsperfdata files", collector.files_read());
    let table = collector.finish();

    if invocation.show_props {
        return Ok(());
    }
    if table.is_empty() && !aliases.is_empty() {
        log::info!("None of the selected counters were found");
    }

    render(&invocation.graphs, &table, &aliases, invocation.mode, out)?;
    Ok(())
}
