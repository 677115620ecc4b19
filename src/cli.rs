use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use hsperf_munin::alias::AliasError;
use hsperf_munin::graph::GraphSpecError;
use hsperf_munin::{AliasBinding, AliasTable, GraphSpec, Invocation, RenderMode};

#[derive(Debug, Parser)]
#[command(
    name = "hsperf-munin",
    version,
    about = r#"
hsperf-munin is a Munin plugin that reports JVM performance counters read
from hsperfdata files. It usually needs to run as root to read other
users' hsperfdata folders.

Each ARG is one of:
    config                        Print the graph configuration instead of values.
    alias=counter                 Report the counter under the given alias.
    alias+=counter                Same, and declare the alias as a COUNTER.
    graph|title|vlabel|a,b,...    Draw the given aliases in one graph. The title
                                  and vlabel fields are optional.
    folder                        An hsperfdata folder, such as /tmp/hsperfdata_tomcat.

EXAMPLES:
    # List all counters of all JVMs of user tomcat:
    hsperf-munin --showprops /tmp/hsperfdata_tomcat

    # Report eden usage and young GC count:
    hsperf-munin eden=sun.gc.generation.0.space.0.used \
        ygc+=sun.gc.collector.0.invocations \
        'mem|Memory|bytes|eden' 'gc|Collections|count|ygc' /tmp/hsperfdata_tomcat
"#
)]
pub struct Opt {
    /// Print all counters and their values instead of the graphs.
    #[arg(long)]
    pub showprops: bool,

    #[arg(value_name = "ARG")]
    pub args: Vec<String>,
}

impl Opt {
    /// Sorts the free-form arguments into aliases, graphs and folders.
    /// Folders that don't exist are skipped with a warning.
    pub fn invocation(&self) -> Result<Invocation, ArgsError> {
        let mut invocation = Invocation {
            mode: RenderMode::Values,
            show_props: self.showprops,
            aliases: AliasTable::new(),
            graphs: Vec::new(),
            folders: Vec::new(),
        };

        for arg in &self.args {
            match classify(arg) {
                Arg::Config => invocation.mode = RenderMode::Config,
                Arg::Alias => invocation.aliases.insert(arg.parse::<AliasBinding>()?)?,
                Arg::Graph => invocation.graphs.push(arg.parse::<GraphSpec>()?),
                Arg::Folder => {
                    let folder = PathBuf::from(arg);
                    if folder.exists() {
                        invocation.folders.push(folder);
                    } else {
                        log::warn!("skipping folder: {}", folder.display());
                    }
                }
            }
        }
        Ok(invocation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arg {
    Config,
    Alias,
    Graph,
    Folder,
}

fn classify(arg: &str) -> Arg {
    if arg == "config" {
        return Arg::Config;
    }
    match arg.find('=') {
        Some(eq) if eq > 0 => return Arg::Alias,
        _ => {}
    }
    match arg.find('|') {
        Some(bar) if bar > 0 => Arg::Graph,
        _ => Arg::Folder,
    }
}

/// Whether clap stopped to print its help or version text, which is not
/// an argument error.
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

#[derive(thiserror::Error, Debug)]
pub enum ArgsError {
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error(transparent)]
    Alias(#[from] AliasError),

    #[error(transparent)]
    Graph(#[from] GraphSpecError),
}

impl ArgsError {
    /// Every argument error exits with 1, apart from the codes of the
    /// source errors.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
