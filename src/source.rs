use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// One hsperfdata file and the group its counters are reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub group: String,
    pub path: PathBuf,
}

/// The group prefix of an hsperfdata folder: the part of its name after
/// the last `_`, so `/tmp/hsperfdata_tomcat` gives `tomcat`. Folders
/// without such a suffix give an empty prefix.
pub fn group_prefix(folder: &Path) -> String {
    let name = match folder.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return String::new(),
    };
    match name.rfind('_') {
        Some(under) if under > 0 => name[under + 1..].to_string(),
        _ => String::new(),
    }
}

/// Lists the hsperfdata files in `folder`, skipping directories and the
/// file named `exclude_pid` (our own JVM, if we are one).
///
/// A folder holding a single file reports it under the bare prefix; with
/// several files, each one gets `<prefix>_<file name>`. Files are returned
/// in file name order.
pub fn discover(folder: &Path, exclude_pid: u32) -> io::Result<Vec<SourceFile>> {
    let exclude = exclude_pid.to_string();
    let mut paths = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if entry.file_name() == exclude.as_str() {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    let prefix = group_prefix(folder);
    let several = paths.len() > 1;
    Ok(paths
        .into_iter()
        .map(|path| {
            let group = if several {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("{prefix}_{file_name}")
            } else {
                prefix.clone()
            };
            SourceFile { group, path }
        })
        .collect())
}

/// Reads the whole file into memory. The file is closed before returning.
pub fn read_source(path: &Path) -> Result<Vec<u8>, SourceError> {
    let mut file = File::open(path).map_err(|err| SourceError::from_io(path, err))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|err| SourceError::from_io(path, err))?;
    Ok(data)
}
