use std::fs;
use std::path::{Path, PathBuf};

use hsperf_munin::source::group_prefix;
use hsperf_munin::{
    run, AliasBinding, AliasTable, GraphSpec, Invocation, PerfDataWriter, RenderMode, RunError,
    SourceError,
};
use tempfile::TempDir;

const EDEN_USED: &str = "sun.gc.generation.0.space.0.used";
const YGC: &str = "sun.gc.collector.0.invocations";
const VM_NAME: &str = "java.property.java.vm.name";

fn aliases() -> AliasTable {
    let mut aliases = AliasTable::new();
    aliases
        .insert(AliasBinding::new("eden", EDEN_USED, false))
        .unwrap();
    aliases.insert(AliasBinding::new("ygc", YGC, true)).unwrap();
    aliases
}

fn graphs() -> Vec<GraphSpec> {
    vec![
        GraphSpec::new("mem", "Memory", "bytes", &["eden"]),
        GraphSpec::new("gc", "Collections", "count", &["ygc"]),
    ]
}

fn jvm(eden: i64, ygc: Option<i64>) -> Vec<u8> {
    let mut writer = PerfDataWriter::new()
        .text(VM_NAME, "OpenJDK 64-Bit Server VM", 64)
        .long(EDEN_USED, eden)
        .raw_entry(b'I', "sun.rt.some.int", &[1, 0, 0, 0]);
    if let Some(ygc) = ygc {
        writer = writer.long(YGC, ygc);
    }
    writer.finish()
}

fn hsperf_folder(files: &[(&str, Vec<u8>)]) -> (TempDir, PathBuf) {
    let dir = tempfile::Builder::new()
        .prefix("hsperfdata_")
        .tempdir()
        .unwrap();
    for (name, data) in files {
        fs::write(dir.path().join(name), data).unwrap();
    }
    let path = dir.path().to_path_buf();
    (dir, path)
}

fn invocation(mode: RenderMode, folders: &[&Path]) -> Invocation {
    Invocation {
        mode,
        show_props: false,
        aliases: aliases(),
        graphs: graphs(),
        folders: folders.iter().map(|folder| folder.to_path_buf()).collect(),
    }
}

fn run_to_string(invocation: &Invocation) -> Result<String, RunError> {
    let mut out = Vec::new();
    run(invocation, std::process::id(), &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_values_for_single_jvm() {
    let (_dir, folder) = hsperf_folder(&[("4711", jvm(1024, Some(3)))]);
    let group = group_prefix(&folder);

    let output = run_to_string(&invocation(RenderMode::Values, &[&folder])).unwrap();
    assert_eq!(
        output,
        format!(
            "multigraph hsperf_mem\n\
             {group}_eden.value 1024\n\
             \n\
             multigraph hsperf_gc\n\
             {group}_ygc.value 3\n\
             \n"
        )
    );
}

#[test]
fn test_config_for_several_jvms() {
    let (_dir, folder) = hsperf_folder(&[("200", jvm(1, Some(1))), ("100", jvm(2, None))]);
    let prefix = group_prefix(&folder);

    let output = run_to_string(&invocation(RenderMode::Config, &[&folder])).unwrap();
    assert_eq!(
        output,
        format!(
            "multigraph hsperf_mem\n\
             graph_title Memory\n\
             graph_vlabel bytes\n\
             graph_category hsperf\n\
             {prefix}_100_eden.label {prefix}_100 eden\n\
             {prefix}_200_eden.label {prefix}_200 eden\n\
             \n\
             multigraph hsperf_gc\n\
             graph_title Collections\n\
             graph_vlabel count\n\
             graph_category hsperf\n\
             {prefix}_100_ygc.label {prefix}_100 ygc\n\
             {prefix}_100_ygc.type COUNTER\n\
             {prefix}_100_ygc.min 0\n\
             {prefix}_200_ygc.label {prefix}_200 ygc\n\
             {prefix}_200_ygc.type COUNTER\n\
             {prefix}_200_ygc.min 0\n\
             \n"
        )
    );
}

#[test]
fn test_missing_counter_is_not_reported() {
    let (_dir, folder) = hsperf_folder(&[("200", jvm(1, Some(5))), ("100", jvm(2, None))]);
    let prefix = group_prefix(&folder);

    let output = run_to_string(&invocation(RenderMode::Values, &[&folder])).unwrap();
    assert!(output.contains(&format!("{prefix}_200_ygc.value 5\n")));
    assert!(!output.contains(&format!("{prefix}_100_ygc")));
    assert!(output.contains(&format!("{prefix}_100_eden.value 2\n")));
}

#[test]
fn test_own_process_is_skipped() {
    let own_pid = std::process::id().to_string();
    let (_dir, folder) = hsperf_folder(&[
        ("4711", jvm(7, Some(1))),
        // Not even hsperfdata: reading it would fail the run.
        (own_pid.as_str(), b"not a perf data file".to_vec()),
    ]);
    let group = group_prefix(&folder);

    let output = run_to_string(&invocation(RenderMode::Values, &[&folder])).unwrap();
    // Only one file is left, so it is reported under the bare prefix.
    assert!(output.contains(&format!("\n{group}_eden.value 7\n")));
}

#[test]
fn test_bad_magic_aborts_the_run() {
    let bad = PerfDataWriter::new()
        .magic(0xDEAD_BEEF)
        .long(EDEN_USED, 1)
        .finish();
    let (_dir, folder) = hsperf_folder(&[("1", jvm(1, Some(1))), ("2", bad)]);

    let err = run_to_string(&invocation(RenderMode::Values, &[&folder])).unwrap_err();
    assert_eq!(err.exit_code(), 4);
    match err {
        RunError::Source(SourceError::BadMagic { path, magic }) => {
            assert_eq!(path, folder.join("2"));
            assert_eq!(magic, 0xDEAD_BEEF);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_truncated_file_aborts_the_run() {
    let mut data = jvm(1, Some(1));
    data.truncate(data.len() - 8);
    let (_dir, folder) = hsperf_folder(&[("1", data)]);

    let err = run_to_string(&invocation(RenderMode::Values, &[&folder])).unwrap_err();
    assert!(matches!(
        err,
        RunError::Source(SourceError::Truncated { .. })
    ));
    assert_eq!(err.exit_code(), 4);
    assert!(err.to_string().contains("wrong format"));
}

#[test]
fn test_showprops_dumps_every_counter() {
    let (_dir, folder) = hsperf_folder(&[("4711", jvm(1024, Some(3)))]);
    let mut invocation = invocation(RenderMode::Values, &[&folder]);
    invocation.show_props = true;

    let output = run_to_string(&invocation).unwrap();
    assert_eq!(
        output,
        format!(
            "{}\n\
             {VM_NAME}: OpenJDK 64-Bit Server VM\n\
             {EDEN_USED}: 1024\n\
             sun.rt.some.int: 0\n\
             {YGC}: 3\n\
             \n",
            folder.join("4711").display()
        )
    );
}

#[test]
fn test_no_aliases_dumps_then_renders_empty_graphs() {
    let (_dir, folder) = hsperf_folder(&[("4711", jvm(1024, Some(3)))]);
    let mut invocation = invocation(RenderMode::Values, &[&folder]);
    invocation.aliases = AliasTable::new();

    let output = run_to_string(&invocation).unwrap();
    assert_eq!(
        output,
        format!(
            "{}\n\
             {VM_NAME}: OpenJDK 64-Bit Server VM\n\
             {EDEN_USED}: 1024\n\
             sun.rt.some.int: 0\n\
             {YGC}: 3\n\
             \n\
             multigraph hsperf_mem\n\
             \n\
             multigraph hsperf_gc\n\
             \n",
            folder.join("4711").display()
        )
    );
}

#[test]
fn test_no_folders_no_output() {
    let output = run_to_string(&invocation(RenderMode::Config, &[])).unwrap();
    assert_eq!(output, "");
}

#[test]
fn test_groups_from_several_folders() {
    let (_dir_a, folder_a) = hsperf_folder(&[("1", jvm(10, None))]);
    let (_dir_b, folder_b) = hsperf_folder(&[("1", jvm(20, None))]);
    let (group_a, group_b) = (group_prefix(&folder_a), group_prefix(&folder_b));

    let mut invocation = invocation(RenderMode::Values, &[&folder_a, &folder_b]);
    invocation.graphs = vec![GraphSpec::new("mem", "Memory", "bytes", &["eden"])];
    let output = run_to_string(&invocation).unwrap();

    let (first, second) = if group_a < group_b {
        ((group_a, 10), (group_b, 20))
    } else {
        ((group_b, 20), (group_a, 10))
    };
    assert_eq!(
        output,
        format!(
            "multigraph hsperf_mem\n\
             {}_eden.value {}\n\
             {}_eden.value {}\n\
             \n",
            first.0, first.1, second.0, second.1
        )
    );
}
