use std::path::Path;

use cygscript::{
    join_posix, prepare, EntryKind, ErrorKind, Invocation, LaunchContext, TableOracle,
};

fn context<'a>(oracle: &'a TableOracle) -> LaunchContext<'a> {
    LaunchContext {
        root: Path::new(r"C:\cygwin64"),
        shell: r"bin\sh.exe",
        cygdrive: "/cygdrive",
        inherited_path: None,
        oracle,
    }
}

fn prepare_args(args: &[&str], oracle: &TableOracle) -> Invocation {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    prepare(&args, &context(oracle)).unwrap()
}

fn payload_words(inv: &Invocation) -> Vec<String> {
    shlex::split(&inv.args[1]).unwrap()
}

#[test]
fn script_with_space_in_name() {
    let oracle = TableOracle::new().with_file(r"C:\Users\Ann\My Script.sh");
    let inv = prepare_args(&[r"C:\Users\Ann\My Script.sh"], &oracle);
    assert_eq!(inv.args[1], "'/cygdrive/c/Users/Ann/My Script.sh'");
    assert_eq!(payload_words(&inv), vec!["/cygdrive/c/Users/Ann/My Script.sh"]);
    assert_eq!(inv.title, "My Script");
}

#[test]
fn quotes_survive_verbatim() {
    let oracle = TableOracle::new().with_file(r"C:\s\run.sh");
    let inv = prepare_args(&[r"C:\s\run.sh", r#"it's "fine""#], &oracle);
    assert_eq!(
        payload_words(&inv),
        vec!["/cygdrive/c/s/run.sh", r#"it's "fine""#]
    );
}

#[test]
fn order_and_empty_arguments_preserved() {
    let oracle = TableOracle::new()
        .with_file(r"C:\s\run.sh")
        .with_entry(r"D:\out", EntryKind::Directory);
    let inv = prepare_args(&[r"C:\s\run.sh", "", "-o", r"D:\out", r"\\nas\share\in.csv", "--"], &oracle);
    assert_eq!(
        payload_words(&inv),
        vec![
            "/cygdrive/c/s/run.sh",
            "",
            "-o",
            "/cygdrive/d/out",
            "//nas/share/in.csv",
            "--",
        ]
    );
    assert_eq!(
        inv.args[1],
        join_posix(&payload_words(&inv)),
        "each argument is escaped exactly once"
    );
}

#[test]
fn short_names_expanded_for_existing_paths_only() {
    let oracle = TableOracle::new()
        .with_file(r"C:\PROGRA~1\App\x.sh")
        .with_long_name(r"C:\PROGRA~1", r"C:\Program Files");
    let inv = prepare_args(&[r"C:\PROGRA~1\App\x.sh", r"C:\PROGRA~1\App\missing.txt"], &oracle);
    assert_eq!(
        payload_words(&inv),
        vec![
            "/cygdrive/c/Program Files/App/x.sh",
            "/cygdrive/c/PROGRA~1/App/missing.txt",
        ]
    );
}

#[test]
fn command_line_wraps_payload_once_for_windows() {
    let oracle = TableOracle::new().with_file(r"C:\s\run.sh");
    let inv = prepare_args(&[r"C:\s\run.sh", r#"say "hi""#], &oracle);
    let expected_payload = r#"'/cygdrive/c/s/run.sh' 'say "hi"'"#;
    assert_eq!(inv.args[1], expected_payload);
    assert!(inv.command_line.ends_with(r#" -c "'/cygdrive/c/s/run.sh' 'say \"hi\"'""#));
}

#[test]
fn no_arguments_is_a_usage_error() {
    let oracle = TableOracle::new();
    let err = prepare(&[], &context(&oracle)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Usage);
}
