//! Runner tests driving `run_with_loader` against temporary files.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use graft_config::Config;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::config::ConfigLoader;
use crate::{AppError, run_with_loader};

/// Loader returning a fixed configuration, ignoring the environment.
struct FixedLoader(Config);

impl ConfigLoader for FixedLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.0.clone())
    }
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("read fixture")
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[fixture]
fn workspace() -> Workspace {
    let workspace = Workspace {
        dir: TempDir::new().expect("temp dir"),
    };
    workspace.write("before.rs", "let (Xa, Xb) = Xcall();");
    workspace.write("after.rs", "let (Xb, Xa) = Xcall();");
    workspace.write("main.rs", "fn main() { let (a, b) = f(); }");
    workspace
}

struct Outcome {
    code: ExitCode,
    stdout: String,
    stderr: String,
}

fn invoke(workspace: &Workspace, flags: &[&str], files: &[&str]) -> Outcome {
    invoke_with(workspace, Config::default(), flags, files)
}

fn invoke_with(workspace: &Workspace, config: Config, flags: &[&str], files: &[&str]) -> Outcome {
    let dir = workspace.path();
    let mut args: Vec<OsString> = vec![
        OsString::from("graft"),
        OsString::from("--before"),
        dir.join("before.rs").into_os_string(),
        OsString::from("--after"),
        dir.join("after.rs").into_os_string(),
    ];
    args.extend(flags.iter().map(OsString::from));
    args.extend(files.iter().map(|file| dir.join(file).into_os_string()));

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run_with_loader(args, &mut stdout, &mut stderr, &FixedLoader(config));
    Outcome {
        code,
        stdout: String::from_utf8(stdout).expect("utf8 stdout"),
        stderr: String::from_utf8(stderr).expect("utf8 stderr"),
    }
}

fn status(code: ExitCode) -> String {
    format!("{code:?}")
}

#[rstest]
fn rewrites_file_in_place(workspace: Workspace) {
    let outcome = invoke(&workspace, &[], &["main.rs"]);

    assert_eq!(status(outcome.code), status(ExitCode::SUCCESS), "{}", outcome.stderr);
    assert_eq!(
        workspace.read("main.rs"),
        "fn main() {\n    let (b, a) = f();\n}\n"
    );
}

#[rstest]
fn files_without_matches_are_left_alone(workspace: Workspace) {
    workspace.write("other.rs", "fn other(){run();}");

    let outcome = invoke(&workspace, &[], &["other.rs"]);

    assert_eq!(status(outcome.code), status(ExitCode::SUCCESS));
    assert_eq!(workspace.read("other.rs"), "fn other(){run();}");
}

#[rstest]
fn stdout_mode_prints_and_keeps_file(workspace: Workspace) {
    let outcome = invoke(&workspace, &["--stdout"], &["main.rs"]);

    assert_eq!(status(outcome.code), status(ExitCode::SUCCESS));
    assert_eq!(outcome.stdout, "fn main() {\n    let (b, a) = f();\n}\n");
    assert_eq!(workspace.read("main.rs"), "fn main() { let (a, b) = f(); }");
}

#[rstest]
fn check_mode_lists_changes_and_exits_with_two(workspace: Workspace) {
    let outcome = invoke(&workspace, &["--check"], &["main.rs"]);

    assert_eq!(status(outcome.code), status(ExitCode::from(2)));
    assert!(outcome.stdout.contains("main.rs"));
    assert_eq!(workspace.read("main.rs"), "fn main() { let (a, b) = f(); }");
}

#[rstest]
fn errors_name_the_file_and_do_not_stop_the_batch(workspace: Workspace) {
    workspace.write("broken.rs", "fn main() {");

    let outcome = invoke(&workspace, &[], &["broken.rs", "main.rs"]);

    assert_eq!(status(outcome.code), status(ExitCode::FAILURE));
    assert!(outcome.stderr.contains("broken.rs"), "{}", outcome.stderr);
    assert_eq!(
        workspace.read("main.rs"),
        "fn main() {\n    let (b, a) = f();\n}\n"
    );
}

#[rstest]
fn unknown_extension_requires_language(workspace: Workspace) {
    workspace.write("notes.txt", "let (a, b) = f();");

    let outcome = invoke(&workspace, &[], &["notes.txt"]);

    assert_eq!(status(outcome.code), status(ExitCode::FAILURE));
    assert!(outcome.stderr.contains("--language"), "{}", outcome.stderr);
}

#[rstest]
fn capture_marker_comes_from_configuration(workspace: Workspace) {
    workspace.write("before.rs", "old(META_v)");
    workspace.write("after.rs", "new(META_v)");
    workspace.write("calls.rs", "fn main() { old(1); }");
    let config = Config {
        capture_marker: "META_".to_owned(),
        ..Config::default()
    };

    let outcome = invoke_with(&workspace, config, &[], &["calls.rs"]);

    assert_eq!(status(outcome.code), status(ExitCode::SUCCESS), "{}", outcome.stderr);
    assert_eq!(workspace.read("calls.rs"), "fn main() {\n    new(1);\n}\n");
}

#[rstest]
fn invalid_rule_fails_before_touching_files(workspace: Workspace) {
    workspace.write("after.rs", "let (Xb, Xz) = Xcall();");

    let outcome = invoke(&workspace, &["--language", "rust"], &["main.rs"]);

    assert_eq!(status(outcome.code), status(ExitCode::FAILURE));
    assert!(outcome.stderr.contains("Xz"), "{}", outcome.stderr);
    assert_eq!(workspace.read("main.rs"), "fn main() { let (a, b) = f(); }");
}

#[rstest]
fn help_goes_to_stdout(workspace: Workspace) {
    let outcome = invoke(&workspace, &["--help"], &[]);

    assert_eq!(status(outcome.code), status(ExitCode::SUCCESS));
    assert!(outcome.stdout.contains("--before"));
}
