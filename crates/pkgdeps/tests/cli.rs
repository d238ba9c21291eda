//! Integration tests for the pkgdeps CLI.
//!
//! Every test runs the real binary against a database in a fresh temporary
//! directory.

use rstest::{fixture, rstest};
use tempfile::TempDir;

mod common;
use common::{run_pkgdeps_in_dir, stdout_of, write_fixture};

// ============================================================================
// Test Fixtures
// ============================================================================

/// A temporary directory with an index and a config, but no database yet
#[fixture]
fn temp_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    write_fixture(temp.path());
    temp
}

/// A temporary directory whose database was rebuilt from the index
#[fixture]
fn rebuilt_dir(temp_dir: TempDir) -> TempDir {
    stdout_of(&run_pkgdeps_in_dir(temp_dir.path(), &["rebuild"]));
    temp_dir
}

fn run_ok(dir: &TempDir, args: &[&str]) -> String {
    stdout_of(&run_pkgdeps_in_dir(dir.path(), args))
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[rstest]
fn help_lists_commands(temp_dir: TempDir) {
    let stdout = run_ok(&temp_dir, &["--help"]);
    assert!(stdout.contains("Usage:"));
    for command in ["rebuild", "forward", "reverse", "worst", "start", "done", "todo", "reset"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[rstest]
fn version_prints_name(temp_dir: TempDir) {
    let stdout = run_ok(&temp_dir, &["--version"]);
    assert!(stdout.contains("pkgdeps"));
}

// ============================================================================
// Graph Commands
// ============================================================================

#[rstest]
fn rebuild_reports_counts(temp_dir: TempDir) {
    let stdout = run_ok(&temp_dir, &["rebuild"]);
    assert!(stdout.contains("Packages: 8"));
    assert!(stdout.contains("Dependencies: 8"));
    assert!(temp_dir.path().join("pkgdeps.db").exists());
}

#[rstest]
fn rebuild_mentions_cleared_entries_only_when_present(rebuilt_dir: TempDir) {
    let stdout = run_ok(&rebuilt_dir, &["rebuild"]);
    assert!(!stdout.contains("Cleared"));

    run_ok(&rebuilt_dir, &["start", "git"]);
    let stdout = run_ok(&rebuilt_dir, &["rebuild"]);
    assert!(stdout.contains("Cleared 1 rebuild list entries."));
}

#[rstest]
fn rebuild_with_missing_index_fails(temp_dir: TempDir) {
    std::fs::remove_file(temp_dir.path().join("eopkg-index.xml")).unwrap();
    let output = run_pkgdeps_in_dir(temp_dir.path(), &["rebuild"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error"));
}

#[rstest]
#[case("forward")]
#[case("fwd")]
fn forward_lists_dependencies_sorted(rebuilt_dir: TempDir, #[case] command: &str) {
    let stdout = run_ok(&rebuilt_dir, &[command, "curl"]);
    assert!(stdout.contains("Package: curl"));
    assert!(stdout.contains("Since Release"));
    let openssl = stdout.find("openssl").unwrap();
    let zlib = stdout.find("zlib").unwrap();
    assert!(openssl < zlib);
}

#[rstest]
fn forward_without_dependencies(rebuilt_dir: TempDir) {
    let stdout = run_ok(&rebuilt_dir, &["forward", "glibc"]);
    assert!(stdout.contains("No dependencies found."));
}

#[rstest]
fn reverse_lists_dependents(rebuilt_dir: TempDir) {
    let stdout = run_ok(&rebuilt_dir, &["rev", "zlib"]);
    assert!(stdout.contains("Reverse Dependency"));
    assert!(stdout.contains("curl"));
    assert!(stdout.contains("git"));
}

#[rstest]
fn worst_lists_transitive_dependents(rebuilt_dir: TempDir) {
    let stdout = run_ok(&rebuilt_dir, &["worst", "openssl"]);
    assert!(stdout.contains("Required Rebuilds"));
    assert!(stdout.contains("curl\ngit\n"));
    assert!(stdout.contains("Total: 2"));
}

#[rstest]
fn unknown_package_fails(rebuilt_dir: TempDir) {
    let output = run_pkgdeps_in_dir(rebuilt_dir.path(), &["worst", "nope"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope"));
    assert!(stderr.contains("needs a rebuild"));
}

#[rstest]
fn graph_prints_dot(temp_dir: TempDir) {
    let stdout = run_ok(&temp_dir, &["graph"]);
    assert!(stdout.starts_with("digraph {"));
    assert!(stdout.contains("rankdir=LR;"));
    assert!(stdout.contains("ranksep=2;"));
    assert!(stdout.contains("\"curl\""));
}

#[rstest]
fn stats_shows_counts(rebuilt_dir: TempDir) {
    let stdout = run_ok(&rebuilt_dir, &["stats"]);
    assert!(stdout.contains("Packages: 8"));
    assert!(stdout.contains("Rebuild entries: 0"));
}

// ============================================================================
// Rebuild List Commands
// ============================================================================

#[rstest]
fn start_done_todo_flow(rebuilt_dir: TempDir) {
    let stdout = run_ok(&rebuilt_dir, &["start", "glibc"]);
    assert!(stdout.contains("Successfully marked 'glibc' for rebuilds"));

    let stdout = run_ok(&rebuilt_dir, &["todo"]);
    assert!(stdout.contains("Unblocked Packages\nglibc\n"));
    assert!(stdout.contains("Queued    : 1"));

    let stdout = run_ok(&rebuilt_dir, &["done", "glibc", "yes"]);
    assert!(stdout.contains("Successfully marked 'glibc' as rebuilt"));
    assert!(stdout.contains("openssl\nzlib\n"));

    let stdout = run_ok(&rebuilt_dir, &["td"]);
    assert!(stdout.contains("Unblocked : 2"));
    assert!(stdout.contains("Queued    : 2"));
    assert!(stdout.contains("Completed : 1"));
}

#[rstest]
fn done_without_cascade_queues_nothing(rebuilt_dir: TempDir) {
    run_ok(&rebuilt_dir, &["to", "zlib"]);
    run_ok(&rebuilt_dir, &["do", "zlib", "n"]);

    let stdout = run_ok(&rebuilt_dir, &["todo"]);
    assert!(stdout.contains("No todo items found."));
    assert!(stdout.contains("Completed : 1"));
}

#[rstest]
fn done_rejects_non_yes_no(rebuilt_dir: TempDir) {
    run_ok(&rebuilt_dir, &["start", "zlib"]);
    let output = run_pkgdeps_in_dir(rebuilt_dir.path(), &["done", "zlib", "perhaps"]);
    assert!(!output.status.success());
}

#[rstest]
fn start_twice_fails(rebuilt_dir: TempDir) {
    run_ok(&rebuilt_dir, &["start", "git"]);
    let output = run_pkgdeps_in_dir(rebuilt_dir.path(), &["start", "git"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("git"));
}

#[rstest]
fn reset_empties_the_list(rebuilt_dir: TempDir) {
    run_ok(&rebuilt_dir, &["start", "git"]);
    run_ok(&rebuilt_dir, &["clr"]);

    let stdout = run_ok(&rebuilt_dir, &["todo"]);
    assert!(stdout.contains("Queued    : 0"));
}
