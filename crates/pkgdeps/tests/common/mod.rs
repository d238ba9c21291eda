//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// A small repository index.
///
/// ```text
/// git -> curl -> openssl -> glibc
///    \      \--> zlib ----/
///     \-------> zlib
/// loop-a <-> loop-b
/// ghost -> (missing)
/// curl-devel is filtered out
/// ```
pub const INDEX_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<PISI>
    <Package>
        <Name>glibc</Name>
        <History><Update release="30"/><Update release="29"/></History>
    </Package>
    <Package>
        <Name>zlib</Name>
        <History><Update release="7"/></History>
        <RuntimeDependencies>
            <Dependency releaseFrom="1">glibc</Dependency>
        </RuntimeDependencies>
    </Package>
    <Package>
        <Name>openssl</Name>
        <History><Update release="12"/></History>
        <RuntimeDependencies>
            <Dependency releaseFrom="2">glibc</Dependency>
        </RuntimeDependencies>
    </Package>
    <Package>
        <Name>curl</Name>
        <History><Update release="42"/></History>
        <RuntimeDependencies>
            <Dependency releaseFrom="12">openssl</Dependency>
            <Dependency releaseFrom="3">zlib</Dependency>
        </RuntimeDependencies>
    </Package>
    <Package>
        <Name>git</Name>
        <History><Update release="90"/></History>
        <RuntimeDependencies>
            <Dependency releaseFrom="80">curl</Dependency>
            <Dependency>zlib</Dependency>
        </RuntimeDependencies>
    </Package>
    <Package>
        <Name>curl-devel</Name>
        <History><Update release="42"/></History>
        <RuntimeDependencies>
            <Dependency releaseFrom="42">curl</Dependency>
        </RuntimeDependencies>
    </Package>
    <Package>
        <Name>loop-a</Name>
        <History><Update release="1"/></History>
        <RuntimeDependencies>
            <Dependency>loop-b</Dependency>
        </RuntimeDependencies>
    </Package>
    <Package>
        <Name>loop-b</Name>
        <History><Update release="1"/></History>
        <RuntimeDependencies>
            <Dependency>loop-a</Dependency>
        </RuntimeDependencies>
    </Package>
    <Package>
        <Name>ghost</Name>
        <History><Update release="1"/></History>
        <RuntimeDependencies>
            <Dependency>missing</Dependency>
        </RuntimeDependencies>
    </Package>
</PISI>
"#;

/// Every package that survives the name filter.
pub const PACKAGES: [&str; 8] = [
    "glibc", "zlib", "openssl", "curl", "git", "loop-a", "loop-b", "ghost",
];

/// Write [`INDEX_XML`] and an empty config into `dir`.
pub fn write_fixture(dir: &Path) -> PathBuf {
    let index = dir.join("eopkg-index.xml");
    std::fs::write(&index, INDEX_XML).expect("Failed to write index");
    std::fs::write(dir.join("config.yaml"), "{}\n").expect("Failed to write config");
    index
}

/// Run the pkgdeps binary against the database and index in `dir`.
pub fn run_pkgdeps_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pkgdeps"))
        .arg("--no-color")
        .arg("--db")
        .arg(dir.join("pkgdeps.db"))
        .arg("--index")
        .arg(dir.join("eopkg-index.xml"))
        .arg("--config")
        .arg(dir.join("config.yaml"))
        .args(args)
        .env_remove("PKGDEPS_DB")
        .env_remove("PKGDEPS_INDEX")
        .env_remove("PKGDEPS_CONFIG")
        .env_remove("RUST_LOG")
        .current_dir(dir)
        .output()
        .expect("Failed to execute pkgdeps binary")
}

/// Stdout of a run that must succeed.
pub fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "pkgdeps failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}
