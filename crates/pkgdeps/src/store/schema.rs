//! Database schema definition for pkgdeps.

/// Tables dropped by a full rebuild, dependents first.
pub(crate) const DROP_ALL: &str = r"
DROP TABLE IF EXISTS todo;
DROP TABLE IF EXISTS deps;
DROP TABLE IF EXISTS packages;
";

/// Database schema definition.
pub(crate) const SCHEMA: &str = r"
-- Packages from the last catalog load; id is the catalog position
CREATE TABLE IF NOT EXISTS packages (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    rel INTEGER NOT NULL
);

-- Runtime dependency edges: left_id requires right_id since release rel of left_id
CREATE TABLE IF NOT EXISTS deps (
    left_id INTEGER NOT NULL,
    right_id INTEGER NOT NULL,
    rel INTEGER NOT NULL,
    PRIMARY KEY (left_id, right_id)
);

CREATE INDEX IF NOT EXISTS idx_deps_right ON deps(right_id);

-- Rebuild queue; done = 0 is pending, done = 1 is complete
CREATE TABLE IF NOT EXISTS todo (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    package_id INTEGER NOT NULL,
    done INTEGER NOT NULL DEFAULT 0
);

-- At most one pending entry per package
CREATE UNIQUE INDEX IF NOT EXISTS idx_todo_pending ON todo(name) WHERE done = 0;
CREATE INDEX IF NOT EXISTS idx_todo_package ON todo(package_id);
";
