//! CLI command implementations.

mod display;

pub mod graph;
pub mod query;
pub mod queue;
pub mod rebuild;
pub mod stats;

use std::path::{Path, PathBuf};

use pkgdeps::{Config, Store};

/// Database and index locations after merging flags and configuration.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Database file
    pub database: PathBuf,
    /// Repository index XML
    pub index: PathBuf,
}

impl Paths {
    /// Flags win over the configuration file, which wins over defaults.
    pub fn resolve(
        config: Option<&Path>,
        database: Option<PathBuf>,
        index: Option<PathBuf>,
    ) -> pkgdeps::Result<Self> {
        let config = Config::load_or_default(config)?;
        let database = match database {
            Some(path) => path,
            None => config.database_path()?,
        };
        let index = index.unwrap_or_else(|| config.index_path());
        tracing::debug!(
            database = %database.display(),
            index = %index.display(),
            "Resolved paths"
        );
        Ok(Self { database, index })
    }
}

/// Open the database, run `f`, and close it again.
///
/// An error from `f` takes precedence over an error from closing.
fn with_store<T>(
    paths: &Paths,
    f: impl FnOnce(&mut Store) -> pkgdeps::Result<T>,
) -> pkgdeps::Result<T> {
    let mut store = Store::new();
    store.open(&paths.database)?;
    let result = f(&mut store);
    let closed = store.close();
    let value = result?;
    closed?;
    Ok(value)
}

/// Accept some flavor of yes or no.
pub fn parse_yes_no(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "yes" | "y" | "true" | "t" => Ok(true),
        "no" | "n" | "false" | "f" => Ok(false),
        _ => Err(format!("expected yes or no, got '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("yes", true)]
    #[case("Y", true)]
    #[case("TRUE", true)]
    #[case("t", true)]
    #[case("no", false)]
    #[case("N", false)]
    #[case("false", false)]
    #[case("f", false)]
    fn yes_no_flavors(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(parse_yes_no(input), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("maybe")]
    #[case("yess")]
    fn yes_no_rejects_other_words(#[case] input: &str) {
        assert!(parse_yes_no(input).is_err());
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, "database: /from/config.db\nindex: /from/config.xml\n")
            .unwrap();

        let paths = Paths::resolve(Some(&config_path), Some(PathBuf::from("/flag.db")), None)
            .unwrap();
        assert_eq!(paths.database, PathBuf::from("/flag.db"));
        assert_eq!(paths.index, PathBuf::from("/from/config.xml"));
    }
}
