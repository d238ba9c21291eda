//! `pkgdeps graph` command implementation.

use pkgdeps::Catalog;

use super::Paths;

/// Run the graph command. Reads only the index; the database is not opened.
pub fn run(paths: &Paths) -> pkgdeps::Result<()> {
    let catalog = Catalog::load(&paths.index)?;
    print!("{}", catalog.to_dot());
    Ok(())
}
