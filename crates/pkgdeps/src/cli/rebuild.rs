//! `pkgdeps rebuild` command implementation.

use colored::Colorize;
use pkgdeps::Catalog;

use super::{with_store, Paths};

/// Run the rebuild command.
///
/// The index is parsed before the database is touched, so a bad index never
/// costs the existing graph.
pub fn run(paths: &Paths) -> pkgdeps::Result<()> {
    let catalog = Catalog::load(&paths.index)?;
    let (cleared, stats) = with_store(paths, |store| {
        let cleared = store.stats()?.todo;
        Ok((cleared, store.rebuild_from_index(&catalog)?))
    })?;

    println!(
        "Rebuilt {} from {}",
        paths.database.display().to_string().cyan(),
        paths.index.display()
    );
    println!(
        "  {}: {}",
        "Packages".white().bold(),
        stats.packages.to_string().green()
    );
    println!(
        "  {}: {}",
        "Dependencies".white().bold(),
        stats.edges.to_string().green()
    );

    if stats.skipped_packages > 0 || stats.dropped_edges > 0 {
        println!(
            "  {}: {} packages filtered, {} dependencies unresolved",
            "Skipped".yellow().bold(),
            stats.skipped_packages,
            stats.dropped_edges
        );
    }
    if cleared > 0 {
        println!(
            "  {}",
            format!("Cleared {cleared} rebuild list entries.").dimmed()
        );
    }
    Ok(())
}
