//! Rebuild list commands: `start`, `done`, `todo` and `reset`.

use colored::Colorize;

use super::display::{print_counter, print_names};
use super::{with_store, Paths};

/// Run the start command.
pub fn start(paths: &Paths, package: &str) -> pkgdeps::Result<()> {
    with_store(paths, |store| store.start(package))?;
    println!("Successfully marked '{}' for rebuilds", package.cyan());
    Ok(())
}

/// Run the done command.
pub fn done(paths: &Paths, package: &str, cascade: bool) -> pkgdeps::Result<()> {
    let queued = with_store(paths, |store| store.done(package, cascade))?;
    println!("Successfully marked '{}' as rebuilt", package.cyan());

    if !queued.is_empty() {
        println!();
        print_names("Newly Queued", &queued);
    }
    Ok(())
}

/// Run the todo command.
pub fn todo(paths: &Paths) -> pkgdeps::Result<()> {
    let summary = with_store(paths, |store| store.list_unblocked())?;

    if summary.unblocked.is_empty() {
        println!("{}", "No todo items found.".dimmed());
        println!();
    } else {
        print_names("Unblocked Packages", &summary.unblocked);
    }

    print_counter("Unblocked", summary.unblocked.len());
    print_counter("Queued", summary.pending);
    print_counter("Completed", summary.done);
    println!();
    Ok(())
}

/// Run the reset command.
pub fn reset(paths: &Paths) -> pkgdeps::Result<()> {
    with_store(paths, |store| store.reset())?;
    println!("Successfully reset the rebuild list");
    Ok(())
}
