//! `pkgdeps forward`, `reverse` and `worst` command implementations.

use colored::Colorize;

use super::display::{print_dependency_table, print_names, print_package_banner};
use super::{with_store, Paths};

/// Run the forward command.
pub fn forward(paths: &Paths, package: &str) -> pkgdeps::Result<()> {
    let deps = with_store(paths, |store| store.forward_deps(package))?;

    print_package_banner(package);
    if deps.is_empty() {
        println!("{}", "No dependencies found.".dimmed());
        println!();
        return Ok(());
    }
    print_dependency_table(("Dependency", "Since Release"), &deps);
    Ok(())
}

/// Run the reverse command.
pub fn reverse(paths: &Paths, package: &str) -> pkgdeps::Result<()> {
    let deps = with_store(paths, |store| store.reverse_deps(package))?;

    print_package_banner(package);
    if deps.is_empty() {
        println!("{}", "No reverse dependencies found.".dimmed());
        println!();
        return Ok(());
    }
    print_dependency_table(("Reverse Dependency", "Release"), &deps);
    Ok(())
}

/// Run the worst command.
pub fn worst(paths: &Paths, package: &str) -> pkgdeps::Result<()> {
    let names = with_store(paths, |store| store.worst_case(package))?;

    print_package_banner(package);
    if names.is_empty() {
        println!("{}", "No rebuilds required.".dimmed());
        println!();
        return Ok(());
    }
    print_names("Required Rebuilds", &names);
    println!(
        "{}: {}",
        "Total".dimmed(),
        names.len().to_string().yellow()
    );
    Ok(())
}
