//! Common display utilities for CLI commands.

use colored::Colorize;
use pkgdeps::Dependency;

/// Print the bold `Package: name` banner that opens every query.
pub fn print_package_banner(name: &str) {
    println!("{} {name}", "Package:".bold());
    println!();
}

/// Print a two-column table of dependency names and releases.
///
/// Columns are padded to the longest name, or to the header when that is
/// wider.
pub fn print_dependency_table(header: (&str, &str), deps: &[Dependency]) {
    let width = deps
        .iter()
        .map(|dep| dep.name.len())
        .chain(std::iter::once(header.0.len()))
        .max()
        .unwrap_or_default();

    println!(
        "{}",
        format!("{:<width$}  {}", header.0, header.1).bold()
    );
    for dep in deps {
        println!("{:<width$}  {}", dep.name, dep.release);
    }
    println!();
}

/// Print a bold header followed by one name per line.
pub fn print_names(header: &str, names: &[String]) {
    println!("{}", header.bold());
    for name in names {
        println!("{name}");
    }
    println!();
}

/// Print a `label: count` line with the label padded like a form.
pub fn print_counter(label: &str, count: usize) {
    println!("{:<10}: {}", label, count.to_string().green());
}
