//! `pkgdeps stats` command implementation.

use colored::Colorize;

use super::{with_store, Paths};

/// Run the stats command.
pub fn run(paths: &Paths) -> pkgdeps::Result<()> {
    let stats = with_store(paths, |store| store.stats())?;

    // Get database size
    let db_size = match std::fs::metadata(&paths.database) {
        Ok(meta) => format_size(meta.len()),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to get database file size");
            "size unknown".to_string()
        }
    };

    println!("{}", "pkgdeps Database Statistics".cyan().bold());
    println!();
    println!(
        "  {}: {} ({})",
        "Database".white().bold(),
        paths.database.display(),
        db_size
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
    println!(
        "  {}: {}",
        "Rebuild entries".white().bold(),
        stats.todo.to_string().green()
    );
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_pick_largest_unit() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
