use anyhow::Result;
use podium_core::reconcile::UnmatchedReason;
use podium_core::schema::Database;
use podium_etl::reconcile::preview_links;
use std::path::Path;

pub fn show_status(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("\nDatabase does not exist: {}", db_path.display());
        println!("\n  Run `podium run` to build it");
        return Ok(());
    }

    let db = Database::open(db_path)?;
    let stats = db.stats()?;
    let (_, preview) = preview_links(&db)?;

    println!("\n📊 Podium Status\n");
    println!("  Database: {}", db_path.display());
    println!("  Instruments: {}", stats.instruments);
    println!("  Persons: {}", stats.persons);
    println!("  Assignments: {}", stats.raw_assignments);
    println!(
        "  Links: {} ({} by first name, {} by middle name)",
        stats.links, preview.first_name_links, preview.middle_name_links
    );
    println!("  Unmatched assignments: {}", preview.unmatched.len());

    for entry in &preview.unmatched {
        let name = entry.assignment.name.full_name();
        let shown = if name.is_empty() { "<no name>" } else { name.as_str() };
        println!(
            "    - {} on {}: {}",
            shown,
            entry.assignment.instrument,
            describe(entry.reason)
        );
    }

    if stats.links != preview.links {
        println!("\n  Stored links are stale; run `podium reconcile` to refresh them");
    }

    Ok(())
}

const fn describe(reason: UnmatchedReason) -> &'static str {
    match reason {
        UnmatchedReason::NoNameKey => "no usable first or middle name",
        UnmatchedReason::UnknownInstrument => "unknown instrument",
        UnmatchedReason::NoPerson => "no matching person",
    }
}
