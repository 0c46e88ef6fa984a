use anyhow::Result;
use podium_core::report::ReportKind;
use podium_core::schema::Database;
use std::path::Path;

/// Print one report, or list them all when `name` is `None`.
pub fn show_report(db_path: &Path, name: Option<&str>) -> Result<()> {
    let Some(name) = name else {
        println!("Available reports:\n");
        for kind in ReportKind::ALL {
            println!("  {:<32} {}", kind.view_name(), kind.title());
        }
        return Ok(());
    };

    let kind: ReportKind = name.parse()?;

    super::require_database(db_path)?;
    let db = Database::open(db_path)?;
    let table = db.query_report(kind)?;

    println!("\n{}\n", kind.title());
    if table.rows.is_empty() {
        println!("  (no rows)");
    } else {
        print!("{}", table.render_text());
        println!("\n{} row(s)", table.rows.len());
    }

    Ok(())
}
