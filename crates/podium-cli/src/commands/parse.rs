use podium_core::names::{is_nickname_placeholder, match_key, parse_name};

/// Print how each name would be classified during ingestion.
pub fn show_parse(names: &[String]) {
    for raw in names {
        let normalized = raw.trim().to_lowercase();
        let parsed = parse_name(&normalized);

        println!("{raw}");
        let Some(shape) = parsed.shape() else {
            println!("  shape: (unparsed)\n");
            continue;
        };

        let name = parsed.into_person_name();
        println!("  shape: {}", shape.as_str());
        println!("  first: {}", name.first_name.as_deref().unwrap_or("-"));
        println!("  middle: {}", name.middle_name.as_deref().unwrap_or("-"));
        println!("  last: {}", name.last_name.as_deref().unwrap_or("-"));
        if name.first_name.as_deref().is_some_and(is_nickname_placeholder) {
            println!("  first name is an initial; matching on middle name");
        }
        println!("  match key: {}\n", match_key(&name).unwrap_or("-"));
    }
}
