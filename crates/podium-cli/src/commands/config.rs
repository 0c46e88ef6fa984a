use anyhow::{Context, Result};
use podium_etl::{config, Config};

const KEYS: &str = "database_path, instruments_path, names_path, assignments_path, log_level";

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());
    println!(
        "File exists: {}\n",
        if config_path.exists() { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    for line in rendered.lines() {
        println!("  {line}");
    }

    println!("\nPriority: CLI args > ENV vars (PODIUM_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole file.
pub fn get_config(config: &Config, key: Option<&str>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();
        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{contents}");
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'podium config init' to create it.");
        }
        return Ok(());
    };

    match key {
        "database_path" => println!("{}", config.database_path.display()),
        "instruments_path" => println!("{}", config.instruments_path.display()),
        "names_path" => println!("{}", config.names_path.display()),
        "assignments_path" => println!("{}", config.assignments_path.display()),
        "log_level" => println!("{}", config.log_level),
        _ => anyhow::bail!("Unknown config key: {key}\n\nValid keys: {KEYS}"),
    }

    Ok(())
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to point podium at your roster files.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
