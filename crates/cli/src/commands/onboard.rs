//! `barrister onboard` — write the default config file.

use anyhow::Result;
use barrister_config::AppConfig;

pub fn run() -> Result<()> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(&config_path, AppConfig::default_toml())?;

    println!("Wrote default config to {}", config_path.display());
    println!("Set BARRISTER_API_KEY (or GROQ_API_KEY) or add api_key to the file.");
    Ok(())
}
