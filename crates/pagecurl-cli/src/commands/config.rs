use std::path::Path;

use anyhow::Result;

use pagecurl_core::AppConfig;

pub fn run(config: &AppConfig, config_path: &Path, default: bool, path: bool, init: bool) -> Result<()> {
    if path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config already exists at {}", config_path.display());
        } else {
            AppConfig::default().save_to(config_path)?;
            println!("Wrote default config to {}", config_path.display());
        }
        return Ok(());
    }

    let rendered = if default {
        AppConfig::default().to_toml()?
    } else {
        config.to_toml()?
    };
    print!("{}", rendered);

    Ok(())
}
