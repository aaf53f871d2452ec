//! Configuration commands

use anyhow::{bail, Result};

use marquee_core::Config;

use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;

pub fn run(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => show(output),
        ConfigCommands::Set { key, value } => set(&key, &value, output),
    }
}

fn show(output: &Output) -> Result<()> {
    let config = Config::load()?;
    match output.format {
        OutputFormat::Json => {
            output.value(&serde_json::to_value(&config)?);
        }
        _ => {
            println!("data_dir:  {}", config.data_dir.display());
            println!(
                "admin_uid: {}",
                config.admin_uid.as_deref().unwrap_or("(not set)")
            );
            println!();
            println!("config file: {}", Config::config_file_path().display());
        }
    }
    Ok(())
}

fn set(key: &str, value: &str, output: &Output) -> Result<()> {
    let mut config = Config::load()?;
    match key {
        "data_dir" => config.data_dir = value.into(),
        "admin_uid" => {
            config.admin_uid = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }
        other => bail!("unknown configuration key '{}' (data_dir, admin_uid)", other),
    }
    config.save()?;
    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}
