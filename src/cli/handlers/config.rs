use std::path::Path;

use crate::cli::commands::{ConfigAction, ConfigCmd};
use crate::cli::output::config_to_json;
use crate::io::config_io;

pub fn cmd_config(args: ConfigCmd, store_path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_io::config_path_for(store_path);
    match args.action {
        ConfigAction::Show => {
            let config = config_io::load_config(&config_path)?;
            if json {
                let out = config_to_json(&config, &store_path.display().to_string());
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("store = {}", store_path.display());
                println!("max_size = {}", config.list.max_size);
                println!(
                    "week_start = {}",
                    toml::Value::try_from(config.list.week_start)?
                );
            }
        }
        ConfigAction::Set(set) => {
            let (_config, mut doc) = config_io::read_config(&config_path)?;
            config_io::set_value(&mut doc, &set.key, &set.value)?;
            config_io::write_config(&config_path, &doc)?;
        }
    }
    Ok(())
}
