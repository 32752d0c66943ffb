// FILE: src/cli/config.rs

use crate::error::{CompilerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub output_directory: Option<String>,
    pub custom_variables: Option<HashMap<String, String>>,
    pub fail_on_undefined: Option<bool>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| {
        CompilerError::invalid_format(format!("Cannot read config file {}: {}", config_path, e))
    })?;

    let config = parse(config_path, &config_content)?;
    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

fn parse(config_path: &str, config_content: &str) -> Result<ConfigFile> {
    if config_path.ends_with(".json") {
        serde_json::from_str(config_content)
            .map_err(|e| CompilerError::invalid_format(format!("Invalid JSON config: {}", e)))
    } else if config_path.ends_with(".toml") {
        toml::from_str(config_content)
            .map_err(|e| CompilerError::invalid_format(format!("Invalid TOML config: {}", e)))
    } else {
        Err(CompilerError::invalid_format(
            "Config file must be .json or .toml format",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_toml() {
        let config = parse(
            "scssc.toml",
            "output_directory = \"dist\"\nfail_on_undefined = true\n\n[custom_variables]\nprimary = \"navy\"\n",
        )
        .unwrap();

        assert_eq!(config.output_directory.as_deref(), Some("dist"));
        assert_eq!(config.fail_on_undefined, Some(true));
        assert_eq!(config.custom_variables.unwrap()["primary"], "navy");
    }

    #[test]
    fn test_parse_json() {
        let config = parse("scssc.json", r#"{"custom_variables": {"$gap": "4px"}}"#).unwrap();

        assert!(config.output_directory.is_none());
        assert_eq!(config.custom_variables.unwrap()["$gap"], "4px");
    }

    #[test]
    fn test_unknown_extension() {
        let err = parse("scssc.yaml", "").unwrap_err();
        assert!(err.to_string().contains(".json or .toml"));
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scssc.toml");
        fs::write(&path, "fail_on_undefined = false\n").unwrap();

        let config = load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.fail_on_undefined, Some(false));

        assert!(load(temp_dir.path().join("nope.toml").to_str().unwrap()).is_err());
    }
}
