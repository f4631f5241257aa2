use serde::{Deserialize, Serialize};

/// slimctl configuration file (YAML).
///
/// Example `slimctl.yaml`:
/// ```yaml
/// input-format: protobuf
/// output-format: yaml
/// pretty: true
/// log-level: pkg_slim=debug
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlimctlConfigFile {
    #[serde(default, alias = "input-format")]
    pub input_format: Option<String>,
    #[serde(default, alias = "output-format")]
    pub output_format: Option<String>,
    #[serde(default)]
    pub pretty: Option<bool>,
    #[serde(default, alias = "log-level")]
    pub log_level: Option<String>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}
