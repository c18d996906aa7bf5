//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::Result;
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<ToneConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: ToneConfig = serde_yaml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
audio:
  sample_rate: 48000
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.audio.buffer_size, 512);
        assert_eq!(config.synth.frequency_hz, 440.0);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let yaml = r#"
audio:
  sample_rate: 100
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        assert!(load_config(file.path()).is_err());
    }
}
