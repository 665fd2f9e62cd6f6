use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Directory containing `model.onnx` and `tokenizer.json`.
    pub dir: PathBuf,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_max_tokens() -> usize {
    512
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    /// Path to the JSON dataset (array of `{Title, Content}` objects).
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory of static frontend assets served at `/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.model.max_tokens == 0 {
        anyhow::bail!("model.max_tokens must be > 0");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("qlens.toml");
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_load_minimal_config_applies_defaults() {
        let (_tmp, path) = write_config(
            r#"
[model]
dir = "./albert_model"

[corpus]
path = "./wikipedia_dataset.json"
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.model.max_tokens, 512);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.static_dir, PathBuf::from("./static"));
    }

    #[test]
    fn test_load_full_config() {
        let (_tmp, path) = write_config(
            r#"
[model]
dir = "/opt/models/classifier"
max_tokens = 256

[corpus]
path = "/opt/data/records.json"

[server]
bind = "127.0.0.1:9090"
static_dir = "/opt/share/qlens/static"
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.model.dir, PathBuf::from("/opt/models/classifier"));
        assert_eq!(config.model.max_tokens, 256);
        assert_eq!(config.server.bind, "127.0.0.1:9090");
        assert_eq!(
            config.server.static_dir,
            PathBuf::from("/opt/share/qlens/static")
        );
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let (_tmp, path) = write_config(
            r#"
[model]
dir = "./m"
max_tokens = 0

[corpus]
path = "./d.json"
"#,
        );
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/qlens.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
