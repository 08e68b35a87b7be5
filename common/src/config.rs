use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub trait ConfigSerializer<TConfig> {
    fn serialize(&self, config: &TConfig) -> Result<String, String>;
    fn deserialize(&self, content: &str) -> Result<TConfig, String>;
}

pub trait ConfigContentProvider {
    fn get_config_content(&self) -> Result<Option<String>, String>;
    fn set_config_content(&self, content: &str) -> Result<(), String>;
}

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Default)]
pub struct YamlConfigSerializer;

impl<TConfig> ConfigSerializer<TConfig> for YamlConfigSerializer
where
    TConfig: for<'de> Deserialize<'de> + Serialize,
{
    fn serialize(&self, config: &TConfig) -> Result<String, String> {
        serde_yaml_ng::to_string(config).map_err(|e| format!("Failed to serialize config: {}", e))
    }

    fn deserialize(&self, content: &str) -> Result<TConfig, String> {
        serde_yaml_ng::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))
    }
}

pub struct FileContentConfigProvider {
    file_path: PathBuf,
}

impl FileContentConfigProvider {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigContentProvider for FileContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(&self.file_path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!(
                "Failed to read config file {}: {}",
                self.file_path.display(),
                err
            )),
        }
    }

    fn set_config_content(&self, content: &str) -> Result<(), String> {
        std::fs::write(&self.file_path, content).map_err(|e| {
            format!("Failed to write config file {}: {}", self.file_path.display(), e)
        })
    }
}

/// Loads a validated config, falling back to `TConfig::default()` when the
/// source has no content.
pub struct ConfigManager<TConfigContentProvider, TConfigSerializer = YamlConfigSerializer> {
    config_content_provider: TConfigContentProvider,
    config_serializer: TConfigSerializer,
}

impl ConfigManager<FileContentConfigProvider, YamlConfigSerializer> {
    pub fn from_yaml_file(file_path: impl AsRef<Path>) -> Self {
        Self::new(FileContentConfigProvider::new(file_path), YamlConfigSerializer)
    }
}

impl<TConfigContentProvider, TConfigSerializer> ConfigManager<TConfigContentProvider, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
{
    pub fn new(config_content_provider: TConfigContentProvider, config_serializer: TConfigSerializer) -> Self {
        Self {
            config_content_provider,
            config_serializer,
        }
    }

    pub fn load<TConfig>(&self) -> Result<TConfig, String>
    where
        TConfig: Validate + Default,
        TConfigSerializer: ConfigSerializer<TConfig>,
    {
        let Some(content) = self.config_content_provider.get_config_content()? else {
            return Ok(TConfig::default());
        };

        let config = self.config_serializer.deserialize(&content)?;
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;
        Ok(config)
    }

    pub fn store<TConfig>(&self, config: &TConfig) -> Result<(), String>
    where
        TConfig: Validate,
        TConfigSerializer: ConfigSerializer<TConfig>,
    {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;
        let content = self.config_serializer.serialize(config)?;
        self.config_content_provider.set_config_content(&content)
    }
}
