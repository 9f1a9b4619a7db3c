use crate::GlobalConfig;
use anyhow::{anyhow, Result};
use config::{Config, File, FileFormat};
use std::path::{Path, PathBuf};

/// 配置加载器
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// 加载配置，文件不存在时退回默认值
    pub fn load(&self) -> Result<GlobalConfig> {
        if !self.config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let config = Config::builder()
            .add_source(File::new(
                self.config_path
                    .to_str()
                    .ok_or_else(|| anyhow!("Invalid config path"))?,
                FileFormat::Toml,
            ))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 加载并校验
    pub fn load_validated(&self) -> Result<GlobalConfig> {
        let config = self.load()?;
        validate(&config)?;
        Ok(config)
    }
}

/// 配置校验
pub fn validate(config: &GlobalConfig) -> Result<()> {
    if config.monitoring.project_id.is_empty() {
        return Err(anyhow!("monitoring.project_id must be set"));
    }

    if config.monitoring.window_hours <= 0 {
        return Err(anyhow!(
            "monitoring.window_hours must be positive, got {}",
            config.monitoring.window_hours
        ));
    }

    if config.schedule.interval_secs == 0 {
        return Err(anyhow!("schedule.interval_secs must be greater than 0"));
    }

    if config.alert.endpoint.is_empty() {
        return Err(anyhow!("alert.endpoint must be set"));
    }

    Ok(())
}
