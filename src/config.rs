use std::{
    fs::{create_dir_all, read_to_string, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::{error::ImtError, fetch::MY_USER_AGENT};

const CONFIG_DIR: &str = ".config/imt";

/// User overrides stored in `~/.config/imt/config.json`.
#[derive(Debug, Deserialize, Clone, Serialize, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    #[serde(rename = "vendor-dir")]
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor_dir: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    concurrency: Option<usize>,

    /// seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    retries: Option<u32>,
}

impl GlobalConfig {
    pub fn path() -> Result<PathBuf, ImtError> {
        Ok(home_dir()
            .ok_or(ImtError::NotFoundHomeDir)?
            .join(CONFIG_DIR)
            .join("config.json"))
    }

    pub fn new() -> Result<GlobalConfig, ImtError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<GlobalConfig, ImtError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let cp: Self = serde_json::from_str(&read_to_string(path)?)?;

        Ok(cp)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ImtError> {
        let invalid = || ImtError::InvalidConfigValue {
            key: key.to_owned(),
            value: value.to_owned(),
        };

        match key {
            "vendor-dir" => {
                if value.is_empty() {
                    return Err(invalid());
                }
                self.vendor_dir = Some(value.to_owned());
            }
            "concurrency" => {
                let n: usize = value.parse().map_err(|_| invalid())?;
                if n == 0 {
                    return Err(invalid());
                }
                self.concurrency = Some(n);
            }
            "timeout" => self.timeout = Some(value.parse().map_err(|_| invalid())?),
            "retries" => self.retries = Some(value.parse().map_err(|_| invalid())?),
            _ => return Err(ImtError::UnknownConfigKey(key.to_owned())),
        }

        Ok(())
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ImtError> {
        match key {
            "vendor-dir" => self.vendor_dir = None,
            "concurrency" => self.concurrency = None,
            "timeout" => self.timeout = None,
            "retries" => self.retries = None,
            _ => return Err(ImtError::UnknownConfigKey(key.to_owned())),
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), ImtError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ImtError> {
        if let Some(dir) = path.parent() {
            create_dir_all(dir)?;
        }
        let mut f = File::create(path)?;
        let content = serde_json::to_string_pretty(&self)?;
        f.write_all(content.as_bytes())?;

        Ok(())
    }
}

/// Settings threaded through a vendoring run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorOptions {
    pub vendor_root: PathBuf,
    pub concurrency: usize,
    pub timeout: Duration,
    pub retries: u32,
    pub user_agent: String,
}

impl Default for VendorOptions {
    fn default() -> Self {
        Self {
            vendor_root: PathBuf::from("_vendor"),
            concurrency: 8,
            timeout: Duration::from_secs(30),
            retries: 2,
            user_agent: MY_USER_AGENT.to_owned(),
        }
    }
}

impl VendorOptions {
    pub fn from_config(config: &GlobalConfig) -> Self {
        let default = Self::default();

        Self {
            vendor_root: config
                .vendor_dir
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or(default.vendor_root),
            concurrency: config.concurrency.unwrap_or(default.concurrency),
            timeout: config
                .timeout
                .map(Duration::from_secs)
                .unwrap_or(default.timeout),
            retries: config.retries.unwrap_or(default.retries),
            user_agent: default.user_agent,
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::error::ErrorKind;

    use super::*;

    #[test]
    fn set_unset_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("imt").join("config.json");

        let mut config = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(config, GlobalConfig::default());

        config.set("vendor-dir", "vendor").unwrap();
        config.set("concurrency", "2").unwrap();
        config.set("timeout", "5").unwrap();
        config.save_to(&path).unwrap();

        let mut loaded = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        loaded.unset("timeout").unwrap();
        let options = VendorOptions::from_config(&loaded);
        assert_eq!(options.vendor_root, PathBuf::from("vendor"));
        assert_eq!(options.concurrency, 2);
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.retries, 2);
    }

    #[test]
    fn rejects_bad_input() {
        let mut config = GlobalConfig::default();

        let error = config.set("registry", "x").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
        assert!(matches!(config.unset("registry"), Err(ImtError::UnknownConfigKey(_))));

        assert!(matches!(
            config.set("concurrency", "0"),
            Err(ImtError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.set("timeout", "soon"),
            Err(ImtError::InvalidConfigValue { .. })
        ));
        assert_eq!(config, GlobalConfig::default());
    }
}
