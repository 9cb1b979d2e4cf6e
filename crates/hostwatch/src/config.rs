use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the host list comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    File,
    #[default]
    Console,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub mode: Mode,
    /// Seconds to wait between monitoring passes.
    #[serde(default = "default_sleep_time")]
    pub sleep_time: u64,
    /// Per-probe receive timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts_file: Option<PathBuf>,
}

fn default_sleep_time() -> u64 {
    5
}

fn default_timeout() -> u64 {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            sleep_time: default_sleep_time(),
            timeout: default_timeout(),
            hosts_file: None,
        }
    }
}

/// Host list source resolved from `mode` and `hosts_file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSource<'a> {
    File(&'a Path),
    Console,
}

impl Config {
    /// `mode = "file"` without a configured `hosts_file` is a fatal
    /// startup error.
    pub fn host_source(&self) -> Result<HostSource<'_>> {
        match self.mode {
            Mode::File => self
                .hosts_file
                .as_deref()
                .map(HostSource::File)
                .ok_or_else(|| anyhow!("mode is \"file\" but no hosts_file is configured")),
            Mode::Console => Ok(HostSource::Console),
        }
    }
}

pub fn open_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
    let config: Config =
        serde_json::from_str(&content).context("Failed to parse configuration file")?;
    Ok(config)
}

pub fn write_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = Config {
        mode: Mode::File,
        hosts_file: Some(PathBuf::from("hosts.txt")),
        ..Default::default()
    };
    let content =
        serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?;
    fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
    Ok(())
}
