//! Runtime configuration.
//!
//! Resolution order, later wins: built-in defaults, `config.json` in the
//! data directory, environment variables, command-line arguments.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::calendar::MonthKey;
use crate::logging::{default_log_level, normalize_level};

pub const APP_DIR_NAME: &str = "habitgrid";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const ENV_DATA_DIR: &str = "HABITGRID_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "HABITGRID_LOG_LEVEL";

pub const USAGE: &str = "\
Usage: habitgrid [OPTIONS]

Options:
  --month YYYY-MM    month to open (default: current month)
  --data-dir PATH    where records, logs and exports live
  --export           write the month's charts as SVG and exit
  -h, --help         show this help";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| anyhow!("invalid {} ({}): {}", CONFIG_FILE_NAME, path.display(), e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub start_month: Option<MonthKey>,
    pub export_dir: PathBuf,
    /// Render once, export the charts and exit without a terminal UI.
    pub headless: bool,
    pub show_help: bool,
}

#[derive(Debug, Default)]
struct CliArgs {
    month: Option<MonthKey>,
    data_dir: Option<PathBuf>,
    export: bool,
    help: bool,
}

fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--month" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("--month needs a value like 2024-03"))?;
                parsed.month = Some(value.parse()?);
            }
            "--data-dir" => {
                let value = args.next().ok_or_else(|| anyhow!("--data-dir needs a path"))?;
                parsed.data_dir = Some(PathBuf::from(value));
            }
            "--export" => parsed.export = true,
            "-h" | "--help" => parsed.help = true,
            other => return Err(anyhow!("unknown argument `{other}`\n\n{USAGE}")),
        }
    }
    Ok(parsed)
}

fn default_data_dir() -> Result<PathBuf> {
    if let Some(data_home) = dirs::data_dir() {
        Ok(data_home.join(APP_DIR_NAME))
    } else {
        Err(anyhow!("Could not determine data directory"))
    }
}

impl Config {
    pub fn resolve<I, F>(args: I, env: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let cli = parse_args(args)?;

        let data_dir = match cli.data_dir {
            Some(dir) => dir,
            None => match env(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
                Some(dir) => PathBuf::from(dir),
                None => default_data_dir()?,
            },
        };

        let file = FileConfig::load(&data_dir)?;

        let log_level = env(ENV_LOG_LEVEL)
            .or(file.log_level)
            .unwrap_or_else(|| default_log_level().to_string());
        let log_level = normalize_level(&log_level)?.to_string();

        let export_dir = file
            .export_dir
            .map(|dir| if dir.is_absolute() { dir } else { data_dir.join(dir) })
            .unwrap_or_else(|| data_dir.join("export"));

        Ok(Self {
            log_dir: data_dir.join("logs"),
            data_dir,
            log_level,
            start_month: cli.month,
            export_dir,
            headless: cli.export,
            show_help: cli.help,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::resolve(std::env::args().skip(1), |key| std::env::var(key).ok())
    }
}
