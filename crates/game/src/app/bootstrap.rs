use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chase_engine::{ConfigError, EngineConfig};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::script::InputScript;

pub(crate) const LEVELS_DIR_ENV_VAR: &str = "CHASE_LEVELS_DIR";
const DEFAULT_LEVELS_DIR: &str = "levels";
const DEFAULT_MAX_TICKS: u64 = 100_000;

#[derive(Debug, Error)]
pub(crate) enum StartupError {
    #[error("missing value for {flag}")]
    MissingValue { flag: String },
    #[error("invalid {flag} value '{value}' (expected {expected})")]
    InvalidValue {
        flag: String,
        value: String,
        expected: &'static str,
    },
    #[error("unknown argument '{arg}'\n{usage}")]
    UnknownArgument { arg: String, usage: String },
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {detail}")]
    ParseJson { path: PathBuf, detail: String },
    #[error("invalid engine config in {path}: {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchOptions {
    pub(crate) levels_dir: Option<PathBuf>,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) script_path: Option<PathBuf>,
    pub(crate) max_ticks: u64,
    pub(crate) visualize: bool,
    pub(crate) show_usage: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            levels_dir: None,
            config_path: None,
            script_path: None,
            max_ticks: DEFAULT_MAX_TICKS,
            visualize: false,
            show_usage: false,
        }
    }
}

pub(crate) struct AppWiring {
    pub(crate) config: EngineConfig,
    pub(crate) levels_dir: PathBuf,
    pub(crate) script: InputScript,
    pub(crate) max_ticks: u64,
    pub(crate) visualize: bool,
}

pub(crate) enum Launch {
    Run(AppWiring),
    ShowUsage,
}

pub(crate) fn build_app() -> Result<Launch, StartupError> {
    init_tracing();
    info!("=== Chase Startup ===");

    let options = parse_args(env::args().skip(1))?;
    if options.show_usage {
        return Ok(Launch::ShowUsage);
    }
    let env_levels_dir = env::var(LEVELS_DIR_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty());
    wire_app(options, env_levels_dir).map(Launch::Run)
}

pub(crate) fn usage_text() -> String {
    format!(
        "usage: chase [--levels <dir>] [--config <file>] [--script <file>] \
[--max-ticks <n>] [--visualize]\n\
levels directory falls back to ${LEVELS_DIR_ENV_VAR}, then ./{DEFAULT_LEVELS_DIR}"
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

pub(crate) fn parse_args<I>(args: I) -> Result<LaunchOptions, StartupError>
where
    I: IntoIterator<Item = String>,
{
    let args = args.into_iter().collect::<Vec<_>>();
    let mut options = LaunchOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => {
                options.show_usage = true;
                index += 1;
            }
            "--levels" => {
                options.levels_dir = Some(PathBuf::from(flag_value(&args, index)?));
                index += 2;
            }
            "--config" => {
                options.config_path = Some(PathBuf::from(flag_value(&args, index)?));
                index += 2;
            }
            "--script" => {
                options.script_path = Some(PathBuf::from(flag_value(&args, index)?));
                index += 2;
            }
            "--max-ticks" => {
                let value = flag_value(&args, index)?;
                options.max_ticks =
                    value
                        .parse::<u64>()
                        .map_err(|_| StartupError::InvalidValue {
                            flag: "--max-ticks".to_string(),
                            value: value.to_string(),
                            expected: "u64",
                        })?;
                index += 2;
            }
            "--visualize" => {
                options.visualize = true;
                index += 1;
            }
            other => {
                return Err(StartupError::UnknownArgument {
                    arg: other.to_string(),
                    usage: usage_text(),
                });
            }
        }
    }
    Ok(options)
}

fn flag_value(args: &[String], index: usize) -> Result<&str, StartupError> {
    args.get(index + 1)
        .map(String::as_str)
        .ok_or_else(|| StartupError::MissingValue {
            flag: args[index].clone(),
        })
}

/// Resolves the levels directory (flag, then env value, then default) and
/// loads the optional config and script files.
pub(crate) fn wire_app(
    options: LaunchOptions,
    env_levels_dir: Option<String>,
) -> Result<AppWiring, StartupError> {
    let levels_dir = options
        .levels_dir
        .or_else(|| env_levels_dir.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LEVELS_DIR));

    let config = match &options.config_path {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let script = match &options.script_path {
        Some(path) => load_json::<InputScript>(path)?,
        None => InputScript::default(),
    };

    info!(
        levels_dir = %levels_dir.display(),
        player_speed = config.player_speed,
        hunter_speed = config.hunter_speed,
        prey_speed = config.prey_speed,
        life_limit = config.life_limit,
        script_steps = script.steps.len(),
        max_ticks = options.max_ticks,
        visualize = options.visualize,
        "app_configured"
    );
    Ok(AppWiring {
        config,
        levels_dir,
        script,
        max_ticks: options.max_ticks,
        visualize: options.visualize,
    })
}

pub(crate) fn load_config(path: &Path) -> Result<EngineConfig, StartupError> {
    let config = load_json::<EngineConfig>(path)?;
    config
        .validate()
        .map_err(|source| StartupError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(config)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StartupError> {
    let raw = fs::read_to_string(path).map_err(|source| StartupError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&raw).map_err(|detail| StartupError::ParseJson {
        path: path.to_path_buf(),
        detail,
    })
}

fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(value) => Ok(value),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(source.to_string())
            } else {
                Err(format!("at {path}: {source}"))
            }
        }
    }
}
