//! Configuration

use crate::queue::QueueDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;
use tracing::{info, warn};

/// Configuration for the runner binary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How queued tasks are picked
    pub strategy: Strategy,

    /// Maximum drain passes, unbounded when absent
    pub max_iterations: Option<usize>,

    /// Seed for the random strategy
    pub random_seed: u64,

    /// Task budget for the random strategy
    pub max_tasks: usize,

    /// Demo tasks added to every push queue before running
    pub seed_tasks_per_queue: usize,

    /// Queues to declare
    pub queues: Vec<QueueDescriptor>,
}

/// Scheduling strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Drain queues in order until quiescence
    #[default]
    Drain,
    /// Execute seeded random picks across queues
    Random,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::Drain,
            max_iterations: None,
            random_seed: crate::sampler::DEFAULT_RANDOM_SEED,
            max_tasks: crate::sampler::DEFAULT_MAX_TASKS,
            seed_tasks_per_queue: 3,
            queues: vec![QueueDescriptor::push("default")],
        }
    }
}

impl Config {
    /// Load configuration from file, environment variables, or defaults
    pub fn load() -> crate::Result<Self> {
        if let Ok(config_path) = env::var("TASK_RUNNER_CONFIG") {
            info!("Loading config from TASK_RUNNER_CONFIG: {}", config_path);
            return Self::from_file(&config_path);
        }

        let default_paths = [
            "config.yaml",
            "config.toml",
            "config/config.yaml",
            "config/config.toml",
        ];

        for path in default_paths {
            if Path::new(path).exists() {
                info!("Loading config from: {}", path);
                return Self::from_file(path);
            }
        }

        if let Some(config) = Self::from_env()? {
            info!("Loaded config from environment variables");
            return Ok(config);
        }

        warn!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path))
            .build()
            .map_err(|e| {
                crate::RunnerError::ConfigError(format!("Failed to load config file: {}", e))
            })?;

        let config: Config = settings.try_deserialize().map_err(|e| {
            crate::RunnerError::ConfigError(format!("Failed to parse config: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Returns `None` when none of the `TASK_RUNNER_*` variables are set.
    pub fn from_env() -> crate::Result<Option<Self>> {
        let mut config = Self::default();
        let mut found_any = false;

        if let Ok(val) = env::var("TASK_RUNNER_STRATEGY") {
            config.strategy = match val.to_lowercase().as_str() {
                "drain" => Strategy::Drain,
                "random" => Strategy::Random,
                _ => {
                    return Err(crate::RunnerError::ConfigError(format!(
                        "Invalid STRATEGY: {}",
                        val
                    )))
                }
            };
            found_any = true;
        }

        if let Ok(val) = env::var("TASK_RUNNER_MAX_ITERATIONS") {
            config.max_iterations = Some(val.parse().map_err(|e| {
                crate::RunnerError::ConfigError(format!("Invalid MAX_ITERATIONS: {}", e))
            })?);
            found_any = true;
        }

        if let Ok(val) = env::var("TASK_RUNNER_RANDOM_SEED") {
            config.random_seed = val.parse().map_err(|e| {
                crate::RunnerError::ConfigError(format!("Invalid RANDOM_SEED: {}", e))
            })?;
            found_any = true;
        }

        if let Ok(val) = env::var("TASK_RUNNER_MAX_TASKS") {
            config.max_tasks = val.parse().map_err(|e| {
                crate::RunnerError::ConfigError(format!("Invalid MAX_TASKS: {}", e))
            })?;
            found_any = true;
        }

        if let Ok(val) = env::var("TASK_RUNNER_SEED_TASKS_PER_QUEUE") {
            config.seed_tasks_per_queue = val.parse().map_err(|e| {
                crate::RunnerError::ConfigError(format!("Invalid SEED_TASKS_PER_QUEUE: {}", e))
            })?;
            found_any = true;
        }

        // Comma separated, each entry `name` or `name:mode`.
        if let Ok(val) = env::var("TASK_RUNNER_QUEUES") {
            config.queues = val
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(parse_queue_entry)
                .collect::<crate::Result<Vec<_>>>()?;
            found_any = true;
        }

        if !found_any {
            return Ok(None);
        }

        config.validate()?;
        Ok(Some(config))
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.queues.is_empty() {
            return Err(crate::RunnerError::ConfigError(
                "At least one queue must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for queue in &self.queues {
            if queue.name.is_empty() {
                return Err(crate::RunnerError::ConfigError(
                    "Queue name must not be empty".to_string(),
                ));
            }
            if !seen.insert(queue.name.as_str()) {
                return Err(crate::RunnerError::ConfigError(format!(
                    "Duplicate queue name: {}",
                    queue.name
                )));
            }
        }

        if self.strategy == Strategy::Random && self.max_tasks == 0 {
            return Err(crate::RunnerError::ConfigError(
                "Max tasks must be greater than 0 for the random strategy".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_queue_entry(entry: &str) -> crate::Result<QueueDescriptor> {
    match entry.split_once(':') {
        None => Ok(QueueDescriptor::push(entry)),
        Some((name, "push")) => Ok(QueueDescriptor::push(name)),
        Some((name, "pull")) => Ok(QueueDescriptor::pull(name)),
        Some((_, mode)) => Err(crate::RunnerError::ConfigError(format!(
            "Invalid queue mode: {}",
            mode
        ))),
    }
}
