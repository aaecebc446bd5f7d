/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub rules: RulesConfig,
    pub rng_seed: Option<u64>,
}

/// Clock periods for the three independent tick handlers.
#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub player_tick_ms: u64,
    pub agent_tick_ms: u64,
    pub pen_tick_ms: u64,
}

/// Tick thresholds and point values. Counted in agent ticks (mode
/// thresholds) or pen ticks (release interval).
#[derive(Clone, Debug, PartialEq)]
pub struct RulesConfig {
    pub pursuit_ticks: u32,
    pub patrol_ticks: u32,
    pub vulnerable_ticks: u32,
    pub pen_release_ticks: u32,
    pub lives: u32,
    pub dot_points: u32,
    pub energizer_points: u32,
    pub capture_bonus: u32,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least 1")]
    ZeroDuration { field: &'static str },
    #[error("patrol_ticks ({patrol}) must be greater than pursuit_ticks ({pursuit})")]
    PatrolBeforePursuit { pursuit: u32, patrol: u32 },
}

impl RulesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("pursuit_ticks", self.pursuit_ticks),
            ("vulnerable_ticks", self.vulnerable_ticks),
            ("pen_release_ticks", self.pen_release_ticks),
            ("lives", self.lives),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDuration { field });
            }
        }
        if self.patrol_ticks <= self.pursuit_ticks {
            return Err(ConfigError::PatrolBeforePursuit {
                pursuit: self.pursuit_ticks,
                patrol: self.patrol_ticks,
            });
        }
        Ok(())
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_player_tick")]
    player_tick_ms: u64,
    #[serde(default = "default_agent_tick")]
    agent_tick_ms: u64,
    #[serde(default = "default_pen_tick")]
    pen_tick_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_pursuit")]
    pursuit_ticks: u32,
    #[serde(default = "default_patrol")]
    patrol_ticks: u32,
    #[serde(default = "default_vulnerable")]
    vulnerable_ticks: u32,
    #[serde(default = "default_pen_release")]
    pen_release_ticks: u32,
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default = "default_dot_points")]
    dot_points: u32,
    #[serde(default = "default_energizer_points")]
    energizer_points: u32,
    #[serde(default = "default_capture_bonus")]
    capture_bonus: u32,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    rng_seed: Option<u64>,
}

// ── Defaults ──

fn default_player_tick() -> u64 { 160 }
fn default_agent_tick() -> u64 { 220 }
fn default_pen_tick() -> u64 { 220 }

fn default_pursuit() -> u32 { 100 }
fn default_patrol() -> u32 { 135 }
fn default_vulnerable() -> u32 { 35 }
fn default_pen_release() -> u32 { 17 }
fn default_lives() -> u32 { 3 }
fn default_dot_points() -> u32 { 10 }
fn default_energizer_points() -> u32 { 50 }
fn default_capture_bonus() -> u32 { 200 }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            player_tick_ms: default_player_tick(),
            agent_tick_ms: default_agent_tick(),
            pen_tick_ms: default_pen_tick(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            pursuit_ticks: default_pursuit(),
            patrol_ticks: default_patrol(),
            vulnerable_ticks: default_vulnerable(),
            pen_release_ticks: default_pen_release(),
            lives: default_lives(),
            dot_points: default_dot_points(),
            energizer_points: default_energizer_points(),
            capture_bonus: default_capture_bonus(),
        }
    }
}

impl From<TomlRules> for RulesConfig {
    fn from(t: TomlRules) -> Self {
        RulesConfig {
            pursuit_ticks: t.pursuit_ticks,
            patrol_ticks: t.patrol_ticks,
            vulnerable_ticks: t.vulnerable_ticks,
            pen_release_ticks: t.pen_release_ticks,
            lives: t.lives,
            dot_points: t.dot_points,
            energizer_points: t.energizer_points,
            capture_bonus: t.capture_bonus,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        TomlRules::default().into()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        GameConfig::from_toml(load_toml(&candidate_dirs()))
    }

    /// Parse config text directly. Unparseable text yields the defaults.
    pub fn from_toml_str(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => GameConfig::from_toml(cfg),
            Err(e) => {
                warn!(error = %e, "config parse error, using default settings");
                GameConfig::default()
            }
        }
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let rules: RulesConfig = cfg.rules.into();
        let rules = match rules.validate() {
            Ok(()) => rules,
            Err(e) => {
                warn!(error = %e, "invalid [rules], using default rules");
                RulesConfig::default()
            }
        };

        GameConfig {
            speed: SpeedConfig {
                player_tick_ms: cfg.speed.player_tick_ms.max(1),
                agent_tick_ms: cfg.speed.agent_tick_ms.max(1),
                pen_tick_ms: cfg.speed.pen_tick_ms.max(1),
            },
            rules,
            rng_seed: cfg.general.rng_seed,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First readable config.toml in the candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match read_toml(&path) {
            Some(cfg) => return cfg,
            None => return TomlConfig::default(),
        }
    }
    info!("no config.toml found, using defaults");
    TomlConfig::default()
}

fn read_toml(path: &Path) -> Option<TomlConfig> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read config");
            return None;
        }
    };
    match toml::from_str::<TomlConfig>(&text) {
        Ok(cfg) => {
            info!(path = %path.display(), "loaded config");
            Some(cfg)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config parse error, using default settings");
            None
        }
    }
}
