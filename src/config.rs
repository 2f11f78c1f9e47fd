//! Service configuration.
//!
//! Values come from an optional JSON file named by `CHESS_CONFIG`, then
//! individual `CHESS_*` environment variables override single fields.
//! Anything left unset keeps its `Default`.

use std::fs;

use serde::Deserialize;

use crate::chess_errors::{ChessError, ChessResult};
use crate::status::game_status::StatusOptions;

pub const CONFIG_FILE_VAR: &str = "CHESS_CONFIG";
pub const ENGINE_PATH_VAR: &str = "CHESS_ENGINE_PATH";
pub const ENGINE_MOVETIME_VAR: &str = "CHESS_ENGINE_MOVETIME_MS";
pub const ENGINE_TIMEOUT_MARGIN_VAR: &str = "CHESS_ENGINE_TIMEOUT_MARGIN_MS";
pub const FALLBACK_VAR: &str = "CHESS_FALLBACK_TO_HEURISTIC";
pub const STALEMATE_AS_DRAW_VAR: &str = "CHESS_STALEMATE_AS_DRAW";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub path: String,
    pub args: Vec<String>,
    pub movetime_ms: u64,
    /// Extra time on top of `movetime_ms` before a search counts as hung.
    pub timeout_margin_ms: u64,
    pub handshake_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: "stockfish".to_owned(),
            args: Vec::new(),
            movetime_ms: 500,
            timeout_margin_ms: 500,
            handshake_timeout_ms: 5_000,
        }
    }
}

impl EngineConfig {
    /// Hard deadline for one search; always strictly longer than the movetime.
    pub fn search_deadline_ms(&self, movetime_ms: u64) -> u64 {
        movetime_ms.saturating_add(self.timeout_margin_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// External engine for bot moves; `None` means heuristic only.
    pub engine: Option<EngineConfig>,
    pub fallback_to_heuristic: bool,
    pub report_stalemate_as_draw: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            engine: None,
            fallback_to_heuristic: true,
            report_stalemate_as_draw: false,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> ChessResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_json(text: &str) -> ChessResult<Self> {
        serde_json::from_str(text).map_err(|e| ChessError::InvalidConfig(e.to_string()))
    }

    /// Builds a config from a variable lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> ChessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_FILE_VAR) {
            Some(path) => {
                let text = fs::read_to_string(&path).map_err(|e| {
                    ChessError::InvalidConfig(format!("cannot read {path}: {e}"))
                })?;
                Self::from_json(&text)?
            }
            None => Self::default(),
        };

        if let Some(path) = lookup(ENGINE_PATH_VAR) {
            config.engine.get_or_insert_with(EngineConfig::default).path = path;
        }
        if let Some(value) = lookup(ENGINE_MOVETIME_VAR) {
            config
                .engine
                .get_or_insert_with(EngineConfig::default)
                .movetime_ms = parse_number(ENGINE_MOVETIME_VAR, &value)?;
        }
        if let Some(value) = lookup(ENGINE_TIMEOUT_MARGIN_VAR) {
            config
                .engine
                .get_or_insert_with(EngineConfig::default)
                .timeout_margin_ms = parse_number(ENGINE_TIMEOUT_MARGIN_VAR, &value)?;
        }
        if let Some(value) = lookup(FALLBACK_VAR) {
            config.fallback_to_heuristic = parse_flag(FALLBACK_VAR, &value)?;
        }
        if let Some(value) = lookup(STALEMATE_AS_DRAW_VAR) {
            config.report_stalemate_as_draw = parse_flag(STALEMATE_AS_DRAW_VAR, &value)?;
        }

        Ok(config)
    }

    pub fn status_options(&self) -> StatusOptions {
        StatusOptions {
            report_stalemate_as_draw: self.report_stalemate_as_draw,
        }
    }
}

fn parse_number(var: &str, value: &str) -> ChessResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ChessError::InvalidConfig(format!("{var} must be a number, got {value:?}")))
}

fn parse_flag(var: &str, value: &str) -> ChessResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ChessError::InvalidConfig(format!(
            "{var} must be a boolean, got {value:?}"
        ))),
    }
}
