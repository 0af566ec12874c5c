use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::parser::ParserOptions;
use crate::catalog::sync::SyncOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Keep blank lines inside section bodies instead of dropping
    /// them (the legacy behavior loses paragraph breaks).
    pub keep_blank_lines: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            keep_blank_lines: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Page size for the remote listing snapshot.
    pub list_limit: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self { list_limit: 200 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    pub request_delay_ms: u64,
    pub label_fallback: bool,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1500,
            label_fallback: true,
            max_retries: 3,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    pub parser: ParserConfig,
    pub remote: RemoteConfig,
    pub pacing: PacingConfig,
}

impl SyncConfig {
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            keep_blank_lines: self.parser.keep_blank_lines,
        }
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            request_delay: Duration::from_millis(self.pacing.request_delay_ms),
            label_fallback: self.pacing.label_fallback,
            max_retries: self.pacing.max_retries,
            retry_base_delay: Duration::from_millis(self.pacing.retry_base_delay_ms),
            retry_max_delay: Duration::from_millis(self.pacing.retry_max_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialSyncConfig {
    parser: Option<ParserConfig>,
    remote: Option<RemoteConfig>,
    pacing: Option<PacingConfig>,
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u32(var: &str, fallback: u32) -> u32 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u32>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

fn validate(cfg: &SyncConfig) -> Result<()> {
    if cfg.remote.list_limit == 0 {
        return Err(anyhow!("invalid list limit: must be >= 1"));
    }
    if cfg.pacing.retry_max_delay_ms < cfg.pacing.retry_base_delay_ms {
        return Err(anyhow!(
            "invalid retry delays: max must be >= base"
        ));
    }
    if cfg.pacing.max_retries > 10 {
        return Err(anyhow!("invalid max retries: use at most 10"));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("ISSUESYNC_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".config").join("issuesync.toml"))
}

fn merge_file_config(base: &mut SyncConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialSyncConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    if let Some(parser) = parsed.parser {
        base.parser = parser;
    }
    if let Some(remote) = parsed.remote {
        base.remote = remote;
    }
    if let Some(pacing) = parsed.pacing {
        base.pacing = pacing;
    }
    Ok(())
}

/// Defaults, overlaid with the optional TOML file, overlaid with
/// `ISSUESYNC_*` environment variables, then validated.
pub fn load_config() -> Result<SyncConfig> {
    let mut cfg = SyncConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.parser.keep_blank_lines =
        env_or_bool("ISSUESYNC_KEEP_BLANK_LINES", cfg.parser.keep_blank_lines);
    cfg.remote.list_limit = env_or_u32("ISSUESYNC_LIST_LIMIT", cfg.remote.list_limit);
    cfg.pacing.request_delay_ms =
        env_or_u64("ISSUESYNC_REQUEST_DELAY_MS", cfg.pacing.request_delay_ms);
    cfg.pacing.label_fallback = env_or_bool("ISSUESYNC_LABEL_FALLBACK", cfg.pacing.label_fallback);
    cfg.pacing.max_retries = env_or_u32("ISSUESYNC_MAX_RETRIES", cfg.pacing.max_retries);
    cfg.pacing.retry_base_delay_ms = env_or_u64(
        "ISSUESYNC_RETRY_BASE_DELAY_MS",
        cfg.pacing.retry_base_delay_ms,
    );
    cfg.pacing.retry_max_delay_ms = env_or_u64(
        "ISSUESYNC_RETRY_MAX_DELAY_MS",
        cfg.pacing.retry_max_delay_ms,
    );

    validate(&cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = SyncConfig::default();
        assert!(validate(&cfg).is_ok());
        assert_eq!(cfg.pacing.request_delay_ms, 1500);
        assert_eq!(cfg.remote.list_limit, 200);
        assert!(cfg.pacing.label_fallback);
    }

    #[test]
    fn zero_list_limit_is_rejected() {
        let mut cfg = SyncConfig::default();
        cfg.remote.list_limit = 0;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn inverted_retry_delays_are_rejected() {
        let mut cfg = SyncConfig::default();
        cfg.pacing.retry_base_delay_ms = 5000;
        cfg.pacing.retry_max_delay_ms = 1000;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn sync_options_carry_the_pacing_values() {
        let mut cfg = SyncConfig::default();
        cfg.pacing.request_delay_ms = 250;
        cfg.pacing.max_retries = 1;

        let opts = cfg.sync_options();
        assert_eq!(opts.request_delay, Duration::from_millis(250));
        assert_eq!(opts.max_retries, 1);
    }

    #[test]
    fn partial_file_sections_overlay_defaults() {
        let raw = "[pacing]\nrequest_delay_ms = 100\nlabel_fallback = false\nmax_retries = 2\nretry_base_delay_ms = 10\nretry_max_delay_ms = 20\n";
        let parsed: PartialSyncConfig = toml::from_str(raw).unwrap();

        let mut cfg = SyncConfig::default();
        if let Some(pacing) = parsed.pacing {
            cfg.pacing = pacing;
        }

        assert_eq!(cfg.pacing.request_delay_ms, 100);
        assert!(!cfg.pacing.label_fallback);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.remote.list_limit, 200);
    }
}
