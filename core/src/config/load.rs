use std::path::{Path, PathBuf};

use super::types::TapConfig;

/// Get the default tap data directory: ~/.mcp-tap
pub fn get_tap_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".mcp-tap"))
}

pub fn load_default() -> anyhow::Result<TapConfig> {
    // Priority 1: ~/.mcp-tap/config.toml
    // Priority 2: ./mcp-tap.toml
    let user_config = get_tap_data_dir().ok().map(|d| d.join("config.toml"));
    let local_config = Path::new("mcp-tap.toml");

    let mut cfg = match user_config.filter(|p| p.exists()) {
        Some(p) => read_config(&p)?,
        None if local_config.exists() => read_config(local_config)?,
        None => TapConfig::default(),
    };

    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok());
    Ok(cfg)
}

pub fn load_from(path: &Path) -> anyhow::Result<TapConfig> {
    let mut cfg = read_config(path)?;
    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok());
    Ok(cfg)
}

fn read_config(path: &Path) -> anyhow::Result<TapConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("read {} failed: {e}", path.display()))?;
    toml::from_str::<TapConfig>(&s)
        .map_err(|e| anyhow::anyhow!("parse {} failed: {e}", path.display()))
}

/// Environment variable overrides (highest priority below CLI flags).
pub(crate) fn apply_env_overrides<F>(cfg: &mut TapConfig, get: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = get("MCP_TAP_LOGFILE").filter(|v| !v.trim().is_empty()) {
        cfg.frame_log.logfile = Some(v);
    }
    if let Some(v) = get("MCP_TAP_PRETTY") {
        let v = v.trim();
        cfg.frame_log.pretty = v == "1" || v.eq_ignore_ascii_case("true");
    }
    if let Some(v) = get("MCP_TAP_LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
        cfg.logging.level = v;
    }
}
