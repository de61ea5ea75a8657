use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TapConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub frame_log: FrameLogConfig,

    #[serde(default)]
    pub relay: RelayConfig,
}

/// Diagnostics for the tap itself. Never mixed into the frame log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr. Off by default since stderr belongs to the tapped child.
    #[serde(default)]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "mcp_tap_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_file() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: false,
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameLogConfig {
    /// Append records to this file. Without it records go to stderr unless `quiet`.
    #[serde(default)]
    pub logfile: Option<String>,

    #[serde(default)]
    pub quiet: bool,

    #[serde(default)]
    pub pretty: bool,

    #[serde(default = "default_mirror_child_stderr")]
    pub mirror_child_stderr: bool,

    /// Top-level keys that mark a JSON object as a protocol frame worth re-indenting.
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,

    /// Records waiting for the writer. When full, new records are dropped rather than waited on.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_mirror_child_stderr() -> bool {
    true
}

fn default_markers() -> Vec<String> {
    vec!["jsonrpc".to_string()]
}

fn default_queue_capacity() -> usize {
    8192
}

impl Default for FrameLogConfig {
    fn default() -> Self {
        Self {
            logfile: None,
            quiet: false,
            pretty: false,
            mirror_child_stderr: default_mirror_child_stderr(),
            markers: default_markers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// How long stdout/stderr relays may keep draining after the child exits.
    #[serde(default = "default_drain_grace_ms")]
    pub drain_grace_ms: u64,
}

fn default_chunk_size() -> usize {
    4096
}

fn default_drain_grace_ms() -> u64 {
    500
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            drain_grace_ms: default_drain_grace_ms(),
        }
    }
}
