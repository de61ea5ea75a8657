use std::path::PathBuf;

use clap::Parser;
use mcp_tap_core::config::TapConfig;

pub const USAGE: &str =
    "Usage: tap [--logfile PATH] [--quiet] [--no-mirror-child-stderr] [--pretty] -- <command> [args...]";

#[derive(Parser, Debug)]
#[command(name = "tap", version)]
#[command(about = "Transparent stdio tap that logs JSON-RPC traffic to and from a child process")]
pub struct Args {
    /// Append frame records to this file
    #[arg(long, value_name = "PATH")]
    pub logfile: Option<String>,

    /// Write no frame records at all when no logfile is given
    #[arg(long)]
    pub quiet: bool,

    /// Do not forward the child's stderr (it is still logged)
    #[arg(long)]
    pub no_mirror_child_stderr: bool,

    /// Re-indent single-line JSON-RPC frames in the log
    #[arg(long)]
    pub pretty: bool,

    /// Explicit TOML config file instead of ~/.mcp-tap/config.toml or ./mcp-tap.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Child command and its arguments, normally given after `--`
    #[arg(trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Args {
    /// Flags only ever switch behaviour on top of config/env.
    pub fn apply_to(&self, cfg: &mut TapConfig) {
        if let Some(path) = &self.logfile {
            cfg.frame_log.logfile = Some(path.clone());
        }
        if self.quiet {
            cfg.frame_log.quiet = true;
        }
        if self.no_mirror_child_stderr {
            cfg.frame_log.mirror_child_stderr = false;
        }
        if self.pretty {
            cfg.frame_log.pretty = true;
        }
    }
}
