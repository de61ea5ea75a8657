use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use super::types::{RunOutcome, TapCommand};

/// A running child with its three pipe endpoints. Each endpoint can be taken once.
#[async_trait]
pub trait ChildSession: Send {
    fn stdin(&mut self) -> Option<Box<dyn AsyncWrite + Unpin + Send>>;
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;
    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;
    fn pid(&self) -> Option<u32>;
    async fn wait(&mut self) -> anyhow::Result<RunOutcome>;
}

#[async_trait]
pub trait ChildLauncher: Send + Sync {
    fn name(&self) -> &str;
    async fn spawn(&self, cmd: &TapCommand) -> anyhow::Result<Box<dyn ChildSession>>;
}
