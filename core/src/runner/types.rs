use crate::error::RunnerError;

/// The child program and its arguments, passed through without shell interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl TapCommand {
    /// Fails with a usage error when `argv` is empty.
    pub fn from_argv(argv: Vec<String>) -> Result<Self, RunnerError> {
        let mut it = argv.into_iter();
        let program = it
            .next()
            .ok_or_else(|| RunnerError::Usage("no command given after `--`".into()))?;
        Ok(Self {
            program,
            args: it.collect(),
        })
    }

    /// Space-joined rendering for the `launching:` marker.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_code: i32,
}

/// Bytes each relay carried. `None` when the relay was cancelled or failed before end of stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayBytes {
    pub client_to_server: Option<u64>,
    pub server_to_client: Option<u64>,
    pub server_stderr: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct TapOutcome {
    pub exit_code: i32,
    pub duration_ms: u64,
    pub bytes: RelayBytes,
}
