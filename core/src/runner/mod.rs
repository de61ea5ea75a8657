mod child;
mod io_pump;
mod run;
mod runtime;
mod traits;
pub mod types;

pub use child::ProcessLauncher;
pub use io_pump::{relay_client_to_server, relay_server_stderr, relay_server_to_client, RelayTask};
pub use run::{run_tap, RunTapArgs};
pub use runtime::{run_session_runtime, ClientIo, RunSessionRuntimeInput};
pub use traits::{ChildLauncher, ChildSession};
pub use types::{RelayBytes, RunOutcome, TapCommand, TapOutcome};
