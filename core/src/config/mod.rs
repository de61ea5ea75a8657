mod load;
mod types;

pub use load::{get_tap_data_dir, load_default, load_from};
pub use types::{FrameLogConfig, LoggingConfig, RelayConfig, TapConfig};
