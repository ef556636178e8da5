mod loader;
mod tsconfig;

pub use loader::{Config, ConfigError, DetectionConfig};
pub use tsconfig::{ProjectScope, TsConfigError};
