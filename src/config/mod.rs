pub mod indicators;
pub mod manager;
pub mod signals;
pub mod traits;

pub use indicators::IndicatorConfig;
pub use manager::{AppConfig, ConfigManager};
pub use signals::SignalConfig;
pub use traits::ConfigSection;
