#![forbid(unsafe_code)]

pub mod model;
pub mod reactor;
pub mod time;

pub use model::SESSION_SIZE;
pub use reactor::{ConfigChange, on_config_changed};
pub use time::Clock;
