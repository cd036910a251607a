// JoL Player Library

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod locale;
pub mod media;
pub mod player;
pub mod scheduler;
pub mod watchdog;

pub use config::PlayerConfig;
pub use error::{MediaError, PlayerError};
pub use events::PlayerEvent;
pub use locale::{il8n, LabelKey, Language};
pub use player::JolPlayer;
pub use watchdog::{AvailabilityState, AvailabilityWatchdog};
