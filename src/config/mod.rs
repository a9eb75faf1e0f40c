//! Configuration resolution
//!
//! Values come from, in order of precedence: the environment, a `.env` file in
//! the working directory, and `~/.config/wastearr/conf`. The rest of the crate
//! only ever sees the resolved [`Config`].

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{Config, ServiceConfig, DEFAULT_RADARR_URL, DEFAULT_SONARR_URL};
