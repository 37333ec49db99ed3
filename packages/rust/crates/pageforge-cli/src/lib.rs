//! pageforge-cli - operator tooling for the pageforge edit engine.
//!
//! Settings loading, an offline replay generator and a JSON Lines version
//! history. The `pageforge` binary wires these to [`pageforge_edit::EditEngine`].

mod history;
mod replay;
mod settings;

pub use history::JsonlHistory;
pub use replay::ReplayGenerator;
pub use settings::{
    EngineSettings, PageforgeSettings, ValidationSettings, load_settings,
    load_settings_from_paths, set_config_home_override, settings_paths,
};
