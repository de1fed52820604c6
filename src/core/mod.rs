pub mod config;
pub mod episode;
pub mod presets;
pub mod session;
