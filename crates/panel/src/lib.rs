//! Atrium Panel Library
//!
//! The admin panel core: resource discovery, navigation, signed image
//! URLs and asset tags, plus the HTTP routes they link to.
//! The main entry point for running the server is the `atrium` binary.

pub mod asset;
pub mod cli;
pub mod config;
pub mod error;
pub mod imaging;
pub mod manager;
pub mod markup;
pub mod navigation;
pub mod resource;
pub mod routes;
pub mod state;
pub mod storage;
pub mod text;
pub mod theme;
pub mod url;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use manager::PanelManager;
pub use markup::Markup;
pub use state::AppState;
