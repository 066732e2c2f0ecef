pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use api::{build_router, AppState, Store};
pub use config::{AppConfig, ServerCli};
pub use utils::error::{PortfolioError, Result};
