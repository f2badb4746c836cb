/// Shared modules for the Option Chain Dashboard
pub mod backend;
pub mod charts;
pub mod config;
pub mod de;
pub mod error;
pub mod files;
pub mod launch;
pub mod logging;
pub mod types;
