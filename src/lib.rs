#[cfg(feature = "audit-log")]
pub mod audit;
pub mod cli;
pub mod config;
pub mod derive;
pub mod errors;
pub mod session;
pub mod store;
