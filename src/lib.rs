pub mod client;
pub mod error;
pub mod executor;
pub mod models;
pub mod probe;
pub mod settings;
pub mod utils;
pub mod ws;
