pub mod chat;
pub mod compose;
pub mod config;
pub mod intent;
pub mod stats;
pub mod store;
pub mod text;
