// common/src/models/mod.rs
pub mod message;
pub mod session;
