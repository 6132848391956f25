// src/services/mod.rs
pub mod calculations;
pub mod charts;
pub mod filter;
pub mod format;
pub mod store;
