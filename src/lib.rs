// src/lib.rs

pub mod config;
pub mod data;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
