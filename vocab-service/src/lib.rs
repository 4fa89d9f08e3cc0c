pub mod config;
pub mod handlers;
pub mod models;
pub mod quiz;
pub mod services;
pub mod startup;
