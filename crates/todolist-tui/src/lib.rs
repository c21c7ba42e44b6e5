pub mod app;
pub mod components;
pub mod config;
pub mod confirm;
pub mod controller;
pub mod logging;
