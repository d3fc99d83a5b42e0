pub mod api;
pub mod app;
pub mod config;
pub mod handler;
pub mod tui;
pub mod ui;
pub mod worker;
