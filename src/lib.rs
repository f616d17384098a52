pub mod account;
pub mod advisory;
pub mod api;
pub mod app;
pub mod betting;
pub mod command;
pub mod config;
pub mod countdown;
pub mod events;
pub mod feeds;
pub mod format;
pub mod state;
pub mod wallet;
