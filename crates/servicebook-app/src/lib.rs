//! Application service layer - live record list, export, print, config

pub mod config;
pub mod export;
pub mod logging;
pub mod print;
pub mod repository;
pub mod service;

pub use config::Config;
pub use service::{NewRecordInput, RecordListService};
