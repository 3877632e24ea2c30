pub mod cli;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod event;
pub mod render;
pub mod scheduler;
pub mod storage;
pub mod store;
pub mod surface;
pub mod types;
pub mod utils;
pub mod workout;
