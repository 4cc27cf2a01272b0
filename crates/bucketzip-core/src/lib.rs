pub mod config;
pub mod logging;

pub mod control;
pub mod extract;
pub mod harvest;
pub mod http;
pub mod listing;
pub mod progress;
pub mod retry;
pub mod storage;
pub mod url_model;
