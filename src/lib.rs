pub mod backend;
pub mod cli;
pub mod config;
pub mod guidance;
pub mod logging;
pub mod observation;
pub mod protocol;
pub mod records;
pub mod scoring;
pub mod server;
pub mod service;
