pub mod config;
pub mod constants;
pub mod error;
pub mod exporter;
pub mod logging;
pub mod models;
pub mod normalization;
pub mod pipeline;
pub mod registry;
pub mod warnings;
