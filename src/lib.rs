#[macro_use]
pub mod macros;

pub mod api;
pub mod category;
pub mod chrono_util;
pub mod config;
pub mod csv_export;
pub mod data_collector;
pub mod parser;
pub mod schema;
