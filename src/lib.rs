pub mod api_connection;
pub mod cli;
pub mod config;
pub mod matching;
pub mod meal;
pub mod pipeline;
pub mod query_signals;
pub mod units;
