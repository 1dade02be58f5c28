pub mod check;
pub mod config;
pub mod readings;
pub mod serve;
pub mod types;
