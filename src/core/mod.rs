pub mod calculator;
pub mod envelope;
pub mod errors;
pub mod matcher;
pub mod models;
pub mod price;
pub mod recorder;
pub mod services;
pub mod session;
