pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use core::errors::SplitError;
pub use core::services::SplitService;
pub use infrastructure::gateway::{ExpenseGateway, http::HttpExpenseGateway, in_memory::InMemoryGateway};
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::storage::in_memory::InMemorySessionStore;

#[cfg(test)]
mod tests;
