mod calculator_tests;
mod envelope_tests;
mod expense_tests;
mod matcher_tests;
mod price_tests;
mod recorder_tests;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::models::{ApiCredentials, Item, MemberDirectory, MemberName};
use crate::core::services::SplitService;
use crate::infrastructure::gateway::{ExpenseGateway, in_memory::InMemoryGateway};
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemorySessionStore;

pub type TestService = SplitService<Arc<dyn ExpenseGateway>, InMemoryLogging, InMemorySessionStore>;

pub fn roster() -> Vec<MemberName> {
    vec!["Alice".to_string(), "Bob".to_string(), "John".to_string()]
}

pub fn directory() -> MemberDirectory {
    MemberDirectory {
        members: roster(),
        mem_to_id: roster().into_iter().zip([11, 12, 13]).collect(),
    }
}

pub fn groups() -> BTreeMap<String, i64> {
    BTreeMap::from([("Flatmates".to_string(), 100), ("Trip".to_string(), 200)])
}

pub fn credentials() -> ApiCredentials {
    ApiCredentials {
        consumer_key: "ck".to_string(),
        secret_key: "sk".to_string(),
        api_key: "ak".to_string(),
        analysis_key: "gk".to_string(),
    }
}

/// An item assigned to the given members out of the test roster.
pub fn item(name: &str, price: f64, members: &[&str]) -> Item {
    let mut item = Item::new(name, price, &roster());
    for member in members {
        item.members.insert(member.to_string(), true);
    }
    item
}

pub fn create_test_service() -> (TestService, InMemoryGateway) {
    let gateway = InMemoryGateway::new(directory(), groups());
    let shared: Arc<dyn ExpenseGateway> = Arc::new(gateway.clone());
    let service = SplitService::new(shared, InMemoryLogging::new(), InMemorySessionStore::new());
    (service, gateway)
}
