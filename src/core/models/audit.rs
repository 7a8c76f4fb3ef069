use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// One audit entry. `session_id` is `None` for actions not tied to a session.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AppLog {
    pub id: String,
    pub action: String,
    pub session_id: Option<String>,
    #[schema(value_type = Object)]
    pub details: Map<String, Value>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub timestamp: DateTime<Utc>,
}

impl AppLog {
    /// Object details are kept as they are; any other value is stored under `value`.
    pub fn new(action: &str, details: Value, session_id: Option<&str>) -> Self {
        let details = match details {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => Map::from_iter([("value".to_string(), other)]),
        };
        AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            session_id: session_id.map(String::from),
            details,
            timestamp: Utc::now(),
        }
    }

    pub fn belongs_to(&self, session_id: &str) -> bool {
        self.session_id.as_deref() == Some(session_id)
    }
}
