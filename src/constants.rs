// Audit actions
pub const SESSION_CREATED: &str = "SESSION_CREATED";
pub const SESSION_DELETED: &str = "SESSION_DELETED";
pub const ROSTER_LOADED: &str = "ROSTER_LOADED";
pub const EVENT_APPLIED: &str = "EVENT_APPLIED";
pub const BILLS_ANALYZED: &str = "BILLS_ANALYZED";
pub const RECORDING_STARTED: &str = "RECORDING_STARTED";
pub const VOICE_PROCESSED: &str = "VOICE_PROCESSED";
pub const EXPENSE_CREATED: &str = "EXPENSE_CREATED";
pub const EXPENSE_UPDATED: &str = "EXPENSE_UPDATED";
pub const EXPENSE_LOADED: &str = "EXPENSE_LOADED";

/// Largest acceptable gap between the bill total and the sum of member totals.
pub const SPLIT_TOLERANCE: f64 = 0.01;

/// Minimum normalized similarity for the fuzzy member match tier (exclusive).
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Note used when an expense is submitted without a comment.
pub const DEFAULT_NOTE: &str = "Itemized bill split";

pub const DEFAULT_ITEM_COUNT: usize = 2;

pub const AUDIO_MIME_TYPE: &str = "audio/webm";
pub const AUDIO_FILE_NAME: &str = "recording.webm";

/// Deepest run of parentheses or unary signs accepted in a price expression.
pub const MAX_PRICE_NESTING: usize = 64;
