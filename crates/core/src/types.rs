use std::collections::HashMap;

/// Game template ids are 24-char hex strings (plus a few synthetic ids).
pub type ItemId = String;

/// Two-letter locale code (`en`, `ru`, ...).
pub type LangCode = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Base monetary value per template id, in the base currency.
pub type Credits = HashMap<ItemId, i64>;
