use serde::{Deserialize, Serialize};

/// A feed the user follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub source_uri: String,
    pub position: i64,
}
