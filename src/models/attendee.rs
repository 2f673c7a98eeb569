use serde::{Deserialize, Serialize};

/// A registered conference attendee.
///
/// `badge_id` is assigned sequentially at registration (starting at 1) and
/// is the only key shared with the scan log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub badge_id: i64,
    pub name: String,
    pub email: String,
}

impl Attendee {
    pub fn new(badge_id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            badge_id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Payload encoded in the scannable code printed on the badge.
    pub fn badge_payload(&self) -> String {
        self.badge_id.to_string()
    }
}
