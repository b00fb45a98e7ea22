use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain model for one message between a staff member and a doctor.
///
/// Mirrors the backend's JSON shape. Display names are denormalized by the
/// backend and may be absent, in which case they deserialize to empty
/// strings and the UI falls back to the raw ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub receiver: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Server-relative path of an uploaded attachment.
    #[serde(default)]
    pub file: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Stable dedup key for merging the poll and push delivery paths.
    ///
    /// The backend exposes no message id, so one is synthesized from the
    /// fields that identify a message in practice: who sent it, when the
    /// backend recorded it, and what it carried.
    pub fn identity(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.sender_id.hash(&mut hasher);
        self.timestamp.timestamp_millis().hash(&mut hasher);
        self.message.hash(&mut hasher);
        self.file.hash(&mut hasher);
        hasher.finish()
    }
}

/// Which side of the conversation the local client speaks for. Reported to
/// the backend as `senderType` on every send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderRole {
    Staff,
    Doctor,
}

impl SenderRole {
    pub fn as_str(self) -> &'static str {
        match self {
            SenderRole::Staff => "staff",
            SenderRole::Doctor => "doctor",
        }
    }
}

/// Push-channel room grouping the live events of one staff/doctor pair.
pub fn room_id(staff_id: &str, doctor_id: &str) -> String {
    format!("{staff_id}_{doctor_id}")
}
