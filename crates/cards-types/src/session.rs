use serde::{Deserialize, Serialize};

/// Conversational session with the AI backend.
///
/// `session_id` is unset until the first successful reply supplies one and
/// is reset whenever the chat is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: Option<String>,
    pub remote_memory_enabled: bool,
}

impl Session {
    /// Whether focus changes should be pushed to the backend session
    pub fn is_remote_active(&self) -> bool {
        self.session_id.is_some() && self.remote_memory_enabled
    }
}
