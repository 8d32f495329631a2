//! Viewer identity as resolved by the external session layer.

/// Signed-in viewer, inserted into request extensions by the identity resolver.
///
/// Absence of this extension means the request is anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// An identity only counts when it carries a user id.
    pub fn is_signed_in(&self) -> bool {
        !self.user_id.trim().is_empty()
    }
}
