use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{SshKeyRecord, UserIdentity};

/// Failure reported by the identity service. Carries the rendered message
/// only; whether it ends the run or merely skips one user is decided by
/// the caller.
#[derive(Debug)]
pub struct ServiceError(String);

impl ServiceError {
    pub fn new(message: &str) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ServiceError {}

/// Read-only view of the user directory holding uploaded SSH public keys.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Directory: Send + Sync {
    /// First page of the full user listing, at most `max_items` entries.
    /// Further pages are never requested.
    async fn list_users(&self, max_items: i32) -> Result<Vec<UserIdentity>, ServiceError>;

    /// Members of the named group, first page only.
    async fn group_members(&self, group_name: &str) -> Result<Vec<UserIdentity>, ServiceError>;

    /// The key listing of one user, bodies not included.
    async fn ssh_public_keys(&self, user_name: &str) -> Result<Vec<SshKeyRecord>, ServiceError>;

    /// Full SSH-encoded body of one uploaded key.
    async fn ssh_public_key_body(
        &self,
        user_name: &str,
        key_id: &str,
    ) -> Result<String, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let error = ServiceError::new("GetGroup failed: group admins does not exist");
        assert_eq!(
            format!("{}", error),
            "GetGroup failed: group admins does not exist"
        );
    }
}
