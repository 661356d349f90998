use aws_sdk_iam::types::SshPublicKeyMetadata;

/// Status string of an uploaded key, kept verbatim as the service
/// reported it. Only the exact value `Active` marks a key as usable;
/// every other value, including casing variants and statuses introduced
/// after this build, reads as not active.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyStatus(String);

impl KeyStatus {
    pub fn is_active(&self) -> bool {
        self.0 == "Active"
    }
}

impl From<&str> for KeyStatus {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a user's key listing. The key body is not part of the
/// listing and gets fetched separately, only for active entries.
#[derive(Debug, Clone, PartialEq)]
pub struct SshKeyRecord {
    key_id: String,
    status: KeyStatus,
}

impl SshKeyRecord {
    pub fn new(key_id: &str, status: &str) -> Self {
        Self {
            key_id: key_id.into(),
            status: status.into(),
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn status(&self) -> &KeyStatus {
        &self.status
    }
}

impl From<&SshPublicKeyMetadata> for SshKeyRecord {
    fn from(metadata: &SshPublicKeyMetadata) -> Self {
        Self::new(metadata.ssh_public_key_id(), metadata.status().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_status() {
        assert!(KeyStatus::from("Active").is_active());
    }

    #[test]
    fn test_inactive_status() {
        assert!(!KeyStatus::from("Inactive").is_active());
    }

    #[test]
    fn test_status_comparison_is_case_sensitive() {
        assert!(!KeyStatus::from("active").is_active());
        assert!(!KeyStatus::from("ACTIVE").is_active());
    }

    #[test]
    fn test_unknown_status_is_not_active() {
        assert!(!KeyStatus::from("Expired").is_active());
        assert!(!KeyStatus::from("").is_active());
    }

    #[test]
    fn test_status_display_keeps_raw_value() {
        assert_eq!(format!("{}", KeyStatus::from("Expired")), "Expired");
    }

    #[test]
    fn test_record_keeps_listing_fields() {
        let record = SshKeyRecord::new("APKAEXAMPLE", "Active");
        assert_eq!(record.key_id(), "APKAEXAMPLE");
        assert!(record.status().is_active());
    }
}
