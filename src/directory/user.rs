use aws_sdk_iam::types::User;

/// One user account known to the directory. Only the name takes part in
/// key lookups; the id is carried along for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct UserIdentity {
    name: String,
    id: String,
}

impl UserIdentity {
    pub fn new(name: &str, id: &str) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl From<&User> for UserIdentity {
    fn from(user: &User) -> Self {
        Self::new(user.user_name(), user.user_id())
    }
}
