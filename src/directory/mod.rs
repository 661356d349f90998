mod directory;
mod iam;
mod key;
mod user;

pub use directory::{Directory, ServiceError};
pub use iam::IamDirectory;
pub use key::{KeyStatus, SshKeyRecord};
pub use user::UserIdentity;

#[cfg(test)]
pub use directory::MockDirectory;
