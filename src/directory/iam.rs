use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_iam::error::{DisplayErrorContext, SdkError};
use aws_sdk_iam::types::EncodingType;
use aws_sdk_iam::Client;

use super::{Directory, ServiceError, SshKeyRecord, UserIdentity};

/// User directory backed by AWS IAM. Credentials and region come from the
/// default provider chain, so the instance profile of the host running
/// sshd is enough.
pub struct IamDirectory {
    client: Client,
}

impl IamDirectory {
    pub async fn connect() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl Directory for IamDirectory {
    async fn list_users(&self, max_items: i32) -> Result<Vec<UserIdentity>, ServiceError> {
        let page = self
            .client
            .list_users()
            .max_items(max_items)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(page.users().iter().map(UserIdentity::from).collect())
    }

    async fn group_members(&self, group_name: &str) -> Result<Vec<UserIdentity>, ServiceError> {
        let group = self
            .client
            .get_group()
            .group_name(group_name)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(group.users().iter().map(UserIdentity::from).collect())
    }

    async fn ssh_public_keys(&self, user_name: &str) -> Result<Vec<SshKeyRecord>, ServiceError> {
        let listing = self
            .client
            .list_ssh_public_keys()
            .user_name(user_name)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(listing
            .ssh_public_keys()
            .iter()
            .map(SshKeyRecord::from)
            .collect())
    }

    async fn ssh_public_key_body(
        &self,
        user_name: &str,
        key_id: &str,
    ) -> Result<String, ServiceError> {
        let response = self
            .client
            .get_ssh_public_key()
            .user_name(user_name)
            .ssh_public_key_id(key_id)
            .encoding(EncodingType::Ssh)
            .send()
            .await
            .map_err(sdk_error)?;
        let key = response
            .ssh_public_key()
            .ok_or_else(|| ServiceError::new("GetSSHPublicKey returned no key material"))?;
        Ok(key.ssh_public_key_body().to_string())
    }
}

/// Renders an SDK error with its full source chain (missing credentials,
/// throttling, a misspelled group name) into the message.
fn sdk_error<E>(err: SdkError<E>) -> ServiceError
where
    E: std::error::Error + 'static,
{
    ServiceError::new(&DisplayErrorContext(err).to_string())
}
