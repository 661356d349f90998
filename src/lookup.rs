use std::sync::Arc;

use futures::future::join_all;
use log::debug;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

use crate::directory::{Directory, ServiceError, UserIdentity};
use crate::output::KeyWriter;

/// The directory returns at most this many users per listing and further
/// pages are never requested.
const USER_PAGE_LIMIT: i32 = 100;

/// Resolves the candidate users, then prints every active SSH key they
/// uploaded, one lookup task per user. User resolution failures end the
/// run; failures below one user are logged at debug level and cost only
/// that user's keys.
///
/// Cancelling `shutdown` makes the flow return cleanly wherever it
/// currently waits. Lookup tasks still in flight are left behind; their
/// writes go to a pipe nobody reads anymore.
pub async fn print_authorized_keys<D, W>(
    directory: Arc<D>,
    writer: KeyWriter<W>,
    group: Option<&str>,
    shutdown: CancellationToken,
) -> Result<(), ServiceError>
where
    D: Directory + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let users = tokio::select! {
        biased;
        _ = shutdown.cancelled() => return Ok(()),
        resolved = resolve_users(directory.as_ref(), group) => resolved?,
    };
    debug!("Resolved {} candidate users", users.len());

    let mut lookups = Vec::with_capacity(users.len());
    for user in users {
        let directory = directory.clone();
        let writer = writer.clone();
        lookups.push(tokio::spawn(async move {
            print_user_keys(directory.as_ref(), &writer, &user).await;
        }));
    }

    tokio::select! {
        _ = join_all(lookups) => {}
        _ = shutdown.cancelled() => {}
    }

    Ok(())
}

/// All users, or just the members of the requested group. An empty group
/// name counts as no group.
async fn resolve_users<D>(
    directory: &D,
    group: Option<&str>,
) -> Result<Vec<UserIdentity>, ServiceError>
where
    D: Directory + ?Sized,
{
    match group {
        Some(name) if !name.is_empty() => directory.group_members(name).await,
        _ => directory.list_users(USER_PAGE_LIMIT).await,
    }
}

async fn print_user_keys<D, W>(directory: &D, writer: &KeyWriter<W>, user: &UserIdentity)
where
    D: Directory + ?Sized,
    W: AsyncWrite + Unpin,
{
    debug!("Listing SSH keys of {} ({})", user.name(), user.id());
    let records = match directory.ssh_public_keys(user.name()).await {
        Ok(records) => records,
        Err(err) => {
            debug!("Skipping {}: {}", user.name(), err);
            return;
        }
    };

    for record in records {
        if !record.status().is_active() {
            debug!(
                "Skipping key {} of {} with status {}",
                record.key_id(),
                user.name(),
                record.status()
            );
            continue;
        }
        match directory
            .ssh_public_key_body(user.name(), record.key_id())
            .await
        {
            Ok(body) => writer.write_key(user.name(), &body).await,
            Err(err) => debug!("Skipping key {} of {}: {}", record.key_id(), user.name(), err),
        }
    }
}
