use log::{debug, warn};
use tokio_util::sync::CancellationToken;

/// Turns SIGPIPE into a cancellation of `shutdown`.
///
/// sshd stops reading and closes the pipe as soon as it has seen the keys
/// it cares about, and a nonzero exit at that point makes it discard keys
/// it already matched. Cancelling the token lets the lookup flow wind
/// down and report success instead.
#[cfg(unix)]
pub fn listen_for_closed_pipe(shutdown: &CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut pipe = match signal(SignalKind::pipe()) {
        Ok(pipe) => pipe,
        Err(err) => {
            warn!("Failed to register the SIGPIPE listener: {}", err);
            return;
        }
    };

    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = pipe.recv() => {
                debug!("Received SIGPIPE, stopping key output");
                shutdown.cancel();
            }
            _ = shutdown.cancelled() => {}
        }
    });
}

#[cfg(not(unix))]
pub fn listen_for_closed_pipe(_shutdown: &CancellationToken) {}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_sigpipe_cancels_the_shutdown_token() {
        let shutdown = CancellationToken::new();
        listen_for_closed_pipe(&shutdown);

        unsafe { libc::raise(libc::SIGPIPE) };

        tokio::time::timeout(Duration::from_secs(5), shutdown.cancelled())
            .await
            .expect("SIGPIPE should cancel the shutdown token");
    }
}
