use std::io::ErrorKind;
use std::sync::Arc;

use log::debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Shared writer emitting authorized keys in the two-line form sshd
/// understands:
///
/// ```text
/// # <owner>
/// <key body>
/// ```
///
/// Every lookup task holds a clone. A write failure never fails the run;
/// a broken pipe additionally cancels the shutdown token, which ends the
/// whole lookup cleanly.
pub struct KeyWriter<W> {
    sink: Arc<Mutex<W>>,
    shutdown: CancellationToken,
}

impl<W> Clone for KeyWriter<W> {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<W> KeyWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: W, shutdown: CancellationToken) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
            shutdown,
        }
    }

    /// Writes one owner comment plus key body. The whole block goes out
    /// under a single lock acquisition, so blocks of concurrent writers
    /// may interleave but the two lines of one key never separate.
    pub async fn write_key(&self, owner: &str, body: &str) {
        let block = format!("# {}\n{}\n", owner, body);
        let mut sink = self.sink.lock().await;
        if let Err(err) = Self::write_block(&mut sink, block.as_bytes()).await {
            if err.kind() == ErrorKind::BrokenPipe {
                debug!("Stopped printing keys, the reader closed the pipe: {}", err);
                self.shutdown.cancel();
            } else {
                debug!("Failed to print a key of {}: {}", owner, err);
            }
        }
    }

    async fn write_block(sink: &mut W, block: &[u8]) -> std::io::Result<()> {
        sink.write_all(block).await?;
        sink.flush().await
    }
}

#[cfg(test)]
impl KeyWriter<Vec<u8>> {
    pub async fn written(&self) -> String {
        String::from_utf8(self.sink.lock().await.clone()).unwrap()
    }
}

/// Sink failing every write with the given error kind.
#[cfg(test)]
pub struct FailingSink(pub ErrorKind);

#[cfg(test)]
impl AsyncWrite for FailingSink {
    fn poll_write(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &[u8],
    ) -> std::task::Poll<Result<usize, std::io::Error>> {
        std::task::Poll::Ready(Err(std::io::Error::from(self.0)))
    }

    fn poll_flush(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), std::io::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn poll_shutdown(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), std::io::Error>> {
        std::task::Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod should {
    use futures::future::join_all;

    use super::*;

    #[tokio::test]
    async fn write_owner_comment_followed_by_key_body() {
        let writer = KeyWriter::new(Vec::new(), CancellationToken::new());

        writer
            .write_key("alice", "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5 alice@work")
            .await;

        assert_eq!(
            writer.written().await,
            "# alice\nssh-ed25519 AAAAC3NzaC1lZDI1NTE5 alice@work\n"
        );
    }

    #[tokio::test]
    async fn append_blocks_in_write_order() {
        let writer = KeyWriter::new(Vec::new(), CancellationToken::new());

        writer.write_key("alice", "ssh-ed25519 AAAA1").await;
        writer.write_key("bob", "ssh-rsa AAAA2").await;

        assert_eq!(
            writer.written().await,
            "# alice\nssh-ed25519 AAAA1\n# bob\nssh-rsa AAAA2\n"
        );
    }

    #[tokio::test]
    async fn keep_comment_and_body_adjacent_under_concurrency() {
        let writer = KeyWriter::new(Vec::new(), CancellationToken::new());

        let mut writes = Vec::new();
        for n in 0..16 {
            let writer = writer.clone();
            writes.push(tokio::spawn(async move {
                writer
                    .write_key(&format!("user{}", n), "ssh-ed25519 AAAA")
                    .await;
            }));
        }
        join_all(writes).await;

        let written = writer.written().await;
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 32);
        for pair in lines.chunks(2) {
            assert!(pair[0].starts_with("# user"));
            assert_eq!(pair[1], "ssh-ed25519 AAAA");
        }
    }

    #[tokio::test]
    async fn cancel_shutdown_when_the_pipe_breaks() {
        let shutdown = CancellationToken::new();
        let writer = KeyWriter::new(FailingSink(ErrorKind::BrokenPipe), shutdown.clone());

        writer.write_key("alice", "ssh-ed25519 AAAA").await;

        assert!(shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn swallow_write_errors_other_than_a_broken_pipe() {
        let shutdown = CancellationToken::new();
        let writer = KeyWriter::new(FailingSink(ErrorKind::Other), shutdown.clone());

        writer.write_key("alice", "ssh-ed25519 AAAA").await;

        assert!(!shutdown.is_cancelled());
    }
}
