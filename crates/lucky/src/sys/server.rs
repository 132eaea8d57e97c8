use crate::events::AppEvent;
use async_channel::Sender;
use cardkit::control::{self, SOCKET_PATH};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::UnixListener;

pub async fn run_server(tx: Sender<AppEvent>) {
    serve(Path::new(SOCKET_PATH), tx).await;
}

pub async fn serve(path: &Path, tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if fs_err::metadata(path).is_ok() {
        let _ = fs_err::remove_file(path);
    }

    let listener = match UnixListener::bind(path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", path.display(), e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    forward_commands(stream, tx).await;
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Forwards every recognised line as an event; unknown lines are skipped.
async fn forward_commands<R: AsyncRead + Unpin>(reader: R, tx: Sender<AppEvent>) {
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match control::parse_line(&line) {
            Some(command) => {
                if tx.send(AppEvent::from(command)).await.is_err() {
                    break;
                }
            }
            None => log::debug!("Unknown control command '{}'", line.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardkit::control::{ControlCommand, send_to};

    #[tokio::test]
    async fn test_forward_commands_skips_unknown_lines() {
        let (tx, rx) = async_channel::unbounded();
        let input: &[u8] = b"show\nwobble\n  reset \nhide\n";

        forward_commands(input, tx).await;

        let events: Vec<AppEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(events, vec![AppEvent::Show, AppEvent::Reset, AppEvent::Hide]);
    }

    #[tokio::test]
    async fn test_serve_over_socket() {
        let path = std::env::temp_dir().join(format!("lucky-test-{}.sock", std::process::id()));
        let (tx, rx) = async_channel::unbounded();

        let server = tokio::spawn({
            let path = path.clone();
            async move { serve(&path, tx).await }
        });

        // wait for the listener to come up
        let mut sent = false;
        for _ in 0..50 {
            let path = path.clone();
            let result =
                tokio::task::spawn_blocking(move || send_to(path, ControlCommand::Spread))
                    .await
                    .unwrap();
            if result.is_ok() {
                sent = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(sent);

        let event = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event, AppEvent::Spread);

        server.abort();
        let _ = std::fs::remove_file(&path);
    }
}
