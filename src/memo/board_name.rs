//! Board → title memo with a single writer and a periodic reset

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::constants::memo::{BOARD_NAME_QUEUE, MAP_CAPACITY};

type Names = Arc<RwLock<HashMap<String, String>>>;

enum Command {
    Record { board: String, name: String },
    Flush(oneshot::Sender<()>),
}

/// Memo of board titles
///
/// `get` distinguishes a board that was never looked up (`None`) from one
/// whose lookup found nothing (`Some("")`). Every entry is dropped once per
/// reset period. Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct BoardNameMemo {
    names: Names,
    commands: mpsc::Sender<Command>,
}

impl BoardNameMemo {
    pub fn new(reset: Duration) -> Self {
        let names: Names = Arc::new(RwLock::new(HashMap::with_capacity(MAP_CAPACITY)));
        let (commands, rx) = mpsc::channel(BOARD_NAME_QUEUE);
        tokio::spawn(run_writer(names.clone(), rx, reset));
        Self { names, commands }
    }

    #[must_use]
    pub fn get(&self, board: &str) -> Option<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(board)
            .cloned()
    }

    /// Record a lookup result, empty names included
    pub async fn record(&self, board: &str, name: &str) {
        let command = Command::Record {
            board: board.to_string(),
            name: name.to_string(),
        };
        if self.commands.send(command).await.is_err() {
            debug!(board, "board name writer stopped; entry dropped");
        }
    }

    /// Wait until every previously queued write has been applied
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Flush(tx)).await.is_ok() {
            let _ = rx.await;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

async fn run_writer(names: Names, mut commands: mpsc::Receiver<Command>, reset: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + reset, reset);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Record { board, name }) => {
                    names
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(board, name);
                }
                Some(Command::Flush(ack)) => {
                    let _ = ack.send(());
                }
                None => break,
            },
            _ = ticker.tick() => {
                let mut map = names.write().unwrap_or_else(PoisonError::into_inner);
                debug!(entries = map.len(), "board name memo reset");
                *map = HashMap::with_capacity(MAP_CAPACITY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(24 * 3600);

    #[tokio::test(start_paused = true)]
    async fn test_record_and_get() {
        let memo = BoardNameMemo::new(DAY);
        assert_eq!(memo.get("news"), None);

        memo.record("news", "ニュース速報").await;
        memo.record("empty", "").await;
        memo.flush().await;

        assert_eq!(memo.get("news").as_deref(), Some("ニュース速報"));
        assert_eq!(memo.get("empty").as_deref(), Some(""));
        assert_eq!(memo.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_write_wins() {
        let memo = BoardNameMemo::new(DAY);
        memo.record("news", "old").await;
        memo.record("news", "new").await;
        memo.flush().await;
        assert_eq!(memo.get("news").as_deref(), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_reset() {
        let memo = BoardNameMemo::new(DAY);
        memo.record("news", "ニュース速報").await;
        memo.flush().await;

        tokio::time::sleep(DAY + Duration::from_secs(1)).await;
        memo.flush().await;
        assert!(memo.is_empty());
    }
}
