use crate::services::{BoardSnapshot, TicketSource};

/// Fetches the board once. Any failure is logged and yields an empty board; there is no retry.
pub async fn load_board(source: &dyn TicketSource) -> BoardSnapshot {
    match source.fetch_snapshot().await {
        Ok(snapshot) => {
            if snapshot.is_empty() {
                tracing::warn!("board endpoint returned no tickets and no users");
            } else {
                tracing::info!(
                    tickets = snapshot.tickets.len(),
                    users = snapshot.users.len(),
                    "board data loaded"
                );
            }
            snapshot
        }
        Err(error) => {
            tracing::error!(%error, "error fetching board data");
            BoardSnapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::ticket::{Priority, Status, Ticket, TicketId};
    use crate::domain::user::User;
    use crate::error::{AppError, AppResult};

    struct FakeSource {
        result: fn() -> AppResult<BoardSnapshot>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(result: fn() -> AppResult<BoardSnapshot>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TicketSource for FakeSource {
        async fn fetch_snapshot(&self) -> AppResult<BoardSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn populated() -> AppResult<BoardSnapshot> {
        Ok(BoardSnapshot {
            tickets: vec![Ticket {
                id: TicketId::from("CAM-1"),
                title: "Update user profile page UI".to_string(),
                status: Status::Todo,
                priority: Priority::URGENT,
                user_id: "usr-1".to_string(),
                tag: None,
            }],
            users: vec![User {
                id: "usr-1".to_string(),
                name: "Anoop Sharma".to_string(),
                available: false,
            }],
        })
    }

    #[tokio::test]
    async fn returns_snapshot_on_success() {
        let source = FakeSource::new(populated);
        let snapshot = load_board(&source).await;

        assert_eq!(snapshot.tickets.len(), 1);
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_yields_empty_board_without_retry() {
        let source = FakeSource::new(|| Err(AppError::Fetch("connection refused".to_string())));
        let snapshot = load_board(&source).await;

        assert!(snapshot.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_response_is_passed_through() {
        let source = FakeSource::new(|| Ok(BoardSnapshot::default()));
        let snapshot = load_board(&source).await;

        assert!(snapshot.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn decode_failure_yields_empty_board() {
        let source = FakeSource::new(|| Err(AppError::Decode("expected value".to_string())));
        assert!(load_board(&source).await.is_empty());
    }
}
