use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::ticket::Ticket;
use crate::domain::user::User;
use crate::error::AppResult;

/// The `{ tickets, users }` body served by the board endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub tickets: Vec<Ticket>,
    pub users: Vec<User>,
}

impl BoardSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty() && self.users.is_empty()
    }
}

#[async_trait]
pub trait TicketSource: Send + Sync {
    async fn fetch_snapshot(&self) -> AppResult<BoardSnapshot>;
}
