use serde::Serialize;

use crate::domain::board::Grouping;
use crate::domain::ticket::{Priority, Status, Ticket, TicketId};
use crate::domain::user::UserDirectory;

/// Everything a card shows. Badges for the dimension the board is grouped by are left out,
/// since the column header already carries them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: TicketId,
    pub title: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub tag: String,
    pub user_color: Option<&'static str>,
    pub selected: bool,
}

impl CardView {
    pub fn project(
        ticket: &Ticket,
        directory: &UserDirectory<'_>,
        grouping: Grouping,
        selected: bool,
    ) -> Self {
        Self {
            id: ticket.id.clone(),
            title: ticket.title.clone(),
            status: (grouping != Grouping::Status).then_some(ticket.status),
            priority: (grouping != Grouping::Priority).then_some(ticket.priority),
            tag: ticket.tag_label(),
            user_color: if grouping == Grouping::User {
                None
            } else {
                directory.color(&ticket.user_id)
            },
            selected,
        }
    }
}

/// Cuts `text` to at most `width` characters, ending in `…` when anything was dropped.
pub fn truncate_title(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut truncated = text.chars().take(width - 1).collect::<String>();
    truncated.push('…');
    truncated
}
