use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::Serialize;

use crate::domain::ticket::{Priority, Status, Ticket};
use crate::domain::user::UserDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    Status,
    User,
    Priority,
}

impl Grouping {
    pub const ALL: [Grouping; 3] = [Grouping::Status, Grouping::User, Grouping::Priority];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grouping::Status => "status",
            Grouping::User => "user",
            Grouping::Priority => "priority",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grouping::Status => "Status",
            Grouping::User => "User",
            Grouping::Priority => "Priority",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "status" => Some(Grouping::Status),
            "user" | "userid" => Some(Grouping::User),
            "priority" => Some(Grouping::Priority),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Grouping::Status => Grouping::User,
            Grouping::User => Grouping::Priority,
            Grouping::Priority => Grouping::Status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ordering {
    Title,
    Priority,
}

impl Ordering {
    pub const ALL: [Ordering; 2] = [Ordering::Title, Ordering::Priority];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ordering::Title => "title",
            Ordering::Priority => "priority",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Ordering::Title => "Title",
            Ordering::Priority => "Priority",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "title" => Some(Ordering::Title),
            "priority" => Some(Ordering::Priority),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Ordering::Title => Ordering::Priority,
            Ordering::Priority => Ordering::Title,
        }
    }
}

/// What a group was keyed on. For user groups this is the first user id seen under that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    Status(Status),
    User(String),
    Priority(Priority),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HeaderBadge {
    Status { status: Status },
    Priority { priority: Priority },
    UserColor { color: Option<&'static str> },
}

impl GroupKey {
    pub fn badge(&self, directory: &UserDirectory<'_>) -> HeaderBadge {
        match self {
            GroupKey::Status(status) => HeaderBadge::Status { status: *status },
            GroupKey::Priority(priority) => HeaderBadge::Priority {
                priority: *priority,
            },
            GroupKey::User(user_id) => HeaderBadge::UserColor {
                color: directory.color(user_id),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct TicketGroup<'a> {
    pub key: GroupKey,
    pub label: String,
    pub tickets: Vec<&'a Ticket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Column<'a> {
    pub label: String,
    pub badge: HeaderBadge,
    pub tickets: Vec<&'a Ticket>,
}

impl Column<'_> {
    pub fn count(&self) -> usize {
        self.tickets.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Board<'a> {
    pub grouping: Grouping,
    pub ordering: Ordering,
    pub columns: Vec<Column<'a>>,
}

impl Board<'_> {
    pub fn ticket_count(&self) -> usize {
        self.columns.iter().map(Column::count).sum()
    }
}

fn group_key(
    ticket: &Ticket,
    directory: &UserDirectory<'_>,
    grouping: Grouping,
) -> (GroupKey, String) {
    match grouping {
        Grouping::Status => (
            GroupKey::Status(ticket.status),
            ticket.status.label().to_string(),
        ),
        Grouping::User => (
            GroupKey::User(ticket.user_id.clone()),
            directory.name(&ticket.user_id).to_string(),
        ),
        Grouping::Priority => (
            GroupKey::Priority(ticket.priority),
            ticket.priority.name().to_string(),
        ),
    }
}

/// Partitions tickets by label in first-seen order. Status grouping always ends with the terminal
/// buckets, empty if no ticket landed in them.
pub fn group_tickets<'a>(
    tickets: &'a [Ticket],
    directory: &UserDirectory<'_>,
    grouping: Grouping,
) -> Vec<TicketGroup<'a>> {
    let mut groups: Vec<TicketGroup<'a>> = Vec::new();
    let mut index_by_label: HashMap<String, usize> = HashMap::new();

    for ticket in tickets {
        let (key, label) = group_key(ticket, directory, grouping);
        match index_by_label.get(&label) {
            Some(&index) => groups[index].tickets.push(ticket),
            None => {
                index_by_label.insert(label.clone(), groups.len());
                groups.push(TicketGroup {
                    key,
                    label,
                    tickets: vec![ticket],
                });
            }
        }
    }

    if grouping == Grouping::Status {
        for status in Status::TERMINAL {
            if !index_by_label.contains_key(status.label()) {
                groups.push(TicketGroup {
                    key: GroupKey::Status(status),
                    label: status.label().to_string(),
                    tickets: Vec::new(),
                });
            }
        }
    }

    groups
}

/// Unicode collation over the root locale, the same ordering a browser's `localeCompare` gives
/// without a locale argument.
pub struct TitleCollator {
    inner: Option<Collator>,
}

impl TitleCollator {
    pub fn new() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);
        let inner = match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(error) => {
                tracing::warn!(?error, "root collation data unavailable, sorting by case-folded text");
                None
            }
        };
        Self { inner }
    }

    pub fn compare(&self, a: &str, b: &str) -> CmpOrdering {
        match &self.inner {
            Some(collator) => collator.compare(a, b),
            None => case_folded(a, b),
        }
    }
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new()
    }
}

fn case_folded(a: &str, b: &str) -> CmpOrdering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Sorts in place. Equal keys fall back to the ticket identifier so the order is total.
pub fn sort_tickets(tickets: &mut [&Ticket], ordering: Ordering) {
    let collator = TitleCollator::new();
    tickets.sort_by(|a, b| {
        let by_key = match ordering {
            Ordering::Title => collator.compare(&a.title, &b.title),
            Ordering::Priority => b.priority.cmp(&a.priority),
        };
        by_key.then_with(|| collator.compare(a.id.as_str(), b.id.as_str()))
    });
}

pub fn build_board<'a>(
    tickets: &'a [Ticket],
    directory: &UserDirectory<'_>,
    grouping: Grouping,
    ordering: Ordering,
) -> Board<'a> {
    let columns = group_tickets(tickets, directory, grouping)
        .into_iter()
        .map(|mut group| {
            sort_tickets(&mut group.tickets, ordering);
            Column {
                badge: group.key.badge(directory),
                label: group.label,
                tickets: group.tickets,
            }
        })
        .collect();

    Board {
        grouping,
        ordering,
        columns,
    }
}
