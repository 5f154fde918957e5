use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const FEATURE_REQUEST_LABEL: &str = "Feature Request";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TicketId(pub String);

impl TicketId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// The board endpoint has served both `"CAM-1"` and bare integers as identifiers.
impl<'de> Deserialize<'de> for TicketId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => TicketId(text),
            RawId::Number(number) => TicketId(number.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Backlog,
    Todo,
    #[serde(rename = "In progress")]
    InProgress,
    Done,
    Cancelled,
}

impl Status {
    /// Status buckets that stay on the board even when nothing is in them.
    pub const TERMINAL: [Status; 2] = [Status::Done, Status::Cancelled];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Backlog => "Backlog",
            Status::Todo => "Todo",
            Status::InProgress => "In progress",
            Status::Done => "Done",
            Status::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ticket priority, 0 (no priority) through 4 (urgent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const NONE: Priority = Priority(0);
    pub const LOW: Priority = Priority(1);
    pub const MEDIUM: Priority = Priority(2);
    pub const HIGH: Priority = Priority(3);
    pub const URGENT: Priority = Priority(4);

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        match self.0 {
            4 => "Urgent",
            3 => "High",
            2 => "Medium",
            1 => "Low",
            _ => "No priority",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 4 {
            Ok(Self(value))
        } else {
            Err(format!("priority must be between 0 and 4, got {value}"))
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Text(String),
    List(Vec<String>),
}

impl Tag {
    /// Replaces the `[""]` placeholder with the feature request label. Any other shape is kept as-is.
    pub fn normalize(&self) -> Tag {
        match self {
            Tag::List(items) if items.len() == 1 && items[0].is_empty() => {
                Tag::Text(FEATURE_REQUEST_LABEL.to_string())
            }
            other => other.clone(),
        }
    }

    pub fn label(&self) -> String {
        match self.normalize() {
            Tag::Text(text) => text,
            Tag::List(items) => items.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
}

impl Ticket {
    pub fn tag_label(&self) -> String {
        self.tag.as_ref().map(Tag::label).unwrap_or_default()
    }
}
