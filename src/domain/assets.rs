use std::path::PathBuf;

use crate::domain::ticket::{Priority, Status};

pub fn status_asset(status: Status) -> &'static str {
    match status {
        Status::Backlog => "status/backlog.svg",
        Status::Todo => "status/todo.svg",
        Status::InProgress => "status/in-progress.svg",
        Status::Done => "status/done.svg",
        Status::Cancelled => "status/cancelled.svg",
    }
}

pub fn priority_asset(priority: Priority) -> &'static str {
    match priority.value() {
        4 => "priority/urgent.svg",
        3 => "priority/high.svg",
        2 => "priority/medium.svg",
        1 => "priority/low.svg",
        _ => "priority/no-priority.svg",
    }
}

pub fn status_glyph(status: Status) -> &'static str {
    match status {
        Status::Backlog => "◌",
        Status::Todo => "○",
        Status::InProgress => "◑",
        Status::Done => "●",
        Status::Cancelled => "⊘",
    }
}

pub fn priority_glyph(priority: Priority) -> &'static str {
    match priority.value() {
        4 => "!",
        3 => "▮▮▮",
        2 => "▮▮▯",
        1 => "▮▯▯",
        _ => "···",
    }
}

/// Resolves icon names against a root directory. Files are not checked for existence.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn status(&self, status: Status) -> PathBuf {
        self.root.join(status_asset(status))
    }

    pub fn priority(&self, priority: Priority) -> PathBuf {
        self.root.join(priority_asset(priority))
    }
}
