use std::fmt::Write as _;

use serde::Serialize;

use crate::context::AppContext;
use crate::domain::assets::{AssetResolver, priority_glyph, status_glyph};
use crate::domain::board::{Board, Grouping, HeaderBadge, Ordering, build_board};
use crate::domain::card::{CardView, truncate_title};
use crate::domain::user::UserDirectory;
use crate::error::{AppError, AppResult};
use crate::workflow::load::load_board;

const TEXT_TITLE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Fetches once and renders the derived board as a string.
pub async fn run(ctx: &AppContext, format: OutputFormat) -> AppResult<String> {
    let snapshot = load_board(ctx.ticket_source.as_ref()).await;
    let directory = UserDirectory::new(&snapshot.users);
    let board = build_board(
        &snapshot.tickets,
        &directory,
        ctx.config.grouping,
        ctx.config.ordering,
    );

    match format {
        OutputFormat::Text => Ok(render_text(&board, &directory)),
        OutputFormat::Json => render_json(&board, &directory, &ctx.assets),
    }
}

fn badge_text(badge: &HeaderBadge) -> String {
    match badge {
        HeaderBadge::Status { status } => format!("{} ", status_glyph(*status)),
        HeaderBadge::Priority { priority } => format!("{} ", priority_glyph(*priority)),
        HeaderBadge::UserColor { color: Some(color) } => format!("● {color} "),
        HeaderBadge::UserColor { color: None } => String::new(),
    }
}

fn card_text(card: &CardView) -> String {
    let mut line = format!("  {:<8}", card.id.as_str());
    if let Some(status) = card.status {
        let _ = write!(line, " {}", status_glyph(status));
    }
    let _ = write!(line, " {}", truncate_title(&card.title, TEXT_TITLE_WIDTH));
    if let Some(priority) = card.priority {
        let _ = write!(line, "  {} {}", priority_glyph(priority), priority.name());
    }
    if !card.tag.is_empty() {
        let _ = write!(line, "  [{}]", card.tag);
    }
    if let Some(color) = card.user_color {
        let _ = write!(line, "  ● {color}");
    }
    line
}

pub fn render_text(board: &Board<'_>, directory: &UserDirectory<'_>) -> String {
    let mut out = format!(
        "Grouping: {}  Ordering: {}  Tickets: {}\n",
        board.grouping.label(),
        board.ordering.label(),
        board.ticket_count()
    );
    for column in &board.columns {
        let _ = writeln!(
            out,
            "\n{}{} ({})",
            badge_text(&column.badge),
            column.label,
            column.count()
        );
        for ticket in &column.tickets {
            let card = CardView::project(ticket, directory, board.grouping, false);
            let _ = writeln!(out, "{}", card_text(&card));
        }
    }
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardJson {
    grouping: Grouping,
    ordering: Ordering,
    columns: Vec<ColumnJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ColumnJson {
    label: String,
    count: usize,
    badge: HeaderBadge,
    icon: Option<String>,
    cards: Vec<CardJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardJson {
    #[serde(flatten)]
    card: CardView,
    status_icon: Option<String>,
    priority_icon: Option<String>,
}

pub fn render_json(
    board: &Board<'_>,
    directory: &UserDirectory<'_>,
    assets: &AssetResolver,
) -> AppResult<String> {
    let path_string = |path: std::path::PathBuf| path.display().to_string();

    let columns = board
        .columns
        .iter()
        .map(|column| ColumnJson {
            label: column.label.clone(),
            count: column.count(),
            icon: match &column.badge {
                HeaderBadge::Status { status } => Some(path_string(assets.status(*status))),
                HeaderBadge::Priority { priority } => {
                    Some(path_string(assets.priority(*priority)))
                }
                HeaderBadge::UserColor { .. } => None,
            },
            badge: column.badge.clone(),
            cards: column
                .tickets
                .iter()
                .map(|ticket| {
                    let card = CardView::project(ticket, directory, board.grouping, false);
                    CardJson {
                        status_icon: card.status.map(|status| path_string(assets.status(status))),
                        priority_icon: card
                            .priority
                            .map(|priority| path_string(assets.priority(priority))),
                        card,
                    }
                })
                .collect(),
        })
        .collect();

    encode_json(&BoardJson {
        grouping: board.grouping,
        ordering: board.ordering,
        columns,
    })
}

fn encode_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Encode(format!("failed to encode board: {err}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::config::AppConfig;
    use crate::domain::ticket::{Priority, Status, Tag, Ticket, TicketId};
    use crate::domain::user::User;
    use crate::services::{BoardSnapshot, TicketSource};

    fn snapshot() -> BoardSnapshot {
        BoardSnapshot {
            tickets: vec![
                Ticket {
                    id: TicketId::from("CAM-1"),
                    title: "Update user profile page UI".to_string(),
                    status: Status::Todo,
                    priority: Priority::URGENT,
                    user_id: "usr-1".to_string(),
                    tag: Some(Tag::List(vec![String::new()])),
                },
                Ticket {
                    id: TicketId::from("CAM-2"),
                    title: "Add multi-language support".to_string(),
                    status: Status::Todo,
                    priority: Priority::HIGH,
                    user_id: "usr-2".to_string(),
                    tag: None,
                },
            ],
            users: vec![User {
                id: "usr-1".to_string(),
                name: "Anoop Sharma".to_string(),
                available: true,
            }],
        }
    }

    struct StaticSource(BoardSnapshot);

    #[async_trait]
    impl TicketSource for StaticSource {
        async fn fetch_snapshot(&self) -> AppResult<BoardSnapshot> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl TicketSource for FailingSource {
        async fn fetch_snapshot(&self) -> AppResult<BoardSnapshot> {
            Err(AppError::Fetch("connection reset".to_string()))
        }
    }

    fn context(source: Arc<dyn TicketSource>, grouping: Grouping, ordering: Ordering) -> AppContext {
        AppContext::new(
            AppConfig {
                endpoint: "http://localhost/board".to_string(),
                grouping,
                ordering,
                asset_root: "/icons".into(),
            },
            source,
        )
    }

    #[test]
    fn text_lists_columns_in_board_order() {
        let snapshot = snapshot();
        let directory = UserDirectory::new(&snapshot.users);
        let board = build_board(&snapshot.tickets, &directory, Grouping::Status, Ordering::Title);
        let text = render_text(&board, &directory);

        let todo = text.find("○ Todo (2)").unwrap();
        let done = text.find("● Done (0)").unwrap();
        let cancelled = text.find("⊘ Cancelled (0)").unwrap();
        assert!(todo < done && done < cancelled);

        let first = text.find("CAM-2").unwrap();
        let second = text.find("CAM-1").unwrap();
        assert!(first < second);
        assert!(text.contains("[Feature Request]"));
        assert!(text.contains("! Urgent"));
        assert!(text.contains("● #FF5733"));
        assert!(text.starts_with("Grouping: Status  Ordering: Title  Tickets: 2\n"));
    }

    #[test]
    fn json_carries_icons_and_suppresses_grouped_badge() {
        let snapshot = snapshot();
        let directory = UserDirectory::new(&snapshot.users);
        let board = build_board(&snapshot.tickets, &directory, Grouping::Priority, Ordering::Title);
        let json = render_json(&board, &directory, &AssetResolver::new("/icons")).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["grouping"], "priority");
        let urgent = &value["columns"][0];
        assert_eq!(urgent["label"], "Urgent");
        assert_eq!(urgent["icon"], "/icons/priority/urgent.svg");
        assert_eq!(urgent["badge"]["kind"], "priority");

        let card = &urgent["cards"][0];
        assert_eq!(card["id"], "CAM-1");
        assert_eq!(card["status"], "Todo");
        assert_eq!(card["statusIcon"], "/icons/status/todo.svg");
        assert_eq!(card["priority"], Value::Null);
        assert_eq!(card["priorityIcon"], Value::Null);
        assert_eq!(card["tag"], "Feature Request");
    }

    #[tokio::test]
    async fn run_groups_fetched_tickets_by_user() {
        let ctx = context(
            Arc::new(StaticSource(snapshot())),
            Grouping::User,
            Ordering::Priority,
        );
        let text = run(&ctx, OutputFormat::Text).await.unwrap();

        assert!(text.contains("● #FF5733 Anoop Sharma (1)"));
        assert!(text.contains("Unknown User (1)"));
    }

    #[tokio::test]
    async fn failed_fetch_renders_an_empty_board() {
        let ctx = context(Arc::new(FailingSource), Grouping::Status, Ordering::Title);
        let text = run(&ctx, OutputFormat::Text).await.unwrap();

        assert!(text.contains("Done (0)"));
        assert!(text.contains("Cancelled (0)"));
        assert!(!text.contains("CAM-"));
    }

    #[test]
    fn unencodable_value_is_an_encode_error() {
        let mut by_pair = std::collections::HashMap::new();
        by_pair.insert((1_u8, 2_u8), 3_u8);

        match encode_json(&by_pair) {
            Err(AppError::Encode(message)) => assert!(message.contains("failed to encode board")),
            other => panic!("expected encode error, got {other:?}"),
        }
    }

    #[test]
    fn parses_output_format() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }
}
