use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::domain::assets::{priority_glyph, status_glyph};
use crate::domain::board::{Column, Grouping, HeaderBadge, Ordering};
use crate::ui::card::{CARD_HEIGHT, hex_color, render_card};
use crate::ui::state::BoardState;

pub const COLUMN_WIDTH: u16 = 36;
const DROPDOWN_WIDTH: u16 = 40;
const DROPDOWN_HEIGHT: u16 = 5;

pub fn draw(frame: &mut Frame<'_>, state: &BoardState) {
    let [toolbar_area, board_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(frame.area());

    render_toolbar(frame, toolbar_area, state);

    if state.is_loading() {
        frame.render_widget(
            Paragraph::new("Loading tickets…").block(Block::default().borders(Borders::ALL)),
            board_area,
        );
    } else {
        render_columns(frame, board_area, state);
    }

    if state.is_dropdown_open() {
        render_dropdown(frame, board_area, state.grouping(), state.ordering());
    }
}

fn render_toolbar(frame: &mut Frame<'_>, area: Rect, state: &BoardState) {
    let arrow = if state.is_dropdown_open() { "▲" } else { "▼" };
    let line = Line::from(vec![
        Span::styled(
            format!(" Display {arrow} "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  d display · ←→ columns · ↑↓ cards · space select · q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("kanban")),
        area,
    );
}

/// One selector row: the key hint followed by every option, the current one bracketed.
fn selector_line<'a>(name: &'a str, key: char, options: &[(&'a str, bool)]) -> Line<'a> {
    let mut spans = vec![Span::styled(
        format!("{name} ({key}) "),
        Style::default().fg(Color::DarkGray),
    )];
    for (label, current) in options {
        if *current {
            spans.push(Span::styled(
                format!("[{label}]"),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(format!(" {label} ")));
        }
    }
    Line::from(spans)
}

/// The panel is clipped to the board area on small terminals rather than hidden.
fn render_dropdown(frame: &mut Frame<'_>, anchor: Rect, grouping: Grouping, ordering: Ordering) {
    let popup = Rect {
        x: anchor.x + u16::from(anchor.width > DROPDOWN_WIDTH),
        y: anchor.y,
        width: DROPDOWN_WIDTH,
        height: DROPDOWN_HEIGHT,
    }
    .intersection(anchor);
    if popup.is_empty() {
        return;
    }

    let groupings = Grouping::ALL.map(|option| (option.label(), option == grouping));
    let orderings = Ordering::ALL.map(|option| (option.label(), option == ordering));
    let content = vec![
        selector_line("Grouping", 'g', &groupings),
        selector_line("Ordering", 'o', &orderings),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(content).block(Block::default().title("Display").borders(Borders::ALL)),
        popup,
    );
}

/// First visible index so that `focused` stays on screen with `visible` slots.
fn scroll_offset(focused: usize, visible: usize) -> usize {
    if visible == 0 {
        return focused;
    }
    focused.saturating_sub(visible - 1)
}

fn render_columns(frame: &mut Frame<'_>, area: Rect, state: &BoardState) {
    let board = state.board();
    let focus = state.focus();
    let visible = usize::from((area.width / COLUMN_WIDTH).max(1));
    let offset = scroll_offset(focus.column, visible);

    let shown = board
        .columns
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .collect::<Vec<_>>();
    if shown.is_empty() {
        return;
    }

    let areas = Layout::horizontal(shown.iter().map(|_| Constraint::Length(COLUMN_WIDTH)))
        .split(area);

    for ((index, column), column_area) in shown.into_iter().zip(areas.iter()) {
        let focused_card = (index == focus.column).then_some(focus.card);
        render_column(frame, *column_area, column, state, focused_card);
    }
}

fn header_line(column: &Column<'_>, focused: bool) -> Line<'static> {
    let mut spans = Vec::new();
    match &column.badge {
        HeaderBadge::Status { status } => {
            spans.push(Span::raw(format!("{} ", status_glyph(*status))))
        }
        HeaderBadge::Priority { priority } => {
            spans.push(Span::raw(format!("{} ", priority_glyph(*priority))))
        }
        HeaderBadge::UserColor { color } => {
            if let Some(color) = (*color).and_then(hex_color) {
                spans.push(Span::styled("● ", Style::default().fg(color)));
            }
        }
    }

    let label_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    spans.push(Span::styled(column.label.clone(), label_style));
    spans.push(Span::styled(
        format!(" {}", column.count()),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

fn render_column(
    frame: &mut Frame<'_>,
    area: Rect,
    column: &Column<'_>,
    state: &BoardState,
    focused_card: Option<usize>,
) {
    let border_style = if focused_card.is_some() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(header_line(column, focused_card.is_some()))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = usize::from(inner.height / CARD_HEIGHT);
    let offset = scroll_offset(focused_card.unwrap_or(0), visible);

    for (slot, (index, ticket)) in column
        .tickets
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .enumerate()
    {
        let card_area = Rect {
            x: inner.x,
            y: inner.y + CARD_HEIGHT * slot as u16,
            width: inner.width,
            height: CARD_HEIGHT,
        };
        render_card(
            frame,
            card_area,
            &state.card(ticket),
            focused_card == Some(index),
        );
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    use super::*;
    use crate::domain::ticket::{Priority, Status, Tag, Ticket, TicketId};
    use crate::domain::user::User;
    use crate::services::BoardSnapshot;

    fn buffer_text(buffer: &Buffer) -> String {
        let width = usize::from(buffer.area.width);
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(state: &BoardState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn loaded_state() -> BoardState {
        let mut state = BoardState::new(Grouping::Status, Ordering::Title);
        state.apply_snapshot(BoardSnapshot {
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
                    status: Status::InProgress,
                    priority: Priority::HIGH,
                    user_id: "usr-1".to_string(),
                    tag: Some(Tag::Text("Bug".to_string())),
                },
            ],
            users: vec![User {
                id: "usr-1".to_string(),
                name: "Anoop Sharma".to_string(),
                available: true,
            }],
        });
        state
    }

    #[test]
    fn shows_loading_until_snapshot_arrives() {
        let state = BoardState::new(Grouping::Status, Ordering::Title);
        let screen = render(&state, 100, 20);
        assert!(screen.contains("Loading tickets…"));
        assert!(screen.contains("Display ▼"));
    }

    #[test]
    fn renders_status_columns_with_counts_and_cards() {
        let screen = render(&loaded_state(), 160, 24);

        assert!(screen.contains("Todo 1"));
        assert!(screen.contains("In progress 1"));
        assert!(screen.contains("Done 0"));
        assert!(screen.contains("Cancelled 0"));
        assert!(screen.contains("CAM-1"));
        assert!(screen.contains("Feature Request"));
        assert!(screen.contains("Update user profile pag…"));
    }

    #[test]
    fn narrow_terminal_scrolls_to_focused_column() {
        let mut state = loaded_state();
        state.focus_next_column();
        state.focus_next_column();

        let screen = render(&state, COLUMN_WIDTH, 24);
        assert!(screen.contains("Done 0"));
        assert!(!screen.contains("Todo 1"));
    }

    #[test]
    fn dropdown_lists_current_selectors() {
        let mut state = loaded_state();
        state.toggle_dropdown();
        state.set_grouping(Grouping::Priority);

        let screen = render(&state, 120, 24);
        assert!(screen.contains("Display ▲"));
        assert!(screen.contains("Grouping (g)  Status  User [Priority]"));
        assert!(screen.contains("Ordering (o) [Title] Priority"));
    }

    #[test]
    fn dropdown_is_clipped_on_a_small_terminal() {
        let mut state = loaded_state();
        state.toggle_dropdown();

        let screen = render(&state, 20, 8);
        assert!(screen.contains("Grouping (g)"));
        assert!(screen.contains("Ordering (o)"));
    }

    #[test]
    fn dropdown_is_skipped_when_there_is_no_room() {
        let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_dropdown(
                    frame,
                    Rect { height: 0, ..area },
                    Grouping::Status,
                    Ordering::Title,
                )
            })
            .unwrap();
        assert!(!buffer_text(terminal.backend().buffer()).contains("Grouping"));
    }

    #[test]
    fn scroll_offset_keeps_focus_visible() {
        assert_eq!(scroll_offset(0, 3), 0);
        assert_eq!(scroll_offset(2, 3), 0);
        assert_eq!(scroll_offset(5, 3), 3);
        assert_eq!(scroll_offset(4, 0), 4);
    }
}
