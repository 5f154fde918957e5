use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::domain::assets::{priority_glyph, status_glyph};
use crate::domain::card::{CardView, truncate_title};

pub const CARD_HEIGHT: u16 = 5;
pub const CARD_TITLE_WIDTH: usize = 24;

pub fn hex_color(hex: &str) -> Option<Color> {
    hex.parse::<Color>().ok()
}

pub fn card_lines(card: &CardView) -> Vec<Line<'static>> {
    let checkbox = if card.selected { "[x] " } else { "[ ] " };
    let mut header = vec![
        Span::raw(checkbox),
        Span::styled(
            card.id.to_string(),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(color) = card.user_color.and_then(hex_color) {
        header.push(Span::raw(" "));
        header.push(Span::styled("●", Style::default().fg(color)));
    }

    let mut title = Vec::new();
    if let Some(status) = card.status {
        title.push(Span::raw(format!("{} ", status_glyph(status))));
    }
    title.push(Span::raw(truncate_title(&card.title, CARD_TITLE_WIDTH)));

    let mut meta = Vec::new();
    if let Some(priority) = card.priority {
        meta.push(Span::raw(format!("{} ", priority_glyph(priority))));
    }
    meta.push(Span::styled(
        format!("│ {}", card.tag),
        Style::default().fg(Color::DarkGray),
    ));

    vec![Line::from(header), Line::from(title), Line::from(meta)]
}

pub fn render_card(frame: &mut ratatui::Frame<'_>, area: Rect, card: &CardView, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(card_lines(card)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::{Priority, Status, TicketId};

    fn line_text(line: &Line<'_>) -> String {
        line.spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect::<String>()
    }

    #[test]
    fn card_shows_every_badge_when_nothing_is_suppressed() {
        let card = CardView {
            id: TicketId::from("CAM-5"),
            title: "Enhance search functionality with filters".to_string(),
            status: Some(Status::Todo),
            priority: Some(Priority::URGENT),
            tag: "Feature Request".to_string(),
            user_color: Some("#FF5733"),
            selected: true,
        };
        let lines = card_lines(&card);

        assert_eq!(line_text(&lines[0]), "[x] CAM-5 ●");
        assert_eq!(line_text(&lines[1]), "○ Enhance search function…");
        assert_eq!(line_text(&lines[2]), "! │ Feature Request");
    }

    #[test]
    fn suppressed_badges_are_omitted() {
        let card = CardView {
            id: TicketId::from("CAM-6"),
            title: "Short".to_string(),
            status: None,
            priority: None,
            tag: String::new(),
            user_color: None,
            selected: false,
        };
        let lines = card_lines(&card);

        assert_eq!(line_text(&lines[0]), "[ ] CAM-6");
        assert_eq!(line_text(&lines[1]), "Short");
        assert_eq!(line_text(&lines[2]), "│ ");
    }

    #[test]
    fn parses_palette_colors() {
        assert_eq!(hex_color("#FF5733"), Some(Color::Rgb(0xFF, 0x57, 0x33)));
    }
}
