use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::board::{Board, Grouping, Ordering, build_board};
use crate::domain::card::CardView;
use crate::domain::ticket::{Ticket, TicketId};
use crate::domain::user::{User, UserDirectory};
use crate::services::BoardSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Focus {
    pub column: usize,
    pub card: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// All transient state of the board screen. Nothing here outlives the process.
#[derive(Debug, Clone)]
pub struct BoardState {
    tickets: Vec<Ticket>,
    users: Vec<User>,
    grouping: Grouping,
    ordering: Ordering,
    selected: HashSet<TicketId>,
    dropdown_open: bool,
    loading: bool,
    focus: Focus,
}

impl BoardState {
    pub fn new(grouping: Grouping, ordering: Ordering) -> Self {
        Self {
            tickets: Vec::new(),
            users: Vec::new(),
            grouping,
            ordering,
            selected: HashSet::new(),
            dropdown_open: false,
            loading: true,
            focus: Focus::default(),
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: BoardSnapshot) {
        self.tickets = snapshot.tickets;
        self.users = snapshot.users;
        self.loading = false;
        self.clamp_focus();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn directory(&self) -> UserDirectory<'_> {
        UserDirectory::new(&self.users)
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn ordering(&self) -> Ordering {
        self.ordering
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn board(&self) -> Board<'_> {
        build_board(&self.tickets, &self.directory(), self.grouping, self.ordering)
    }

    pub fn card(&self, ticket: &Ticket) -> CardView {
        CardView::project(
            ticket,
            &self.directory(),
            self.grouping,
            self.is_selected(&ticket.id),
        )
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    pub fn set_grouping(&mut self, grouping: Grouping) {
        if self.grouping != grouping {
            self.grouping = grouping;
            self.focus = Focus::default();
        }
    }

    pub fn set_ordering(&mut self, ordering: Ordering) {
        self.ordering = ordering;
    }

    pub fn cycle_grouping(&mut self) {
        self.set_grouping(self.grouping.next());
    }

    pub fn cycle_ordering(&mut self) {
        self.set_ordering(self.ordering.next());
    }

    pub fn is_selected(&self, id: &TicketId) -> bool {
        self.selected.contains(id)
    }

    pub fn toggle_selected(&mut self, id: &TicketId) {
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
    }

    pub fn focused_ticket_id(&self) -> Option<TicketId> {
        let board = self.board();
        board
            .columns
            .get(self.focus.column)
            .and_then(|column| column.tickets.get(self.focus.card))
            .map(|ticket| ticket.id.clone())
    }

    fn column_lengths(&self) -> Vec<usize> {
        self.board().columns.iter().map(|column| column.count()).collect()
    }

    fn clamp_focus(&mut self) {
        let lengths = self.column_lengths();
        if lengths.is_empty() {
            self.focus = Focus::default();
            return;
        }
        self.focus.column = self.focus.column.min(lengths.len() - 1);
        self.focus.card = self
            .focus
            .card
            .min(lengths[self.focus.column].saturating_sub(1));
    }

    pub fn focus_next_column(&mut self) {
        let columns = self.column_lengths().len();
        if self.focus.column + 1 < columns {
            self.focus.column += 1;
            self.clamp_focus();
        }
    }

    pub fn focus_previous_column(&mut self) {
        if self.focus.column > 0 {
            self.focus.column -= 1;
            self.clamp_focus();
        }
    }

    pub fn focus_next_card(&mut self) {
        self.focus.card += 1;
        self.clamp_focus();
    }

    pub fn focus_previous_card(&mut self) {
        self.focus.card = self.focus.card.saturating_sub(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        match key.code {
            KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Esc if self.dropdown_open => self.dropdown_open = false,
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('d') => self.toggle_dropdown(),
            KeyCode::Char('g') if self.dropdown_open => self.cycle_grouping(),
            KeyCode::Char('o') if self.dropdown_open => self.cycle_ordering(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => self.focus_previous_column(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.focus_next_column(),
            KeyCode::Up | KeyCode::Char('k') => self.focus_previous_card(),
            KeyCode::Down | KeyCode::Char('j') => self.focus_next_card(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.focused_ticket_id() {
                    self.toggle_selected(&id);
                }
            }
            _ => {}
        }
        KeyOutcome::Continue
    }
}
