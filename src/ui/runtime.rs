use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::services::BoardSnapshot;
use crate::ui::render::draw;
use crate::ui::state::{BoardState, KeyOutcome};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct Ui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Ui {
    pub fn init() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Runs until the user quits. The snapshot is applied whenever it arrives; input is
    /// handled the whole time.
    pub fn run(
        &mut self,
        mut state: BoardState,
        mut snapshot: oneshot::Receiver<BoardSnapshot>,
    ) -> io::Result<()> {
        let mut waiting = true;
        let mut force_draw = true;

        loop {
            if waiting {
                match snapshot.try_recv() {
                    Ok(loaded) => {
                        state.apply_snapshot(loaded);
                        waiting = false;
                        force_draw = true;
                    }
                    Err(TryRecvError::Closed) => {
                        tracing::warn!("board loader exited without a snapshot");
                        state.apply_snapshot(BoardSnapshot::default());
                        waiting = false;
                        force_draw = true;
                    }
                    Err(TryRecvError::Empty) => {}
                }
            }

            if force_draw {
                self.terminal.draw(|frame| draw(frame, &state))?;
                force_draw = false;
            }

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if state.handle_key(key) == KeyOutcome::Quit {
                            break;
                        }
                        force_draw = true;
                    }
                    Event::Resize(_, _) => force_draw = true,
                    _ => {}
                }
            }
        }

        Ok(())
    }
}

impl Drop for Ui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
    }
}
