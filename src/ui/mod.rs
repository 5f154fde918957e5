pub mod card;
pub mod render;
pub mod runtime;
pub mod state;

pub use runtime::Ui;
pub use state::BoardState;
