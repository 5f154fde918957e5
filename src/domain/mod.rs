pub mod assets;
pub mod board;
pub mod card;
pub mod ticket;
pub mod user;
