//! Route handlers behind `handle_request`.

pub mod export;
pub mod game;
pub mod roster;
pub mod util;
