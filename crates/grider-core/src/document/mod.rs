//! Document state and logic (UI-agnostic).

mod command;
mod eval;
mod io;
mod ops;
mod state;

pub use command::CommandOutcome;
pub use io::FileFormat;
pub use state::Document;
