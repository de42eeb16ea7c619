pub mod terminal_state;

pub use terminal_state::TerminalState;
