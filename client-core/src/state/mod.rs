pub mod input_history;
pub mod scrollback;

pub use input_history::InputHistory;
pub use scrollback::Scrollback;
