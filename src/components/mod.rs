pub mod command_input;
pub mod output_display;
pub mod prompt_indicator;
pub mod terminal;

pub use command_input::CommandInput;
pub use output_display::OutputDisplay;
pub use prompt_indicator::PromptIndicator;
pub use terminal::Terminal;
