pub mod autosize;
pub mod directive;
pub mod dispatcher;

pub use autosize::{FieldMetrics, InputAutosize, MonospaceMeasure, TextMeasure, ViewportLayout};
pub use directive::{parse_directive, DIRECTIVE_PREFIX};
pub use dispatcher::{InputDispatcher, InputField, KeyInput, KeyOutcome};
