pub mod plain_renderer;
pub mod theme;
pub mod widgets;

pub use plain_renderer::PlainRenderer;
pub use theme::OutputMode;
pub use widgets::{KeyValue, MessageBlock};
