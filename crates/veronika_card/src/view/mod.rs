//! Rendering: DOM tree, theme, and the plan-to-markup functions.

pub mod dom;
pub mod render;
pub mod theme;

pub use dom::Element;
pub use dom::EventKind;
pub use dom::Node;
pub use dom::UiEvent;
pub use render::Action;
pub use render::Content;
pub use render::Listener;
pub use theme::Icon;
pub use theme::ThemeColor;
