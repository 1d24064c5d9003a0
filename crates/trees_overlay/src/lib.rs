pub mod text_overlay;

pub use text_overlay::{layout_text, ScreenText, TextCommand, TextOverlay};
