//! Per-frame input snapshot with edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   physically down. Camera panning reads this.
//!
//! - **Edge-triggered (just_pressed):** true only during the frame the press
//!   happened. Quit and planting read this, so a held button plants once.
//!
//! Scroll is accumulated in lines between frames. `end_frame()` clears the
//! edges and the scroll accumulator; the main loop calls it after every frame.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
}

#[derive(Debug)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    mouse_just_pressed: HashSet<MouseBtn>,

    /// Cursor position in logical window pixels, origin top-left, y down.
    pub mouse_position: (f64, f64),
    scroll_lines: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            mouse_held: HashSet::new(),
            mouse_just_pressed: HashSet::new(),
            mouse_position: (0.0, 0.0),
            scroll_lines: 0.0,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.mouse_just_pressed.insert(btn);
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        self.mouse_held.remove(&btn);
    }

    /// Accumulate vertical wheel movement. Positive is away from the user.
    pub fn scroll(&mut self, lines: f32) {
        self.scroll_lines += lines;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.mouse_just_pressed.contains(&btn)
    }

    /// Scroll lines received since the last `end_frame()`; zero when the wheel was idle.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_lines
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.mouse_just_pressed.clear();
        self.scroll_lines = 0.0;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        assert!(input.is_held(Key::Left));
        assert!(input.is_just_pressed(Key::Left));
    }

    #[test]
    fn test_key_up_clears_held() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_up(Key::Up);
        assert!(!input.is_held(Key::Up));
    }

    #[test]
    fn test_key_repeat_does_not_re_press_after_end_frame() {
        let mut input = InputState::new();
        input.key_down(Key::Escape);
        input.end_frame();
        // OS key repeat delivers another Pressed event while the key is held.
        input.key_down(Key::Escape);
        assert!(input.is_held(Key::Escape));
        assert!(!input.is_just_pressed(Key::Escape));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.mouse_down(MouseBtn::Left);
        input.scroll(1.5);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::Right));
        assert!(!input.is_mouse_just_pressed(MouseBtn::Left));
        assert_eq!(input.scroll_delta(), 0.0);
        // Held state should persist across frames.
        assert!(input.is_held(Key::Right));
        assert!(input.is_mouse_held(MouseBtn::Left));
    }

    #[test]
    fn test_mouse_click_is_edge_triggered() {
        let mut input = InputState::new();
        input.mouse_down(MouseBtn::Left);
        assert!(input.is_mouse_just_pressed(MouseBtn::Left));
        input.end_frame();
        input.mouse_up(MouseBtn::Left);
        assert!(!input.is_mouse_held(MouseBtn::Left));
        input.mouse_down(MouseBtn::Left);
        assert!(input.is_mouse_just_pressed(MouseBtn::Left));
    }

    #[test]
    fn test_scroll_accumulates_within_a_frame() {
        let mut input = InputState::new();
        input.scroll(1.0);
        input.scroll(-0.25);
        assert!((input.scroll_delta() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mouse_position_tracking() {
        let mut input = InputState::new();
        input.mouse_position = (100.0, 200.0);
        assert!((input.mouse_position.0 - 100.0).abs() < f64::EPSILON);
        assert!((input.mouse_position.1 - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_state_is_empty() {
        let input = InputState::default();
        assert!(!input.is_held(Key::Left));
        assert!(!input.is_just_pressed(Key::Escape));
        assert!(!input.is_mouse_held(MouseBtn::Left));
        assert!(!input.is_mouse_just_pressed(MouseBtn::Left));
        assert_eq!(input.scroll_delta(), 0.0);
    }
}
