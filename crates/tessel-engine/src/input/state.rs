use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyAction, Modifiers};

/// Current input state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an event to the current state and records it in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoids stuck keys when focus changes mid-press.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, action, modifiers, .. } => {
                self.modifiers = *modifiers;
                match action {
                    KeyAction::Press => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyAction::Repeat => {}
                    KeyAction::Release => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, action: KeyAction) -> InputEvent {
        InputEvent::Key { key, action, modifiers: Modifiers::default(), code: 0 }
    }

    #[test]
    fn press_and_release_are_tracked() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::P, KeyAction::Press));
        assert!(s.key_down(Key::P));
        assert!(f.keys_pressed.contains(&Key::P));

        s.apply_event(&mut f, key(Key::P, KeyAction::Release));
        assert!(!s.key_down(Key::P));
        assert!(f.keys_released.contains(&Key::P));
        assert_eq!(f.events.len(), 2);
    }

    #[test]
    fn repeat_is_recorded_but_not_a_new_press() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::X, KeyAction::Press));
        f.clear();
        s.apply_event(&mut f, key(Key::X, KeyAction::Repeat));
        assert!(f.keys_pressed.is_empty());
        assert_eq!(f.events.len(), 1);
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::A, KeyAction::Press));
        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(s.keys_down.is_empty());
    }
}
