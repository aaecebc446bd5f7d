/// Keyboard input for the terminal shell.
///
/// The player's direction is latched by the simulation, so only fresh key
/// presses matter here: each frame drains every pending terminal event and
/// keeps the presses. Release events are ignored.
///
/// Bindings:
///   - Arrows, WASD, HJKL → directional intent
///   - q / Esc / Ctrl-C   → quit
///   - r                  → restart (honored only after the game ends)

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Dir;

pub struct InputState {
    /// Presses collected during the most recent `drain_events()` call.
    presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { presses: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame, before any tick handler runs.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Release {
                    self.presses.push(key);
                }
            }
        }
    }

    /// Directional intents pressed this frame, oldest first.
    pub fn intents(&self) -> impl Iterator<Item = Dir> + '_ {
        self.presses.iter().filter_map(|k| key_to_dir(k.code))
    }

    pub fn quit_requested(&self) -> bool {
        self.presses.iter().any(|k| {
            matches!(k.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
                || (k.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C')))
        })
    }

    pub fn restart_requested(&self) -> bool {
        self.presses
            .iter()
            .any(|k| matches!(k.code, KeyCode::Char('r') | KeyCode::Char('R')))
    }
}

fn key_to_dir(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('k') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') => Some(Dir::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn every_binding_maps_to_a_direction() {
        assert_eq!(key_to_dir(KeyCode::Up), Some(Dir::Up));
        assert_eq!(key_to_dir(KeyCode::Char('a')), Some(Dir::Left));
        assert_eq!(key_to_dir(KeyCode::Char('j')), Some(Dir::Down));
        assert_eq!(key_to_dir(KeyCode::Char('l')), Some(Dir::Right));
        assert_eq!(key_to_dir(KeyCode::Char('x')), None);
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_does_not() {
        let mut input = InputState::new();
        input.presses.push(press(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!input.quit_requested());
        input.presses.push(press(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.quit_requested());
    }

    #[test]
    fn intents_keep_press_order() {
        let mut input = InputState::new();
        input.presses.push(press(KeyCode::Left, KeyModifiers::NONE));
        input.presses.push(press(KeyCode::Char('r'), KeyModifiers::NONE));
        input.presses.push(press(KeyCode::Char('w'), KeyModifiers::NONE));
        assert_eq!(input.intents().collect::<Vec<_>>(), vec![Dir::Left, Dir::Up]);
        assert!(input.restart_requested());
    }
}
