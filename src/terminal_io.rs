use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::{HeldKeys, Trigger, TickInput};

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, VecDeque<Event>>,
    current_frame: u64,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        let events = events.into_iter().map(|(frame, evs)| (frame, evs.into())).collect();
        SimulatedInput { events, current_frame: 0 }
    }

    /// Short scripted round used by headless debug runs.
    pub fn demo() -> Self {
        let press = |code: KeyCode| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        let mut script: HashMap<u64, Vec<Event>> = HashMap::new();
        for frame in 1..20 {
            script.insert(frame, vec![press(KeyCode::Up)]);
        }
        script.insert(20, vec![press(KeyCode::Char(' '))]);
        script.insert(25, vec![press(KeyCode::Tab)]);
        script.insert(26, vec![press(KeyCode::Char(' '))]);
        script.insert(27, vec![press(KeyCode::Tab)]);
        for frame in 30..45 {
            script.insert(frame, vec![press(KeyCode::Left), press(KeyCode::Char(' '))]);
        }
        script.insert(60, vec![press(KeyCode::Enter)]);
        script.insert(61, vec![press(KeyCode::Char('e'))]);
        script.insert(300, vec![press(KeyCode::Char('q'))]);
        SimulatedInput::new(script)
    }

    pub fn poll(&mut self, frame_count: u64) -> io::Result<bool> {
        self.current_frame = frame_count;
        Ok(self.events.get(&frame_count).is_some_and(|queue| !queue.is_empty()))
    }

    pub fn read(&mut self) -> io::Result<Event> {
        match self.events.get_mut(&self.current_frame).and_then(|queue| queue.pop_front()) {
            Some(event) => Ok(event),
            None => Ok(Event::Key(KeyCode::Null.into())),
        }
    }
}

// --- Keyboard state tracking ---

fn trigger_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Trigger> {
    match code {
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) && c.eq_ignore_ascii_case(&'c') => {
            Some(Trigger::Quit)
        }
        KeyCode::Char(' ') => Some(Trigger::Fire),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'e' => Some(Trigger::Emp),
            'h' => Some(Trigger::Hyper),
            's' => Some(Trigger::Shield),
            'q' => Some(Trigger::Quit),
            _ => None,
        },
        KeyCode::Enter => Some(Trigger::Gravity),
        KeyCode::Esc => Some(Trigger::Quit),
        _ => None,
    }
}

fn is_directional(code: KeyCode) -> bool {
    matches!(code, KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right)
}

/// Folds terminal key events into a per-tick `TickInput`.
///
/// Terminals that report key releases give true held state. Elsewhere a key
/// counts as held for the frame its press (or auto-repeat) arrived in.
/// The spread modifier latches on and off with each Tab press in both modes,
/// since Tab sends no release event under the kitty protocol.
pub struct KeyboardState {
    reports_release: bool,
    held: HashSet<KeyCode>,
    boost: bool,
    spread_latched: bool,
    triggers: Vec<Trigger>,
}

impl KeyboardState {
    pub fn new(reports_release: bool) -> Self {
        KeyboardState {
            reports_release,
            held: HashSet::new(),
            boost: false,
            spread_latched: false,
            triggers: Vec::new(),
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Event::Key(key) = event else {
            return;
        };
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if is_directional(key.code) {
                    self.held.insert(key.code);
                    self.boost = key.modifiers.contains(KeyModifiers::SHIFT);
                } else if key.code == KeyCode::Tab && key.kind == KeyEventKind::Press {
                    self.spread_latched = !self.spread_latched;
                }
                if key.kind == KeyEventKind::Press {
                    if let Some(trigger) = trigger_for(key.code, key.modifiers) {
                        self.triggers.push(trigger);
                    }
                }
            }
            KeyEventKind::Release => {
                self.held.remove(&key.code);
            }
        }
    }

    /// Input for the coming tick. Discrete presses are consumed.
    pub fn take_tick_input(&mut self) -> TickInput {
        let held = HeldKeys {
            up: self.held.contains(&KeyCode::Up),
            down: self.held.contains(&KeyCode::Down),
            left: self.held.contains(&KeyCode::Left),
            right: self.held.contains(&KeyCode::Right),
            boost: self.boost && self.held.iter().any(|code| is_directional(*code)),
            spread: self.spread_latched,
        };
        if !self.reports_release {
            self.held.clear();
        }
        TickInput { held, triggers: std::mem::take(&mut self.triggers) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent { code, modifiers, kind, state: KeyEventState::NONE })
    }

    fn press(code: KeyCode) -> Event {
        key(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    #[test]
    fn test_press_without_release_reports_lasts_one_tick() {
        let mut keyboard = KeyboardState::new(false);
        keyboard.handle_event(&press(KeyCode::Left));
        assert!(keyboard.take_tick_input().held.left);
        assert!(!keyboard.take_tick_input().held.left);
    }

    #[test]
    fn test_held_until_release() {
        let mut keyboard = KeyboardState::new(true);
        keyboard.handle_event(&press(KeyCode::Up));
        assert!(keyboard.take_tick_input().held.up);
        assert!(keyboard.take_tick_input().held.up);
        keyboard.handle_event(&key(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Release));
        assert!(!keyboard.take_tick_input().held.up);
    }

    #[test]
    fn test_shift_arrow_boosts() {
        let mut keyboard = KeyboardState::new(false);
        keyboard.handle_event(&key(KeyCode::Right, KeyModifiers::SHIFT, KeyEventKind::Press));
        let input = keyboard.take_tick_input();
        assert!(input.held.right && input.held.boost);
    }

    #[test]
    fn test_tab_latches_spread_without_release_reports() {
        let mut keyboard = KeyboardState::new(false);
        keyboard.handle_event(&press(KeyCode::Tab));
        assert!(keyboard.take_tick_input().held.spread);
        assert!(keyboard.take_tick_input().held.spread);
        keyboard.handle_event(&press(KeyCode::Tab));
        assert!(!keyboard.take_tick_input().held.spread);
    }

    #[test]
    fn test_tab_toggles_spread_without_release_event() {
        let mut keyboard = KeyboardState::new(true);
        keyboard.handle_event(&press(KeyCode::Tab));
        for _ in 0..5 {
            assert!(keyboard.take_tick_input().held.spread);
        }
        keyboard.handle_event(&press(KeyCode::Tab));
        for _ in 0..100 {
            assert!(!keyboard.take_tick_input().held.spread);
        }
    }

    #[test]
    fn test_tab_release_and_repeat_leave_spread_alone() {
        let mut keyboard = KeyboardState::new(true);
        keyboard.handle_event(&press(KeyCode::Tab));
        keyboard.handle_event(&key(KeyCode::Tab, KeyModifiers::NONE, KeyEventKind::Repeat));
        keyboard.handle_event(&key(KeyCode::Tab, KeyModifiers::NONE, KeyEventKind::Release));
        assert!(keyboard.take_tick_input().held.spread);
    }

    #[test]
    fn test_triggers_consumed_once() {
        let mut keyboard = KeyboardState::new(false);
        keyboard.handle_event(&press(KeyCode::Char(' ')));
        keyboard.handle_event(&press(KeyCode::Char('E')));
        keyboard.handle_event(&press(KeyCode::Enter));
        keyboard.handle_event(&press(KeyCode::Char('z')));
        assert_eq!(
            keyboard.take_tick_input().triggers,
            vec![Trigger::Fire, Trigger::Emp, Trigger::Gravity]
        );
        assert!(keyboard.take_tick_input().triggers.is_empty());
    }

    #[test]
    fn test_repeat_does_not_retrigger() {
        let mut keyboard = KeyboardState::new(true);
        keyboard.handle_event(&key(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Repeat));
        assert!(keyboard.take_tick_input().triggers.is_empty());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut keyboard = KeyboardState::new(false);
        keyboard.handle_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press));
        assert!(keyboard.take_tick_input().quit_requested());
    }

    #[test]
    fn test_simulated_input_replays_frame_events() {
        let mut script = HashMap::new();
        script.insert(3, vec![press(KeyCode::Up), press(KeyCode::Char('q'))]);
        let mut sim_input = SimulatedInput::new(script);
        assert!(!sim_input.poll(2).unwrap());
        assert!(sim_input.poll(3).unwrap());
        assert_eq!(sim_input.read().unwrap(), press(KeyCode::Up));
        assert!(sim_input.poll(3).unwrap());
        assert_eq!(sim_input.read().unwrap(), press(KeyCode::Char('q')));
        assert!(!sim_input.poll(3).unwrap());
    }
}
