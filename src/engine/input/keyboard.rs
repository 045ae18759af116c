// Keyboard channel source

use super::channel::{Channel, ChannelSource, DeviceMask, SharedChannel};
use super::config::BoundInput;
use super::event::InputEvent;
use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use winit::keyboard::KeyCode;

/// Keys whose events are dropped because they misbehave as game controls
const IGNORED_KEYS: &[KeyCode] = &[KeyCode::NumLock];

/// Keyboard snapshot shared between the source and its channels
#[derive(Debug, Default)]
pub struct KeyboardState {
    down: HashSet<KeyCode>,
    /// (key, now down) for every key event in the current frame
    frame_events: Vec<(KeyCode, bool)>,
}

impl KeyboardState {
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }
}

/// One physical key
#[derive(Debug)]
pub struct KeyChannel {
    state: Rc<RefCell<KeyboardState>>,
    key: KeyCode,
    neutral_down: Cell<bool>,
}

impl KeyChannel {
    fn new(state: Rc<RefCell<KeyboardState>>, key: KeyCode) -> Self {
        Self {
            state,
            key,
            neutral_down: Cell::new(false),
        }
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }
}

impl Channel for KeyChannel {
    fn is_on(&self) -> bool {
        self.state.borrow().is_down(self.key) != self.neutral_down.get()
    }

    fn matches_frame_events(&self) -> bool {
        let neutral = self.neutral_down.get();
        self.state
            .borrow()
            .frame_events
            .iter()
            .any(|&(key, down)| key == self.key && down != neutral)
    }

    fn value(&self) -> f32 {
        if self.is_on() {
            1.0
        } else {
            0.0
        }
    }

    fn set_neutral(&self) {
        self.neutral_down.set(self.state.borrow().is_down(self.key));
    }

    fn desc(&self, mask: DeviceMask) -> String {
        if mask.contains(DeviceMask::KEYBOARD) {
            key_name(self.key)
        } else {
            String::new()
        }
    }

    fn bound_input(&self) -> Option<BoundInput> {
        Some(BoundInput::Key { key: self.key })
    }
}

/// Display name for a key: `KeyA` becomes `A`, `Digit1` becomes `1`
pub fn key_name(key: KeyCode) -> String {
    let name = format!("{:?}", key);
    if let Some(rest) = name.strip_prefix("Key") {
        rest.to_string()
    } else if let Some(rest) = name.strip_prefix("Digit") {
        rest.to_string()
    } else {
        name
    }
}

/// Keyboard device: one channel per key, created on first request or first event
#[derive(Debug, Default)]
pub struct Keyboard {
    state: Rc<RefCell<KeyboardState>>,
    channels: HashMap<KeyCode, Rc<KeyChannel>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the shared channel for a key
    pub fn key_channel(&mut self, key: KeyCode) -> SharedChannel {
        let channel = self
            .channels
            .entry(key)
            .or_insert_with(|| Rc::new(KeyChannel::new(Rc::clone(&self.state), key)));
        Rc::clone(channel) as SharedChannel
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.state.borrow().is_down(key)
    }
}

impl ChannelSource for Keyboard {
    fn update(&mut self, events: &[InputEvent]) {
        let mut seen = Vec::new();
        {
            let mut state = self.state.borrow_mut();
            state.frame_events.clear();

            for event in events {
                let (key, down) = match *event {
                    InputEvent::KeyDown(key) => (key, true),
                    InputEvent::KeyUp(key) => (key, false),
                    _ => continue,
                };
                if IGNORED_KEYS.contains(&key) {
                    debug!("Ignoring event for key {:?}", key);
                    continue;
                }
                if down {
                    state.down.insert(key);
                } else {
                    state.down.remove(&key);
                }
                state.frame_events.push((key, down));
                seen.push(key);
            }
        }

        // Every key that produced an event gets a channel, so rebinding can find it
        for key in seen {
            self.key_channel(key);
        }
    }

    fn channels(&self) -> Vec<SharedChannel> {
        self.channels
            .values()
            .map(|ch| Rc::clone(ch) as SharedChannel)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_pressed_then_held() {
        let mut kbd = Keyboard::new();
        let space = kbd.key_channel(KeyCode::Space);

        kbd.update(&[InputEvent::KeyDown(KeyCode::Space)]);
        assert!(space.is_on());
        assert!(space.matches_frame_events());
        assert_eq!(space.value(), 1.0);

        kbd.update(&[]);
        assert!(space.is_on(), "held key stays on");
        assert!(!space.matches_frame_events(), "but only matches on the toggle frame");

        kbd.update(&[InputEvent::KeyUp(KeyCode::Space)]);
        assert!(!space.is_on());
        assert!(!space.matches_frame_events(), "release is not an on-event");
    }

    #[test]
    fn test_other_key_does_not_match() {
        let mut kbd = Keyboard::new();
        let space = kbd.key_channel(KeyCode::Space);
        kbd.update(&[InputEvent::KeyDown(KeyCode::KeyA)]);
        assert!(!space.is_on());
        assert!(!space.matches_frame_events());
    }

    #[test]
    fn test_same_key_shares_channel() {
        let mut kbd = Keyboard::new();
        let a = kbd.key_channel(KeyCode::KeyA);
        let b = kbd.key_channel(KeyCode::KeyA);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(kbd.channels().len(), 1);
    }

    #[test]
    fn test_neutral_held_key() {
        let mut kbd = Keyboard::new();
        let shift = kbd.key_channel(KeyCode::ShiftLeft);
        kbd.update(&[InputEvent::KeyDown(KeyCode::ShiftLeft)]);
        kbd.set_neutral();
        assert!(!shift.is_on(), "held key became the rest state");

        kbd.update(&[InputEvent::KeyUp(KeyCode::ShiftLeft)]);
        assert!(shift.is_on());
        assert!(shift.matches_frame_events());
    }

    #[test]
    fn test_ignored_keys() {
        let mut kbd = Keyboard::new();
        kbd.update(&[InputEvent::KeyDown(KeyCode::NumLock)]);
        assert!(!kbd.is_down(KeyCode::NumLock));
        assert!(kbd.channels().is_empty());
    }

    #[test]
    fn test_events_create_channels() {
        let mut kbd = Keyboard::new();
        kbd.update(&[InputEvent::KeyDown(KeyCode::KeyQ)]);
        let channels = kbd.channels();
        assert_eq!(channels.len(), 1);
        assert!(channels[0].matches_frame_events());
        assert_eq!(
            channels[0].bound_input(),
            Some(BoundInput::key(KeyCode::KeyQ))
        );
    }

    #[test]
    fn test_key_desc() {
        let mut kbd = Keyboard::new();
        assert_eq!(kbd.key_channel(KeyCode::KeyW).desc(DeviceMask::ALL), "W");
        assert_eq!(kbd.key_channel(KeyCode::Space).desc(DeviceMask::ALL), "Space");
        assert_eq!(kbd.key_channel(KeyCode::Space).desc(DeviceMask::GAMEPAD), "");
    }
}
