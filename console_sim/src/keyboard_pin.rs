use std::cell::Cell;

use keyboard_query;
use keyboard_query::{DeviceQuery, DeviceState};

pub struct KeyboardPin {
    device_state: DeviceState,
    key_code: u16,
    was_down: Cell<bool>,
}

impl KeyboardPin {
    /// Factory function to create a [KeyboardPin]
    pub fn create(key_code: u16) -> KeyboardPin {
        let device_state = DeviceState::new();
        return KeyboardPin {
            device_state,
            key_code,
            was_down: Cell::new(false),
        };
    }

    /// returns true if the key is held down
    pub fn is_down(&self) -> bool {
        let keys = &self.device_state.get_keys();
        return keys.contains(&self.key_code);
    }

    /// returns true once per key press
    pub fn is_pressed(&self) -> bool {
        let down = self.is_down();
        let was_down = self.was_down.replace(down);
        down && !was_down
    }
}
