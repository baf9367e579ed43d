use std::cell::Cell;

use volt_control::bsp::indicator::Indicator;

/// Indicator which resides in memory, for simulation or testing
pub struct DummyIndicator {
    active: Cell<bool>,
    blinks: Cell<u32>,
}

impl DummyIndicator {
    /// Factory function to create a dummy indicator
    pub fn create() -> Self {
        return DummyIndicator {
            active: Cell::new(false),
            blinks: Cell::new(0),
        };
    }

    /// Number of times the indicator was switched on
    pub fn blinks(&self) -> u32 {
        self.blinks.get()
    }
}

impl Indicator for DummyIndicator {
    fn set_active(&self, active: bool) {
        if active && !self.active.get() {
            self.blinks.set(self.blinks.get() + 1);
        }
        self.active.set(active);
    }

    fn is_active(&self) -> bool {
        return self.active.get();
    }
}
