use core::cell::{Cell, RefCell};
use core::convert::Infallible;

use volt_control::bsp::indicator::Indicator;

use crate::hal::digital::v2::OutputPin;

/// LED on a push-pull output, active high
pub struct GpioIndicator<P>
where
    P: OutputPin<Error = Infallible>,
{
    pub(crate) pin: RefCell<P>,
    pub(crate) state: Cell<bool>,
}

impl<P> Indicator for GpioIndicator<P>
where
    P: OutputPin<Error = Infallible>,
{
    fn set_active(&self, active: bool) {
        self.state.set(active);
        if active {
            self.pin.borrow_mut().set_high().ok();
        } else {
            self.pin.borrow_mut().set_low().ok();
        }
    }

    fn is_active(&self) -> bool {
        return self.state.get();
    }
}
