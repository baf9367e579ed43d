use heapless::Vec;
use no_std_compat::cell::{Cell, RefCell};
use no_std_compat::cmp::Ordering;

use crate::error::{Error, Result};

pub const EDT_CAPACITY: usize = 8;

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub struct Msg<T: Sized> {
    pub when: u32,
    pub order: u32,
    pub payload: T,
}

/// Event dispatch thread: a timed message queue with a virtual clock.
///
/// The clock is a wrapping `u32` of milliseconds. Deadlines are compared
/// relative to `now`, so the queue keeps working when the clock wraps
/// after ~49.7 days. A single delay must stay below `u32::MAX`.
pub struct EDT<T> {
    now: Cell<u32>,
    sequence: Cell<u32>,
    queue: RefCell<Vec<Msg<T>, EDT_CAPACITY>>,
}

impl<T: Copy> EDT<T> {
    pub fn create() -> EDT<T> {
        EDT {
            now: Cell::new(0),
            sequence: Cell::new(0),
            queue: RefCell::new(Vec::new()),
        }
    }
}

pub enum Event<T> {
    Execute { msg: T },
    Wait { ms: u32 },
    Halt,
}

impl<T: Copy> EDT<T> {
    pub fn now(&self) -> u32 {
        self.now.get()
    }

    /// Returns the next due message, or how long to wait for it.
    ///
    /// The clock is moved to the due time of the head before [Event::Wait] is
    /// returned, the caller has to actually wait that long.
    pub fn poll(&self) -> Event<T> {
        let head_option = self.peek_head();

        if let Some(head) = head_option {
            let to_wait = head.when.wrapping_sub(self.now.get());
            // change new now
            self.now.set(head.when);
            if to_wait > 0 {
                Event::Wait { ms: to_wait }
            } else {
                self.queue
                    .borrow_mut()
                    .retain(|it| !(it.when == head.when && it.order == head.order));
                Event::Execute { msg: head.payload }
            }
        } else {
            Event::Halt
        }
    }

    /// Advances the time by the given value and feeds messages to the handler
    pub fn advance_time_by(&self, time: u32, handler: &dyn Fn(T)) {
        let target = self.now.get().wrapping_add(time);
        let mut elapsed: u32 = 0;
        loop {
            match self.poll() {
                Event::Execute { msg } => {
                    handler(msg);
                }
                Event::Wait { ms } => {
                    elapsed = elapsed.saturating_add(ms);
                    if elapsed > time {
                        self.now.set(target);
                        break;
                    }
                }
                Event::Halt => {
                    self.now.set(target);
                    break;
                }
            }
        }
    }

    fn peek_head(&self) -> Option<Msg<T>> {
        let now = self.now.get();
        self.queue
            .borrow()
            .iter()
            .min_by(|lhs, rhs| {
                let by_when = lhs.when.wrapping_sub(now).cmp(&rhs.when.wrapping_sub(now));
                match by_when {
                    Ordering::Equal => sequence_cmp(lhs.order, rhs.order),
                    _ => by_when,
                }
            })
            .cloned()
    }

    pub fn schedule(&self, delay: u32, payload: T) -> Result<()> {
        let when = self.now.get().wrapping_add(delay);
        let order = self.sequence.get();
        self.sequence.set(order.wrapping_add(1));

        self.queue
            .borrow_mut()
            .push(Msg {
                when,
                order,
                payload,
            })
            .map_err(|_| Error::QueueFull)
    }

    pub fn remove<F>(&self, mut predicate: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.queue.borrow_mut().retain(|it| !predicate(&it.payload));
    }

    /// Drops everything queued, the next poll halts
    pub fn exit(&self) {
        self.queue.borrow_mut().clear();
    }

    pub fn queue_len(&self) -> usize {
        self.queue.borrow().len()
    }
}

/// Serial number comparison, valid while the compared numbers are less than
/// `i32::MAX` apart. The queue holds at most [EDT_CAPACITY] messages.
fn sequence_cmp(lhs: u32, rhs: u32) -> Ordering {
    (lhs.wrapping_sub(rhs) as i32).cmp(&0)
}
