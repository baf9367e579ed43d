use log::{debug, error, info, warn};
use no_std_compat::cell::{Cell, RefCell};

use crate::annunciator::Annunciator;
use crate::bsp::adc::Converter;
use crate::bsp::indicator::Indicator;
use crate::config::MonitorConfig;
use crate::edt::EDT;
use crate::error::Result;
use crate::reading::to_volts;
use crate::rules::evaluate;
use crate::sampler::Sampler;

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum Action {
    /// The tick timer fired
    Measure,
    /// Next edge of the current announcement is due
    Blink,
}

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum Phase {
    /// Waiting for the next tick
    Idle,
    /// Sampling or announcing. Ticks arriving now are deferred.
    Measuring,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MonitorState {
    pub voltage: f32,
    pub last_blinked: f32,
    pub phase: Phase,
}

/// Samples the battery on every tick and blinks the voltage when it drops
pub struct MonitorControl<'a, C: Converter> {
    sampler: Sampler<C>,
    indicator: &'a dyn Indicator,
    edt: &'a EDT<Action>,
    config: MonitorConfig,
    annunciator: RefCell<Annunciator>,
    state: Cell<MonitorState>,
    timer_armed: Cell<bool>,
    tick_pending: Cell<bool>,
}

impl<'a, C: Converter> MonitorControl<'a, C> {
    pub fn new(
        sampler: Sampler<C>,
        indicator: &'a dyn Indicator,
        edt: &'a EDT<Action>,
        config: MonitorConfig,
    ) -> Self {
        return MonitorControl {
            sampler,
            indicator,
            edt,
            config,
            annunciator: RefCell::new(Annunciator::new(&config)),
            state: Cell::new(MonitorState {
                voltage: 0.0,
                last_blinked: 0.0,
                phase: Phase::Measuring,
            }),
            timer_armed: Cell::new(false),
            tick_pending: Cell::new(false),
        };
    }

    pub fn voltage(&self) -> f32 {
        self.state.get().voltage
    }

    pub fn last_blinked(&self) -> f32 {
        self.state.get().last_blinked
    }

    pub fn phase(&self) -> Phase {
        self.state.get().phase
    }

    pub fn state(&self) -> MonitorState {
        self.state.get()
    }

    pub fn sampler(&self) -> &Sampler<C> {
        &self.sampler
    }

    /// Takes the first measurement and blinks it. The tick timer is armed
    /// once this announcement is over.
    pub fn start(&self) -> Result<()> {
        self.indicator.set_active(false);
        self.sampler.initialize()?;
        let voltage = self.sample()?;
        info!("startup voltage {:.3} V", voltage);
        self.state.set(MonitorState {
            voltage,
            last_blinked: voltage,
            phase: Phase::Measuring,
        });

        {
            let mut annunciator = self.annunciator.borrow_mut();
            annunciator.pause(self.config.startup_delay_ms)?;
            annunciator.report_voltage(voltage)?;
        }
        self.blink()
    }

    pub fn process_message(&self, action: Action) -> Result<()> {
        match action {
            Action::Measure => self.on_timer(),
            Action::Blink => self.blink(),
        }
    }

    fn on_timer(&self) -> Result<()> {
        // the timer keeps running no matter how long the tick takes
        self.edt
            .schedule(self.config.tick_period_ms, Action::Measure)?;

        if self.phase() == Phase::Measuring {
            if self.tick_pending.get() {
                warn!("tick dropped, previous tick is still running");
            }
            self.tick_pending.set(true);
            return Ok(());
        }
        self.tick()
    }

    fn tick(&self) -> Result<()> {
        self.set_phase(Phase::Measuring);
        let voltage = match self.sample() {
            Ok(voltage) => voltage,
            Err(e) => {
                error!("tick skipped, sampling failed: {}", e);
                self.set_phase(Phase::Idle);
                return Ok(());
            }
        };

        let current = self.state.get();
        let verdict = evaluate(voltage, current.last_blinked, &self.config);
        debug!(
            "tick: {:.3} V, last blinked {:.3} V, {:?}",
            voltage, current.last_blinked, verdict
        );

        let last_blinked = if verdict.dropped {
            voltage
        } else {
            current.last_blinked
        };
        self.state.set(MonitorState {
            voltage,
            last_blinked,
            phase: Phase::Measuring,
        });

        if verdict.is_quiet() {
            self.set_phase(Phase::Idle);
            return Ok(());
        }

        {
            let mut annunciator = self.annunciator.borrow_mut();
            if verdict.low_voltage {
                annunciator.low_voltage_alert()?;
            }
            if verdict.dropped {
                annunciator.report_voltage(voltage)?;
            }
        }
        self.blink()
    }

    /// Shows the next edge, or finishes the announcement
    fn blink(&self) -> Result<()> {
        let next = self.annunciator.borrow_mut().advance(self.indicator);
        match next {
            Some(ms) => self.edt.schedule(ms, Action::Blink),
            None => self.on_announcement_done(),
        }
    }

    fn on_announcement_done(&self) -> Result<()> {
        if !self.timer_armed.get() {
            self.timer_armed.set(true);
            self.edt
                .schedule(self.config.tick_period_ms, Action::Measure)?;
            info!("tick timer armed, period {} ms", self.config.tick_period_ms);
        }

        if self.tick_pending.replace(false) {
            return self.tick();
        }
        self.set_phase(Phase::Idle);
        Ok(())
    }

    fn sample(&self) -> Result<f32> {
        let raw = self
            .sampler
            .read_averaged(self.config.channel, self.config.samples)?;
        Ok(to_volts(raw, self.config.scale))
    }

    fn set_phase(&self, phase: Phase) {
        let current = self.state.get();
        self.state.set(MonitorState { phase, ..current });
    }
}
