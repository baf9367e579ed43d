#![no_std]
#![no_main]

extern crate cortex_m;
extern crate cortex_m_rt as rt;
extern crate jlink_rtt;
extern crate nb;
extern crate panic_halt;
extern crate stm32g0xx_hal as stm_hal;

use core::cell::{Cell, RefCell};

use log::{error, LevelFilter};
use nb::block;
use rt::{entry, exception, ExceptionFrame};
use stm_hal::analog::adc::Adc;
use stm_hal::prelude::*;
use stm_hal::{hal, stm32};

use volt_control::config::MonitorConfig;
use volt_control::control::MonitorControl;
use volt_control::edt::{Event, EDT};
use volt_control::sampler::Sampler;

use crate::adc::AdcConverter;
use crate::indicator::GpioIndicator;

mod adc;
mod indicator;
mod rtt_logger;

const CONFIG: MonitorConfig = MonitorConfig::DEFAULT;

#[entry]
fn main() -> ! {
    rtt_logger::init(LevelFilter::Info);

    // https://github.com/stm32-rs/stm32g0xx-hal
    let dp = stm32::Peripherals::take().unwrap();
    let cp = stm32::CorePeripherals::take().unwrap();
    let mut rcc = dp.RCC.constrain();

    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpiob = dp.GPIOB.split(&mut rcc);

    // PA3 is ADC_IN3, the battery divider
    let vin = gpioa.pa3;
    // D12
    let led = gpiob.pb4;

    let indicator = GpioIndicator {
        pin: RefCell::new(led.into_push_pull_output()),
        state: Cell::new(false),
    };

    let mut adc: Adc = dp.ADC.constrain(&mut rcc);
    cp.SYST.delay(&mut rcc).delay(20.us());
    adc.calibrate();

    let converter = AdcConverter {
        adc: RefCell::new(adc),
        vin_pin: RefCell::new(vin.into_analog()),
    };

    let mut timer = dp.TIM17.timer(&mut rcc);
    let edt = EDT::create();
    let monitor = MonitorControl::new(
        Sampler::new(converter, CONFIG.reference, CONFIG.prescaler),
        &indicator,
        &edt,
        CONFIG,
    );

    if let Err(e) = monitor.start() {
        error!("startup failed: {}", e);
    }

    loop {
        match edt.poll() {
            Event::Execute { msg } => {
                if let Err(e) = monitor.process_message(msg) {
                    error!("{:?} failed: {}", msg, e);
                }
            }
            Event::Wait { ms } => {
                timer.start(ms.ms());
                block!(timer.wait()).ok();
            }
            Event::Halt => {
                break;
            }
        }
    }
    panic!("");
}

#[exception]
fn HardFault(_ef: &ExceptionFrame) -> ! {
    panic!("");
}
