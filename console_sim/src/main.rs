use std::io;
use std::io::Stdout;
use std::thread::sleep;
use std::time::Duration;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::error;
use tui::backend::CrosstermBackend;
use tui::layout::{Alignment, Constraint, Direction, Layout};
use tui::style::{Color, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, BorderType, Borders, Paragraph};
use tui::Terminal;

use volt_control::bsp::indicator::Indicator;
use volt_control::config::MonitorConfig;
use volt_control::control::{MonitorControl, MonitorState, Phase};
use volt_control::edt::{Event, EDT};
use volt_control::sampler::Sampler;

use crate::dummy_indicator::DummyIndicator;
use crate::keyboard_pin::KeyboardPin;
use crate::sim_battery::{SimBattery, SimConverter};

mod dummy_indicator;
mod keyboard_pin;
mod sim_battery;

const CONFIG: MonitorConfig = MonitorConfig::DEFAULT;
const STEP_MV: u32 = 50;
const FRAME_MS: u32 = 20;

/// Run with `RUST_LOG=debug console_sim 2> monitor.log` to keep the log out of the UI
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (esc_pin, up_pin, down_pin) = keys();
    let battery = SimBattery::create(3700);
    let indicator = DummyIndicator::create();
    let edt = EDT::create();

    let millivolts_per_count = (CONFIG.scale * 1000.0).round() as u32;
    let sampler = Sampler::new(
        SimConverter::create(&battery, millivolts_per_count),
        CONFIG.reference,
        CONFIG.prescaler,
    );
    let monitor = MonitorControl::new(sampler, &indicator, &edt, CONFIG);
    monitor.start().map_err(|e| e.to_string())?;

    enable_raw_mode()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let adjust_battery = || {
        if up_pin.is_pressed() {
            battery.charge(STEP_MV);
        }
        if down_pin.is_pressed() {
            battery.discharge(STEP_MV);
        }
    };

    loop {
        if esc_pin.is_down() {
            edt.exit();
        }
        adjust_battery();

        match edt.poll() {
            Event::Execute { msg } => {
                if let Err(e) = monitor.process_message(msg) {
                    error!("{:?} failed: {}", msg, e);
                }
            }
            Event::Wait { ms } => {
                // sleep in frames so the keys and the screen stay responsive
                let mut remaining = ms;
                while remaining > 0 && !esc_pin.is_down() {
                    let frame = remaining.min(FRAME_MS);
                    sleep(Duration::from_millis(frame as u64));
                    remaining -= frame;
                    adjust_battery();
                    draw_tui(&mut terminal, &battery, &indicator, monitor.state())?;
                }
            }
            Event::Halt => {
                break;
            }
        }

        draw_tui(&mut terminal, &battery, &indicator, monitor.state())?;
    }

    disable_raw_mode()?;

    Ok(())
}

fn draw_tui(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    battery: &SimBattery,
    indicator: &DummyIndicator,
    state: MonitorState,
) -> io::Result<()> {
    terminal.draw(|rect| {
        let size = rect.size();
        let vertical_layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([Constraint::Length(3), Constraint::Min(2)].as_ref())
            .split(size);

        let led_color = if indicator.is_active() {
            Color::Rgb(255, 200, 0)
        } else {
            Color::Black
        };
        let led_paragraph = Paragraph::new(Spans::from(Span::styled(
            "   LED   ",
            Style::default().bg(led_color),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );

        let phase = match state.phase {
            Phase::Idle => "idle",
            Phase::Measuring => "measuring",
        };

        let sim_paragraph = Paragraph::new(vec![
            Spans::from(Span::raw(format!(
                "battery:      {:.2} V",
                battery.millivolts() as f32 / 1000.0
            ))),
            Spans::from(Span::raw(format!("measured:     {:.3} V", state.voltage))),
            Spans::from(Span::raw(format!(
                "last blinked: {:.3} V",
                state.last_blinked
            ))),
            Spans::from(Span::raw(format!("phase:        {}", phase))),
            Spans::from(Span::raw(format!("blinks:       {}", indicator.blinks()))),
            Spans::from(Span::raw("")),
            Spans::from(Span::raw(format!(
                "up/down: {} mV, esc: quit",
                STEP_MV
            ))),
        ])
        .alignment(Alignment::Left);

        rect.render_widget(led_paragraph, vertical_layout[0]);
        rect.render_widget(sim_paragraph, vertical_layout[1]);
    })?;
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn keys() -> (KeyboardPin, KeyboardPin, KeyboardPin) {
    return (
        KeyboardPin::create(1),
        KeyboardPin::create(103),
        KeyboardPin::create(108),
    );
}

#[cfg(target_os = "windows")]
fn keys() -> (KeyboardPin, KeyboardPin, KeyboardPin) {
    return (
        KeyboardPin::create(27),
        KeyboardPin::create(38),
        KeyboardPin::create(40),
    );
}
