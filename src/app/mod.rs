mod config;
mod gauge;
mod lcd;

pub use config::AppConfig;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::{debug, info, warn};
use ratatui::{prelude::*, style::palette::tailwind, widgets::*, DefaultTerminal};
use std::{
    num::ParseFloatError,
    time::{Duration, Instant},
};
use thiserror::Error;

use crate::{
    app::{gauge::ProgressBar, lcd::{LcdError, St7789}},
    cmd::{LineSource, RawReading, SerialConnection, SerialError},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("LCD error: {0}")]
    Lcd(#[from] LcdError),
    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Failures while handling one serial read.
#[derive(Debug, Error)]
pub enum TickError {
    #[error("{0}")]
    Serial(#[from] SerialError),
    #[error("{0}")]
    Parse(#[from] ParseFloatError),
}

struct AppStyle {
    title_fg: Color,
    value_fg: Color,
    scale_fg: Color,
    error_fg: Color,
}

pub struct App {
    exit: bool,
    value_label: String,
    error_label: String,
    progress_bar: ProgressBar,
    style: AppStyle,
    config: AppConfig,
    lcd: St7789,
    serial: Option<Box<dyn LineSource>>,
    next_read: Option<Instant>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let app_style = AppStyle {
            title_fg: Color::White,
            value_fg: Color::White,
            scale_fg: tailwind::ZINC.c400,
            error_fg: tailwind::RED.c400,
        };
        Self {
            exit: false,
            value_label: String::new(),
            error_label: String::new(),
            progress_bar: ProgressBar::new(config.animation_duration),
            style: app_style,
            lcd: St7789::new(config.lcd_pins),
            config,
            serial: None,
            next_read: None,
        }
    }

    pub async fn run(&mut self, mut terminal: DefaultTerminal) -> Result<(), AppError> {
        self.lcd.init()?;
        terminal.draw(|frame| self.ui(frame))?;
        self.start_serial_listener(Instant::now());
        while !self.exit {
            self.handle_read_timer(Instant::now());
            terminal.draw(|frame| self.ui(frame))?;
            self.handle_keyboard_events()?;
            tokio::time::sleep(self.config.frame_rate).await;
        }
        self.on_stop();
        Ok(())
    }

    fn start_serial_listener(&mut self, now: Instant) {
        let opened = SerialConnection::open(
            &self.config.port,
            self.config.baud_rate,
            self.config.read_timeout,
        );
        self.attach_serial(opened.map(|conn| Box::new(conn) as Box<dyn LineSource>), now);
    }

    fn attach_serial(&mut self, opened: Result<Box<dyn LineSource>, SerialError>, now: Instant) {
        match opened {
            Ok(conn) => {
                info!("Connected to serial port '{}'", self.config.port);
                self.serial = Some(conn);
                self.next_read = Some(now + self.config.read_interval);
            }
            Err(err) => self.show_error_message(format!("Serial error: {err}")),
        }
    }

    fn handle_read_timer(&mut self, now: Instant) {
        let Some(due) = self.next_read else {
            return;
        };
        if now < due {
            return;
        }
        self.read_serial_data(now);
        let next = due + self.config.read_interval;
        // a stalled read must not queue up a burst of catch-up ticks
        self.next_read = Some(if next <= now { now + self.config.read_interval } else { next });
    }

    fn read_serial_data(&mut self, now: Instant) {
        if let Err(err) = self.try_read_serial_data(now) {
            self.show_error_message(format!("Error: {err}"));
        }
    }

    fn try_read_serial_data(&mut self, now: Instant) -> Result<(), TickError> {
        let line = match self.serial.as_mut() {
            Some(serial) => serial.read_line()?,
            None => return Ok(()),
        };
        if line.is_empty() {
            return Ok(());
        }
        let Some(reading) = RawReading::from_line(&line) else {
            debug!("skipping short line {line:?}");
            return Ok(());
        };
        self.update_label(reading.label);
        let value = reading.value()?;
        self.update_progress_bar(value, now);
        Ok(())
    }

    fn update_label(&mut self, value: &str) {
        self.value_label = format!("{value}°C");
    }

    fn update_progress_bar(&mut self, value: f64, now: Instant) {
        self.progress_bar.update(value, now);
        debug!(
            "progress {:.2} color {:?}",
            self.progress_bar.target(),
            self.progress_bar.color()
        );
    }

    fn show_error_message(&mut self, message: String) {
        warn!("{message}");
        self.error_label = message;
    }

    fn on_stop(&mut self) {
        if let Some(mut serial) = self.serial.take() {
            if serial.is_open() {
                serial.close();
                info!("Serial port closed.");
            }
        }
    }

    fn handle_keyboard_events(&mut self) -> Result<(), std::io::Error> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn ui(&self, frame: &mut Frame) {
        let (error_area, title_area, value_area, scale_area) = Self::create_layout(frame.area());
        frame.render_widget(
            Paragraph::new(self.error_label.as_str())
                .centered()
                .fg(self.style.error_fg),
            error_area,
        );
        frame.render_widget(
            Paragraph::new("Temperature")
                .centered()
                .bold()
                .fg(self.style.title_fg),
            title_area,
        );
        frame.render_widget(
            Paragraph::new(self.value_label.as_str())
                .centered()
                .fg(self.style.value_fg)
                .block(Block::new().padding(Padding::top(value_area.height.saturating_sub(1) / 2))),
            value_area,
        );
        self.render_progress_bar(frame, scale_area, Instant::now());
    }

    fn render_progress_bar(&self, frame: &mut Frame, area: Rect, now: Instant) {
        let [top, bar_area, bottom] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let shown = self.progress_bar.value_at(now).clamp(0.0, 100.0);
        let bar = vec![
            Bar::default()
                .value(shown.round() as u64)
                .text_value(String::new())
                .style(Color::from(self.progress_bar.color()))
        ];
        let bar_chart = BarChart::default()
            .data(BarGroup::default().bars(&bar))
            .direction(Direction::Vertical)
            .bar_width(3)
            .max(100);
        frame.render_widget(Paragraph::new("200°C").fg(self.style.scale_fg), top);
        frame.render_widget(bar_chart, bar_area);
        frame.render_widget(Paragraph::new(" 0°C").fg(self.style.scale_fg), bottom);
    }

    fn create_layout(area: Rect) -> (Rect, Rect, Rect, Rect) {
        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(10),
            ])
            .split(area);
        let readout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Min(10),
                Constraint::Length(7),
            ])
            .split(main_layout[2]);
        (main_layout[0], main_layout[1], readout[0], readout[1])
    }
}
