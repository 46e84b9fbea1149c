use crate::bookings::{Schedule, ViewState};
use crate::calendar::{Calendar, WeekWindow};
use crate::datepick::{DatePick, DatePickInput, DatePickOutput, DatePickState};
use crate::help::Help;
use crate::listing::BookingList;
use crate::slotbar::SlotBar;
use crate::theme::BASE_STYLE;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::rc::Rc;
use time::{Date, Duration};

/// Height of the bordered bookings pane
const LIST_LINES: u16 = 8;

/// Height of the bordered slot bar
const SLOT_LINES: u16 = 3;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    today: Date,
    schedule: Rc<Schedule>,
    view: ViewState,
    weeks: WeekWindow<Rc<Schedule>>,
    state: AppState,
}

impl App {
    pub(crate) fn new(today: Date, schedule: Rc<Schedule>, view: ViewState) -> App {
        let weeks = WeekWindow::new(today, Rc::clone(&schedule))
            .start_date(view.reference_date().unwrap_or(today));
        App {
            today,
            schedule,
            view,
            weeks,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Left => self.shift_reference(Duration::days(-1)),
                KeyCode::Right => self.shift_reference(Duration::days(1)),
                KeyCode::Up => self.shift_reference(Duration::weeks(-1)),
                KeyCode::Down => self.shift_reference(Duration::weeks(1)),
                KeyCode::Char('k') => self.weeks.one_week_backwards().is_ok(),
                KeyCode::Char('j') => self.weeks.one_week_forwards().is_ok(),
                KeyCode::PageUp => self.weeks.one_page_backwards().is_ok(),
                KeyCode::PageDown => self.weeks.one_page_forwards().is_ok(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.view.set_reference_date(self.today);
                    self.weeks.jump_to_today();
                    true
                }
                KeyCode::Char('v') => {
                    self.view.set_granularity(self.view.granularity().cycled());
                    true
                }
                KeyCode::Char(c @ '1'..='9') => self.pick_slot(c),
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(DatePickState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('-') => state.handle_input(DatePickInput::Negative),
                        KeyCode::Char('+') => state.handle_input(DatePickInput::Positive),
                        KeyCode::Char(c @ '0'..='9') => {
                            let digit = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                            match digit {
                                Some(d) => state.handle_input(DatePickInput::Digit(d)),
                                None => DatePickOutput::Invalid,
                            }
                        }
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(DatePickInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(DatePickInput::Enter),
                        _ => DatePickOutput::Invalid,
                    };
                    match output {
                        DatePickOutput::Ok => true,
                        DatePickOutput::Invalid => false,
                        DatePickOutput::Jump(date) => {
                            self.state = AppState::Calendar;
                            self.view.set_reference_date(date);
                            self.weeks.scroll_into_view(date);
                            true
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    // Occupied slots are refused here, before the view state ever sees the
    // selection; the state itself does not check.
    fn pick_slot(&mut self, key: char) -> bool {
        let Some(idx) = key
            .to_digit(10)
            .and_then(|d| usize::try_from(d).ok())
            .and_then(|d| d.checked_sub(1))
        else {
            return false;
        };
        let Some(reference) = self.view.reference_date() else {
            return false;
        };
        let Some(slot) = self.schedule.slots().get(idx) else {
            return false;
        };
        if self.schedule.is_booked(reference, slot) {
            false
        } else {
            let slot = slot.clone();
            self.view.select_time(slot);
            true
        }
    }

    fn shift_reference(&mut self, delta: Duration) -> bool {
        let base = self.view.reference_date().unwrap_or(self.today);
        match base.checked_add(delta) {
            Some(date) => {
                self.view.set_reference_date(date);
                self.weeks.scroll_into_view(date);
                true
            }
            None => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    #[cfg(test)]
    fn view(&self) -> &ViewState {
        &self.view
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [cal_area, list_area, slot_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(LIST_LINES),
            Constraint::Length(SLOT_LINES),
        ])
        .areas(area);
        Calendar::new(self.view.reference_date()).render(cal_area, buf, &mut self.weeks);
        BookingList::new(&self.schedule, &self.view).render(list_area, buf);
        SlotBar::new(&self.schedule, &self.view).render(slot_area, buf);
        if self.state == AppState::Helping {
            Help.render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            DatePick.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(DatePickState),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::{Booking, Granularity};
    use time::macros::date;

    fn roster() -> Vec<String> {
        vec![
            "10:00".to_string(),
            "12:00".to_string(),
            "14:00".to_string(),
            "16:00".to_string(),
        ]
    }

    fn sample_app() -> App {
        let today = date!(2024 - 06 - 03);
        let schedule = Rc::new(Schedule::new(
            vec![
                Booking::new(date!(2024 - 06 - 03), "10:00"),
                Booking::new(date!(2024 - 06 - 10), "12:00"),
            ],
            roster(),
        ));
        let view = ViewState::new(today);
        App::new(today, schedule, view)
    }

    #[test]
    fn arrow_keys_move_the_reference_date() {
        let mut app = sample_app();
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.view().reference_date(), Some(date!(2024 - 06 - 04)));
        assert!(app.handle_key(KeyCode::Down));
        assert_eq!(app.view().reference_date(), Some(date!(2024 - 06 - 11)));
        assert!(app.handle_key(KeyCode::Left));
        assert!(app.handle_key(KeyCode::Up));
        assert_eq!(app.view().reference_date(), Some(date!(2024 - 06 - 03)));
    }

    #[test]
    fn view_key_cycles_granularity() {
        let mut app = sample_app();
        assert_eq!(app.view().granularity(), Granularity::Daily);
        assert!(app.handle_key(KeyCode::Char('v')));
        assert_eq!(app.view().granularity(), Granularity::Weekly);
        assert!(app.handle_key(KeyCode::Char('v')));
        assert_eq!(app.view().granularity(), Granularity::Monthly);
        assert!(app.handle_key(KeyCode::Char('v')));
        assert_eq!(app.view().granularity(), Granularity::Daily);
    }

    #[test]
    fn free_slot_can_be_picked() {
        let mut app = sample_app();
        assert!(app.handle_key(KeyCode::Char('2')));
        assert_eq!(app.view().selected_time(), Some("12:00"));
    }

    #[test]
    fn occupied_slot_is_refused() {
        let mut app = sample_app();
        assert!(!app.handle_key(KeyCode::Char('1')));
        assert_eq!(app.view().selected_time(), None);
    }

    #[test]
    fn slot_number_past_the_roster_is_refused() {
        let mut app = sample_app();
        assert!(!app.handle_key(KeyCode::Char('9')));
        assert_eq!(app.view().selected_time(), None);
    }

    #[test]
    fn selection_survives_moving_the_reference_date() {
        let mut app = sample_app();
        assert!(app.handle_key(KeyCode::Char('2')));
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.view().selected_time(), Some("12:00"));
    }

    #[test]
    fn go_to_popup_sets_the_reference_date() {
        let mut app = sample_app();
        assert!(app.handle_key(KeyCode::Char('g')));
        for c in ['2', '0', '2', '4', '1', '2', '2', '5'] {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.view().reference_date(), Some(date!(2024 - 12 - 25)));
        assert_eq!(app.state, AppState::Calendar);
    }

    #[test]
    fn help_dismisses_on_any_key() {
        let mut app = sample_app();
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Calendar);
    }

    #[test]
    fn quit_keys_end_the_session() {
        let mut app = sample_app();
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
    }

    #[test]
    fn today_key_returns_home() {
        let mut app = sample_app();
        for _ in 0..30 {
            assert!(app.handle_key(KeyCode::Right));
        }
        assert!(app.handle_key(KeyCode::Char('0')));
        assert_eq!(app.view().reference_date(), Some(date!(2024 - 06 - 03)));
    }

    #[test]
    fn full_frame_renders_every_pane() {
        let mut app = sample_app();
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let mut text = String::new();
        for y in 0..24 {
            for x in 0..80 {
                if let Some(cell) = buffer.cell(ratatui::layout::Position::new(x, y)) {
                    text.push_str(cell.symbol());
                }
            }
            text.push('\n');
        }
        assert!(text.contains("Su     Mo     Tu     We     Th     Fr     Sa"));
        assert!(text.contains("Bookings (daily view)"));
        assert!(text.contains("2024-06-03  10:00"));
        assert!(text.contains("Time slots"));
        assert!(text.contains("1:10:00"));
    }
}
