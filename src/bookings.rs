use crate::calendar::DateStyler;
use crate::theme::{BUSY_DAY_STYLE, FULL_DAY_STYLE};
use ratatui::style::Style;
use std::fmt;
use std::rc::Rc;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration};

pub(crate) static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// A single appointment: one slot on one day.  The pair is unique within a
/// schedule; upstream data is trusted on that point.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Booking {
    pub(crate) date: Date,
    pub(crate) time: String,
}

impl Booking {
    pub(crate) fn new<S: Into<String>>(date: Date, time: S) -> Booking {
        Booking {
            date,
            time: time.into(),
        }
    }
}

/// Window mode used to filter the bookings shown alongside the calendar.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Granularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub(crate) fn cycled(self) -> Granularity {
        match self {
            Granularity::Daily => Granularity::Weekly,
            Granularity::Weekly => Granularity::Monthly,
            Granularity::Monthly => Granularity::Daily,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user is currently looking at: the focused day, the window mode,
/// and the slot picked so far.  Mutated only through the methods below, all
/// driven by key events.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct ViewState {
    reference_date: Option<Date>,
    granularity: Granularity,
    selected_time: Option<String>,
}

impl ViewState {
    pub(crate) fn new(today: Date) -> ViewState {
        ViewState {
            reference_date: Some(today),
            granularity: Granularity::Daily,
            selected_time: None,
        }
    }

    pub(crate) fn reference_date(&self) -> Option<Date> {
        self.reference_date
    }

    pub(crate) fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub(crate) fn selected_time(&self) -> Option<&str> {
        self.selected_time.as_deref()
    }

    // Deliberately leaves `selected_time` alone; see DESIGN.md.
    pub(crate) fn set_reference_date(&mut self, date: Date) {
        self.reference_date = Some(date);
    }

    pub(crate) fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    /// Callers must have checked `Schedule::is_booked()` first; the state
    /// itself accepts any slot label.
    pub(crate) fn select_time<S: Into<String>>(&mut self, time: S) {
        self.selected_time = Some(time.into());
    }
}

/// The full known set of bookings plus the roster of bookable slot labels.
/// Loaded once at startup and never mutated afterwards; every query is a
/// pure read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Schedule {
    bookings: Vec<Booking>,
    slots: Vec<String>,
}

impl Schedule {
    pub(crate) fn new(bookings: Vec<Booking>, slots: Vec<String>) -> Schedule {
        Schedule { bookings, slots }
    }

    pub(crate) fn slots(&self) -> &[String] {
        &self.slots
    }

    pub(crate) fn is_booked(&self, date: Date, time: &str) -> bool {
        self.bookings
            .iter()
            .any(|b| b.date == date && b.time == time)
    }

    pub(crate) fn is_date_booked(&self, date: Date) -> bool {
        self.bookings.iter().any(|b| b.date == date)
    }

    pub(crate) fn is_date_full(&self, date: Date) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(|slot| self.is_booked(date, slot))
    }

    /// The bookings inside the window implied by the view's granularity
    /// around its reference date, in input order.  An unset reference date
    /// yields nothing.
    pub(crate) fn visible_bookings(&self, view: &ViewState) -> Vec<&Booking> {
        let Some(reference) = view.reference_date() else {
            return Vec::new();
        };
        match view.granularity() {
            Granularity::Daily => self.filtered(|b| b.date == reference),
            Granularity::Weekly => {
                let (start, end) = week_of(reference);
                self.filtered(|b| start <= b.date && b.date <= end)
            }
            Granularity::Monthly => self.filtered(|b| {
                b.date.year() == reference.year() && b.date.month() == reference.month()
            }),
        }
    }

    fn filtered<P: Fn(&Booking) -> bool>(&self, pred: P) -> Vec<&Booking> {
        self.bookings.iter().filter(|&b| pred(b)).collect()
    }
}

impl DateStyler for Rc<Schedule> {
    fn date_style(&self, date: Date) -> Style {
        if self.is_date_full(date) {
            FULL_DAY_STYLE
        } else if self.is_date_booked(date) {
            BUSY_DAY_STYLE
        } else {
            Style::new()
        }
    }
}

/// The Sunday-through-Saturday week containing `date`, both ends inclusive.
/// Weeks start on Sunday to match the calendar grid.  Clamped at the limits
/// of representable time.
pub(crate) fn week_of(date: Date) -> (Date, Date) {
    let back = i64::from(date.weekday().number_days_from_sunday());
    let start = date.checked_sub(Duration::days(back)).unwrap_or(Date::MIN);
    let end = start.checked_add(Duration::days(6)).unwrap_or(Date::MAX);
    (start, end)
}

pub(crate) fn format_ymd(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
