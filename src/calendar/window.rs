use super::util::{Week, WeekFactory};
use super::DateStyler;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use thiserror::Error;
use time::{Date, Duration};

/// A window of consecutive weeks centered near a start date, lazily built
/// once the widget knows how many weeks fit on screen.  Scrolling keeps the
/// window the same size; the ends of representable time are reported as
/// [`OutOfTimeError`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeekWindow<S> {
    pub(super) today: Date,
    start_date: Date,
    // Invariant: non-empty when Some
    weeks: Option<VecDeque<Week>>,
    week_factory: WeekFactory<S>,
}

impl<S: DateStyler> WeekWindow<S> {
    pub(crate) fn new(today: Date, date_styler: S) -> Self {
        let week_factory = WeekFactory::new(date_styler);
        WeekWindow {
            today,
            start_date: today,
            week_factory,
            weeks: None,
        }
    }

    pub(crate) fn start_date(mut self, date: Date) -> Self {
        self.start_date = date;
        self
    }

    pub(super) fn ensure_weeks(&mut self, week_qty: NonZeroUsize) -> &VecDeque<Week> {
        if let Some(weeks) = self.weeks.as_mut() {
            match weeks.len().cmp(&week_qty.get()) {
                Ordering::Less => {
                    let missing = week_qty.get() - weeks.len();
                    if let Some((back, qty)) =
                        weeks.back().copied().zip(NonZeroUsize::new(missing))
                    {
                        if let Some(mut extension) = self.week_factory.weeks_after(back, qty) {
                            weeks.append(&mut extension);
                        }
                    }
                    // The terminal was heightened while at the end of time,
                    // so "scroll" the calendar down by prepending weeks from
                    // before the window.
                    let missing = week_qty.get().saturating_sub(weeks.len());
                    if let Some((front, qty)) =
                        weeks.front().copied().zip(NonZeroUsize::new(missing))
                    {
                        if let Some(prextension) = self.week_factory.weeks_before(front, qty) {
                            for w in prextension.into_iter().rev() {
                                weeks.push_front(w);
                            }
                        }
                    }
                }
                Ordering::Greater => weeks.truncate(week_qty.get()),
                Ordering::Equal => (),
            }
        }
        self.weeks
            .get_or_insert_with(|| self.week_factory.around_date(self.start_date, week_qty))
    }

    /// First day currently in the window, once the window has been built.
    pub(crate) fn first_date(&self) -> Option<Date> {
        self.weeks
            .as_ref()
            .and_then(VecDeque::front)
            .and_then(Week::first_date)
    }

    /// Last day currently in the window, once the window has been built.
    pub(crate) fn last_date(&self) -> Option<Date> {
        self.weeks
            .as_ref()
            .and_then(VecDeque::back)
            .and_then(Week::last_date)
    }

    pub(crate) fn jump_to_today(&mut self) {
        self.jump_to_date(self.today);
    }

    /// Recenters the window around `date`.
    pub(crate) fn jump_to_date(&mut self, date: Date) {
        self.start_date = date;
        if let Some(weeks) = self.weeks.as_mut() {
            if let Some(qty) = NonZeroUsize::new(weeks.len()) {
                *weeks = self.week_factory.around_date(date, qty);
            }
        }
    }

    /// Scrolls just far enough for `date` to be visible: a date one week
    /// past either edge slides the window by a single week, anything
    /// further recenters.  Dates already in view leave the window alone.
    pub(crate) fn scroll_into_view(&mut self, date: Date) {
        self.start_date = date;
        let (Some(first), Some(last)) = (self.first_date(), self.last_date()) else {
            return;
        };
        if date < first {
            if first.checked_sub(Duration::weeks(1)).is_some_and(|d| date >= d) {
                let _ = self.one_week_backwards();
            } else {
                self.jump_to_date(date);
            }
        } else if date > last {
            if last.checked_add(Duration::weeks(1)).is_some_and(|d| date <= d) {
                let _ = self.one_week_forwards();
            } else {
                self.jump_to_date(date);
            }
        }
    }

    pub(crate) fn one_week_forwards(&mut self) -> Result<(), OutOfTimeError> {
        let Some(weeks) = self.weeks.as_mut() else {
            return Ok(());
        };
        let next = weeks.back().and_then(|w| self.week_factory.week_after(w));
        if let Some(w) = next {
            weeks.pop_front();
            weeks.push_back(w);
            Ok(())
        } else {
            Err(OutOfTimeError)
        }
    }

    pub(crate) fn one_week_backwards(&mut self) -> Result<(), OutOfTimeError> {
        let Some(weeks) = self.weeks.as_mut() else {
            return Ok(());
        };
        let prev = weeks.front().and_then(|w| self.week_factory.week_before(w));
        if let Some(w) = prev {
            weeks.pop_back();
            weeks.push_front(w);
            Ok(())
        } else {
            Err(OutOfTimeError)
        }
    }

    pub(crate) fn one_page_forwards(&mut self) -> Result<(), OutOfTimeError> {
        let Some(weeks) = self.weeks.as_mut() else {
            return Ok(());
        };
        let Some((back, qty)) = weeks
            .back()
            .copied()
            .zip(NonZeroUsize::new(weeks.len()))
        else {
            return Ok(());
        };
        if let Some(mut page) = self.week_factory.weeks_after(back, qty) {
            if page.len() == qty.get() {
                *weeks = page;
            } else {
                // A short page at the end of time: keep enough of the
                // current window to stay full.
                while weeks.len() + page.len() > qty.get() {
                    weeks.pop_front();
                }
                weeks.append(&mut page);
            }
            Ok(())
        } else {
            Err(OutOfTimeError)
        }
    }

    pub(crate) fn one_page_backwards(&mut self) -> Result<(), OutOfTimeError> {
        let Some(weeks) = self.weeks.as_mut() else {
            return Ok(());
        };
        let Some((front, qty)) = weeks
            .front()
            .copied()
            .zip(NonZeroUsize::new(weeks.len()))
        else {
            return Ok(());
        };
        if let Some(mut page) = self.week_factory.weeks_before(front, qty) {
            if page.len() < qty.get() {
                weeks.truncate(qty.get() - page.len());
                page.append(weeks);
            }
            *weeks = page;
            Ok(())
        } else {
            Err(OutOfTimeError)
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
