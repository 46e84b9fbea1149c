use super::DateStyler;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use std::collections::VecDeque;
use std::iter::successors;
use std::num::NonZeroUsize;
use time::{Date, Month, Weekday, Weekday::*};

const DAYS_IN_WEEK: usize = 7;

pub(super) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct StyledDate {
    pub(crate) date: Date,
    pub(crate) style: Style,
}

impl StyledDate {
    pub(super) fn year(&self) -> i32 {
        self.date.year()
    }

    pub(super) fn month(&self) -> Month {
        self.date.month()
    }

    pub(super) fn day(&self) -> u8 {
        self.date.day()
    }

    pub(super) fn in_first_week_of_month(&self) -> bool {
        self.day() <= 7
    }

    pub(super) fn is_last_day_of_month(&self) -> bool {
        match self.date.next_day() {
            Some(tomorrow) => self.date.month() != tomorrow.month(),
            None => true,
        }
    }

    // The reference date is bracketed; today is underlined on top of
    // whatever occupancy style the day carries.
    pub(super) fn show(&self, is_reference: bool, is_today: bool) -> Span<'static> {
        let s = if is_reference {
            format!("[{:2}]", self.day())
        } else {
            format!(" {:2} ", self.day())
        };
        let style = if is_today {
            self.style.add_modifier(Modifier::UNDERLINED)
        } else {
            self.style
        };
        Span::styled(s, style)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
// Invariant: at least one element of the array is Some
pub(super) struct Week([Option<StyledDate>; DAYS_IN_WEEK]);

impl Week {
    fn new(date: StyledDate) -> Self {
        let mut this = Week([None; DAYS_IN_WEEK]);
        this.set(date);
        this
    }

    fn set(&mut self, date: StyledDate) {
        let i = usize::from(date.date.weekday().index0());
        if let Some(slot) = self.0.get_mut(i) {
            *slot = Some(date);
        }
    }

    pub(super) fn get(&self, wd: Weekday) -> Option<StyledDate> {
        self.0.get(usize::from(wd.index0())).copied().flatten()
    }

    pub(super) fn enumerate(&self) -> EnumerateWeek<'_> {
        EnumerateWeek::new(self)
    }

    pub(super) fn first_date(&self) -> Option<Date> {
        self.0.iter().flatten().map(|sd| sd.date).next()
    }

    pub(super) fn last_date(&self) -> Option<Date> {
        self.0.iter().flatten().map(|sd| sd.date).last()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct EnumerateWeek<'a> {
    week: &'a Week,
    next_weekday: Option<Weekday>,
}

impl<'a> EnumerateWeek<'a> {
    fn new(week: &'a Week) -> Self {
        EnumerateWeek {
            week,
            next_weekday: Some(Sunday),
        }
    }
}

impl Iterator for EnumerateWeek<'_> {
    type Item = (Weekday, StyledDate);

    fn next(&mut self) -> Option<(Weekday, StyledDate)> {
        loop {
            let wd = self.next_weekday?;
            self.next_weekday = match wd.next() {
                Sunday => None,
                wd2 => Some(wd2),
            };
            if let Some(date) = self.week.get(wd) {
                return Some((wd, date));
            }
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) struct WeekFactory<S>(S);

impl<S: DateStyler> WeekFactory<S> {
    pub(super) fn new(styler: S) -> Self {
        WeekFactory(styler)
    }

    pub(super) fn around_date(&self, date: Date, week_qty: NonZeroUsize) -> VecDeque<Week> {
        let mut weeks = VecDeque::with_capacity(week_qty.get() + 1);
        let start_week = self.make(date);
        weeks.push_front(start_week);
        for w in self
            .iter_weeks_before(start_week)
            .take((week_qty.get() - 1) / 2)
        {
            weeks.push_front(w);
        }
        weeks.extend(
            self.iter_weeks_after(start_week)
                .take(week_qty.get() - weeks.len()),
        );
        if weeks.len() < week_qty.get() {
            // Near the end of time the "after" weeks came up short; fill
            // towards the past instead.
            let have = weeks.len();
            for w in self
                .iter_weeks_before(start_week)
                .skip((week_qty.get() - 1) / 2)
                .take(week_qty.get() - have)
            {
                weeks.push_front(w);
            }
        }
        weeks
    }

    fn style_date(&self, date: Date) -> StyledDate {
        StyledDate {
            date,
            style: self.0.date_style(date),
        }
    }

    // Returns the Week containing the given date, which can be at any day
    // of the week
    fn make(&self, date: Date) -> Week {
        let i = usize::from(date.weekday().index0());
        let mut week = Week::new(self.style_date(date));
        for d in iter_days_before(date).take(i) {
            week.set(self.style_date(d));
        }
        for d in iter_days_after(date).take(DAYS_IN_WEEK - i - 1) {
            week.set(self.style_date(d));
        }
        week
    }

    pub(super) fn week_before(&self, week: &Week) -> Option<Week> {
        week.first_date()
            .and_then(Date::previous_day)
            .map(|d| self.make(d))
    }

    pub(super) fn week_after(&self, week: &Week) -> Option<Week> {
        week.last_date()
            .and_then(Date::next_day)
            .map(|d| self.make(d))
    }

    fn iter_weeks_before(&self, week: Week) -> impl Iterator<Item = Week> + '_ {
        successors(Some(week), |w| self.week_before(w)).skip(1)
    }

    fn iter_weeks_after(&self, week: Week) -> impl Iterator<Item = Week> + '_ {
        successors(Some(week), |w| self.week_after(w)).skip(1)
    }

    // Returns `None` if there are no weeks before `week`.  If there are
    // weeks before `week`, but not `qty` of them, only as many weeks as
    // possible are returned.  The result is in chronological order.
    pub(super) fn weeks_before(&self, week: Week, qty: NonZeroUsize) -> Option<VecDeque<Week>> {
        let mut iter = self.iter_weeks_before(week);
        let first_week = iter.next()?;
        let mut weeks = VecDeque::with_capacity(qty.get() + 1);
        weeks.push_front(first_week);
        for w in iter.take(qty.get() - 1) {
            weeks.push_front(w);
        }
        Some(weeks)
    }

    // Likewise for the weeks after `week`.
    pub(super) fn weeks_after(&self, week: Week, qty: NonZeroUsize) -> Option<VecDeque<Week>> {
        let mut iter = self.iter_weeks_after(week);
        let first_week = iter.next()?;
        let mut weeks = VecDeque::with_capacity(qty.get() + 1);
        weeks.push_back(first_week);
        weeks.extend(iter.take(qty.get() - 1));
        Some(weeks)
    }
}

fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}

fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    struct NullStyler;

    impl DateStyler for NullStyler {
        fn date_style(&self, _date: Date) -> Style {
            Style::new()
        }
    }

    #[test]
    fn week_around_midweek_date() {
        let factory = WeekFactory::new(NullStyler);
        let week = factory.make(date!(2024 - 06 - 05));
        let mut iter = week.enumerate().map(|(wd, sd)| (wd, sd.date));
        assert_eq!(iter.next(), Some((Sunday, date!(2024 - 06 - 02))));
        assert_eq!(iter.next(), Some((Monday, date!(2024 - 06 - 03))));
        assert_eq!(iter.next(), Some((Tuesday, date!(2024 - 06 - 04))));
        assert_eq!(iter.next(), Some((Wednesday, date!(2024 - 06 - 05))));
        assert_eq!(iter.next(), Some((Thursday, date!(2024 - 06 - 06))));
        assert_eq!(iter.next(), Some((Friday, date!(2024 - 06 - 07))));
        assert_eq!(iter.next(), Some((Saturday, date!(2024 - 06 - 08))));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn week_around_sunday_starts_there() {
        let factory = WeekFactory::new(NullStyler);
        let week = factory.make(date!(2024 - 06 - 02));
        assert_eq!(week.first_date(), Some(date!(2024 - 06 - 02)));
        assert_eq!(week.last_date(), Some(date!(2024 - 06 - 08)));
    }

    #[test]
    fn week_around_saturday_ends_there() {
        let factory = WeekFactory::new(NullStyler);
        let week = factory.make(date!(2024 - 06 - 08));
        assert_eq!(week.first_date(), Some(date!(2024 - 06 - 02)));
        assert_eq!(week.last_date(), Some(date!(2024 - 06 - 08)));
    }

    #[test]
    fn around_date_spans_the_requested_quantity() {
        let factory = WeekFactory::new(NullStyler);
        let weeks = factory.around_date(date!(2024 - 06 - 05), NonZeroUsize::MIN.saturating_add(4));
        assert_eq!(weeks.len(), 5);
        // Two weeks before and two after the week containing the date
        assert_eq!(
            weeks.front().and_then(Week::first_date),
            Some(date!(2024 - 05 - 19))
        );
        assert_eq!(
            weeks.back().and_then(Week::last_date),
            Some(date!(2024 - 06 - 22))
        );
    }

    #[test]
    fn adjacent_weeks_chain() {
        let factory = WeekFactory::new(NullStyler);
        let week = factory.make(date!(2024 - 06 - 05));
        let before = factory.week_before(&week);
        let after = factory.week_after(&week);
        assert_eq!(
            before.and_then(|w| w.last_date()),
            Some(date!(2024 - 06 - 01))
        );
        assert_eq!(
            after.and_then(|w| w.first_date()),
            Some(date!(2024 - 06 - 09))
        );
    }

    #[test]
    fn reference_date_renders_bracketed() {
        let sd = StyledDate {
            date: date!(2024 - 06 - 05),
            style: Style::new(),
        };
        assert_eq!(sd.show(true, false).content, "[ 5]");
        assert_eq!(sd.show(false, false).content, "  5 ");
    }
}
