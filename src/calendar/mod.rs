mod util;
mod widget;
mod window;
pub(crate) use self::widget::Calendar;
pub(crate) use self::window::WeekWindow;
use ratatui::style::Style;
use time::Date;

/// Maps each day to the style its calendar cell is drawn with; the booking
/// schedule implements this to mark occupied days.
pub(crate) trait DateStyler {
    fn date_style(&self, date: Date) -> Style;
}
