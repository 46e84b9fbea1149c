use crate::bookings::{format_ymd, Schedule, ViewState};
use crate::theme::{BASE_STYLE, EMPTY_LIST_STYLE, ENTRY_STYLE, PANEL_TITLE_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Widget},
};

/// Bordered pane listing the bookings inside the active view window.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BookingList<'a> {
    schedule: &'a Schedule,
    view: &'a ViewState,
}

impl<'a> BookingList<'a> {
    pub(crate) fn new(schedule: &'a Schedule, view: &'a ViewState) -> BookingList<'a> {
        BookingList { schedule, view }
    }
}

impl Widget for BookingList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = self.schedule.visible_bookings(self.view);
        let text = if visible.is_empty() {
            Text::from(Line::styled(
                "No bookings for this period.",
                EMPTY_LIST_STYLE,
            ))
        } else {
            visible
                .into_iter()
                .map(|b| {
                    Line::styled(format!("{}  {}", format_ymd(b.date), b.time), ENTRY_STYLE)
                })
                .collect()
        };
        let title = format!(" Bookings ({} view) ", self.view.granularity());
        Paragraph::new(text)
            .style(BASE_STYLE)
            .block(Block::bordered().title(Span::styled(title, PANEL_TITLE_STYLE)))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::{Booking, Granularity};
    use ratatui::layout::Position;
    use time::macros::date;

    fn buffer_text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                if let Some(cell) = buf.cell(Position::new(x, y)) {
                    out.push_str(cell.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    fn roster() -> Vec<String> {
        vec!["10:00".to_string(), "12:00".to_string()]
    }

    #[test]
    fn entries_show_date_and_slot() {
        let schedule = Schedule::new(
            vec![
                Booking::new(date!(2024 - 06 - 03), "10:00"),
                Booking::new(date!(2024 - 06 - 10), "12:00"),
            ],
            roster(),
        );
        let mut view = ViewState::new(date!(2024 - 06 - 03));
        view.set_granularity(Granularity::Monthly);
        let area = Rect::new(0, 0, 40, 6);
        let mut buffer = Buffer::empty(area);
        BookingList::new(&schedule, &view).render(area, &mut buffer);
        let text = buffer_text(&buffer);
        assert!(text.contains("Bookings (monthly view)"));
        assert!(text.contains("2024-06-03  10:00"));
        assert!(text.contains("2024-06-10  12:00"));
    }

    #[test]
    fn empty_window_shows_placeholder() {
        let schedule = Schedule::new(vec![], roster());
        let view = ViewState::new(date!(2024 - 06 - 03));
        let area = Rect::new(0, 0, 40, 4);
        let mut buffer = Buffer::empty(area);
        BookingList::new(&schedule, &view).render(area, &mut buffer);
        assert!(buffer_text(&buffer).contains("No bookings for this period."));
    }
}
