use crate::bookings::{Schedule, ViewState};
use crate::theme::{slots, BASE_STYLE, EMPTY_LIST_STYLE, PANEL_TITLE_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// One-line bar of numbered slot cells for the reference date.  Occupied
/// slots are struck through; the selected slot is highlighted.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SlotBar<'a> {
    schedule: &'a Schedule,
    view: &'a ViewState,
}

impl<'a> SlotBar<'a> {
    pub(crate) fn new(schedule: &'a Schedule, view: &'a ViewState) -> SlotBar<'a> {
        SlotBar { schedule, view }
    }

    fn slot_line(&self) -> Line<'static> {
        let Some(reference) = self.view.reference_date() else {
            return Line::styled("Pick a date to choose a time.", EMPTY_LIST_STYLE);
        };
        let mut spans = Vec::new();
        for (i, slot) in self.schedule.slots().iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("   ", BASE_STYLE));
            }
            let style = if self.view.selected_time() == Some(slot.as_str()) {
                slots::PICKED_STYLE
            } else if self.schedule.is_booked(reference, slot) {
                slots::TAKEN_STYLE
            } else {
                slots::OPEN_STYLE
            };
            spans.push(Span::styled(format!("{}:{slot}", i + 1), style));
        }
        Line::from(spans)
    }
}

impl Widget for SlotBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.slot_line())
            .style(BASE_STYLE)
            .block(Block::bordered().title(Span::styled(" Time slots ", PANEL_TITLE_STYLE)))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::Booking;
    use ratatui::layout::Position;
    use time::macros::date;

    fn roster() -> Vec<String> {
        vec![
            "10:00".to_string(),
            "12:00".to_string(),
            "14:00".to_string(),
            "16:00".to_string(),
        ]
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell(Position::new(x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn every_slot_is_numbered() {
        let schedule = Schedule::new(vec![], roster());
        let view = ViewState::new(date!(2024 - 06 - 03));
        let area = Rect::new(0, 0, 50, 3);
        let mut buffer = Buffer::empty(area);
        SlotBar::new(&schedule, &view).render(area, &mut buffer);
        let line = row_text(&buffer, 1);
        for cell in ["1:10:00", "2:12:00", "3:14:00", "4:16:00"] {
            assert!(line.contains(cell), "missing {cell} in {line:?}");
        }
    }

    #[test]
    fn booked_slot_is_struck_through() {
        let schedule = Schedule::new(vec![Booking::new(date!(2024 - 06 - 03), "10:00")], roster());
        let view = ViewState::new(date!(2024 - 06 - 03));
        let bar = SlotBar::new(&schedule, &view);
        let line = bar.slot_line();
        assert_eq!(line.spans[0].style, slots::TAKEN_STYLE);
        assert_eq!(line.spans[2].style, slots::OPEN_STYLE);
    }

    #[test]
    fn selected_slot_is_highlighted() {
        let schedule = Schedule::new(vec![], roster());
        let mut view = ViewState::new(date!(2024 - 06 - 03));
        view.select_time("12:00");
        let bar = SlotBar::new(&schedule, &view);
        let line = bar.slot_line();
        assert_eq!(line.spans[2].style, slots::PICKED_STYLE);
    }

    #[test]
    fn missing_reference_date_prompts_for_one() {
        let schedule = Schedule::new(vec![], roster());
        let view = ViewState::default();
        let bar = SlotBar::new(&schedule, &view);
        assert_eq!(
            bar.slot_line().spans[0].content,
            "Pick a date to choose a time."
        );
    }
}
