use crate::theme::{
    datepick::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};

const OUTER_WIDTH: u16 = 17;
const OUTER_HEIGHT: u16 = 8;

/// Number of digits in a full YYYYMMDD entry; entering them all moves the
/// cursor onto ENTER.
const DIGIT_QTY: usize = 8;

const YEAR_DIGITS: usize = 4;
const MONTH_DIGITS: usize = 2;

/// Popup for typing a date to focus, digit by digit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DatePick;

impl StatefulWidget for DatePick {
    type State = DatePickState;

    /*
     * .................
     * .┌─ Go To ─────┐.
     * .│             │.
     * .│ -YYYY-MM-DD │.
     * .│             │.
     * .│   [ENTER]   │.
     * .└─────────────┘.
     * .................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Go To ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

/// Digits typed so far, in `YYYYMMDD` order, plus the sign toggle and the
/// cursor position.  `pos == DIGIT_QTY` means the cursor sits on ENTER.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct DatePickState {
    negative: bool,
    digits: [Option<u8>; DIGIT_QTY],
    pos: usize,
}

impl DatePickState {
    pub(crate) fn new() -> DatePickState {
        DatePickState::default()
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Style a span and convert it to a line rather than creating a
            // styled line directly so that only the "[ENTER]" text and not any
            // of its centering padding will be underlined:
            Line::from(Span::styled(
                "[ENTER]",
                if self.pos == DIGIT_QTY {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = Vec::new();
        spans.push(Span::styled(
            if self.negative { "-" } else { " " },
            BASE_STYLE,
        ));
        for (i, dg) in self.digits.iter().enumerate() {
            if i == YEAR_DIGITS || i == YEAR_DIGITS + MONTH_DIGITS {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            let fallback = if i < YEAR_DIGITS {
                "Y"
            } else if i < YEAR_DIGITS + MONTH_DIGITS {
                "M"
            } else {
                "D"
            };
            spans.push(match dg {
                Some(d) => Span::styled(format!("{d}"), BASE_STYLE),
                None => Span::styled(fallback, UNFILLED_CELL_STYLE),
            });
        }
        Line::from_iter(spans)
    }

    pub(crate) fn handle_input(&mut self, input: DatePickInput) -> DatePickOutput {
        match (input, self.pos) {
            (DatePickInput::Negative, 0) => {
                self.negative = !self.negative;
                DatePickOutput::Ok
            }
            (DatePickInput::Positive, 0) => {
                self.negative = false;
                DatePickOutput::Ok
            }
            (DatePickInput::Digit(d), 0..DIGIT_QTY) => {
                self.digits[self.pos] = Some(d);
                self.pos += 1;
                DatePickOutput::Ok
            }
            (DatePickInput::Backspace, 1..) => {
                self.pos -= 1;
                self.digits[self.pos] = None;
                DatePickOutput::Ok
            }
            (DatePickInput::Enter, DIGIT_QTY) => self.assemble(),
            _ => DatePickOutput::Invalid,
        }
    }

    fn assemble(self) -> DatePickOutput {
        if self.digits.iter().any(Option::is_none) {
            return DatePickOutput::Invalid;
        }
        let number = |digits: &[Option<u8>]| {
            digits
                .iter()
                .flatten()
                .fold(0i32, |acc, &d| acc * 10 + i32::from(d))
        };
        let mut year = number(&self.digits[..YEAR_DIGITS]);
        if self.negative {
            year = -year;
        }
        let month = number(&self.digits[YEAR_DIGITS..YEAR_DIGITS + MONTH_DIGITS]);
        let day = number(&self.digits[YEAR_DIGITS + MONTH_DIGITS..]);
        let (Ok(month), Ok(day)) = (u8::try_from(month), u8::try_from(day)) else {
            return DatePickOutput::Invalid;
        };
        let Ok(month) = time::Month::try_from(month) else {
            return DatePickOutput::Invalid;
        };
        match time::Date::from_calendar_date(year, month, day) {
            Ok(date) => DatePickOutput::Jump(date),
            Err(_) => DatePickOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DatePickInput {
    Negative,
    Positive,
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DatePickOutput {
    Ok,
    Invalid,
    Jump(time::Date),
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn type_digits(state: &mut DatePickState, digits: &[u8]) {
        for &d in digits {
            assert_eq!(
                state.handle_input(DatePickInput::Digit(d)),
                DatePickOutput::Ok
            );
        }
    }

    #[test]
    fn full_entry_jumps_to_the_date() {
        let mut state = DatePickState::new();
        type_digits(&mut state, &[2, 0, 2, 4, 0, 6, 0, 3]);
        assert_eq!(
            state.handle_input(DatePickInput::Enter),
            DatePickOutput::Jump(date!(2024 - 06 - 03))
        );
    }

    #[test]
    fn enter_before_completion_is_invalid() {
        let mut state = DatePickState::new();
        type_digits(&mut state, &[2, 0, 2, 4]);
        assert_eq!(
            state.handle_input(DatePickInput::Enter),
            DatePickOutput::Invalid
        );
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        let mut state = DatePickState::new();
        type_digits(&mut state, &[2, 0, 2, 4, 1, 3, 0, 1]);
        assert_eq!(
            state.handle_input(DatePickInput::Enter),
            DatePickOutput::Invalid
        );
    }

    #[test]
    fn day_digits_are_respected() {
        // The day comes from its own digits, not from the month's
        let mut state = DatePickState::new();
        type_digits(&mut state, &[2, 0, 2, 4, 0, 2, 2, 9]);
        assert_eq!(
            state.handle_input(DatePickInput::Enter),
            DatePickOutput::Jump(date!(2024 - 02 - 29))
        );
    }

    #[test]
    fn backspace_reopens_the_cell() {
        let mut state = DatePickState::new();
        type_digits(&mut state, &[2, 0, 2, 4, 0, 6, 0, 3]);
        assert_eq!(
            state.handle_input(DatePickInput::Backspace),
            DatePickOutput::Ok
        );
        type_digits(&mut state, &[4]);
        assert_eq!(
            state.handle_input(DatePickInput::Enter),
            DatePickOutput::Jump(date!(2024 - 06 - 04))
        );
    }

    #[test]
    fn sign_toggle_only_before_typing() {
        let mut state = DatePickState::new();
        assert_eq!(
            state.handle_input(DatePickInput::Negative),
            DatePickOutput::Ok
        );
        type_digits(&mut state, &[2]);
        assert_eq!(
            state.handle_input(DatePickInput::Negative),
            DatePickOutput::Invalid
        );
    }
}
