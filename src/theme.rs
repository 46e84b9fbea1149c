use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

/// Day with every slot taken
pub(crate) const FULL_DAY_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);

/// Day with at least one booking but free slots left
pub(crate) const BUSY_DAY_STYLE: Style = Style::new().fg(Color::LightYellow).bg(Color::Black);

pub(crate) const PANEL_TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const EMPTY_LIST_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const ENTRY_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

pub(crate) mod slots {
    use super::*;

    pub(crate) const OPEN_STYLE: Style = BASE_STYLE;

    pub(crate) const TAKEN_STYLE: Style = BASE_STYLE
        .fg(Color::LightRed)
        .add_modifier(Modifier::CROSSED_OUT);

    pub(crate) const PICKED_STYLE: Style = BASE_STYLE
        .fg(Color::LightGreen)
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::REVERSED);
}

pub(crate) mod datepick {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
