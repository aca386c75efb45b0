use ratatui::style::{Color, Modifier, Style};

pub struct LyricStyles {
    pub before: Style,
    pub current: Style,
    pub after: Style,
    /// Lines the layout has faded or blurred heavily.
    pub faded: Style,
    pub status: Style,
    pub scrollbar: Style,
}

impl Default for LyricStyles {
    fn default() -> Self {
        Self {
            before: Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            current: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            after: Style::default(),
            faded: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            status: Style::default().add_modifier(Modifier::DIM),
            scrollbar: Style::default().fg(Color::DarkGray),
        }
    }
}
