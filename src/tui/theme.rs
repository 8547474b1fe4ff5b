use ratatui::style::{Color, Modifier, Style};

/// Styles for the interactive view, fixed for the whole run.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub title: Style,
    pub item: Style,
    pub detail: Style,
    pub highlight: Style,
    pub status: Style,
    pub help: Style,
    pub filter: Style,
    pub dialog: Style,
    pub success: Style,
    pub error: Style,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        if !color {
            let plain = Style::default();
            return Self {
                title: plain.add_modifier(Modifier::BOLD),
                item: plain,
                detail: plain,
                highlight: plain.add_modifier(Modifier::REVERSED),
                status: plain,
                help: plain,
                filter: plain,
                dialog: plain,
                success: plain.add_modifier(Modifier::BOLD),
                error: plain.add_modifier(Modifier::BOLD),
            };
        }

        Self {
            title: Style::default()
                .fg(Color::Rgb(0xFA, 0xFA, 0xFA))
                .bg(Color::Rgb(0x7D, 0x56, 0xF4))
                .add_modifier(Modifier::BOLD),
            item: Style::default(),
            detail: Style::default().fg(Color::DarkGray),
            highlight: Style::default()
                .fg(Color::Rgb(0xEE, 0x6F, 0xF8))
                .add_modifier(Modifier::BOLD),
            status: Style::default().fg(Color::Gray),
            help: Style::default().fg(Color::DarkGray),
            filter: Style::default().fg(Color::Yellow),
            dialog: Style::default().fg(Color::Rgb(0xEE, 0x6F, 0xF8)),
            success: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}
