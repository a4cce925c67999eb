//! Semantic colours for the kiosk screens.

use ratatui::style::{Color, Modifier, Style};

/// Roles widgets ask for instead of concrete colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Text,
    SubtleText,
    Title,
    Border,
    FocusBorder,
    Danger,
    Info,
    /// Light-on-dark QR modules.
    Code,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Theme;

impl Theme {
    pub fn style(&self, role: Role) -> Style {
        match role {
            Role::Text => Style::default().fg(Color::White),
            Role::SubtleText => Style::default().fg(Color::DarkGray),
            Role::Title => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            Role::Border => Style::default().fg(Color::Gray),
            Role::FocusBorder => Style::default().fg(Color::Cyan),
            Role::Danger => Style::default().fg(Color::Red),
            Role::Info => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::ITALIC),
            Role::Code => Style::default().fg(Color::White).bg(Color::Black),
        }
    }
}
