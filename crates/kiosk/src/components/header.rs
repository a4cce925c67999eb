use color_eyre::Result;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use visitor_pass::FormController;

use super::Component;
use crate::style::{Role, Theme};

/// Title and institution banner.
pub struct Header {
    title: String,
    subtitle: String,
    theme: Theme,
}

impl Header {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            theme: Theme,
        }
    }
}

impl Component for Header {
    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, _form: &FormController) -> Result<()> {
        let lines = vec![
            Line::from(Span::styled(
                self.title.as_str(),
                self.theme.style(Role::Title),
            )),
            Line::from(Span::styled(
                self.subtitle.as_str(),
                self.theme.style(Role::SubtleText),
            )),
        ];
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(self.theme.style(Role::Border));
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        Ok(())
    }
}
