use color_eyre::Result;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use tracing::warn;
use visitor_pass::{FormController, QrError, QrPass};

use super::Component;
use crate::style::{Role, Theme};

pub const NOTICE: [&str; 2] = [
    "PLEASE TAKE A PICTURE AND USE IT TO",
    "ENTER AND EXIT THE CAMPUS. THANK YOU!",
];

/// Right-hand panel: the QR pass while it is valid, a placeholder otherwise.
#[derive(Default)]
pub struct PassPanel {
    /// Last encoded payload, so the code is built once per registration.
    cached: Option<(String, Result<QrPass, QrError>)>,
    theme: Theme,
}

impl PassPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn encoded(&mut self, payload: String) -> &Result<QrPass, QrError> {
        if matches!(&self.cached, Some((cached, _)) if *cached != payload) {
            self.cached = None;
        }
        let (_, encoded) = self.cached.get_or_insert_with(|| {
            let encoded = QrPass::encode(&payload);
            if let Err(err) = &encoded {
                warn!(%err, "unable to encode visitor pass");
            }
            (payload, encoded)
        });
        encoded
    }

    /// Text lines shown under the code.
    pub fn caption(remaining: u32) -> Vec<String> {
        let mut lines = vec![format!("This code will expire in {remaining} seconds.")];
        lines.push(String::new());
        lines.extend(NOTICE.iter().map(|s| s.to_string()));
        lines
    }
}

impl Component for PassPanel {
    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, form: &FormController) -> Result<()> {
        let theme = self.theme;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.style(Role::Border))
            .title(Span::styled("Campus Pass", theme.style(Role::Title)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(payload) = form.pass_payload() else {
            self.cached = None;
            frame.render_widget(
                Paragraph::new("Your campus pass will appear here after registering.")
                    .style(theme.style(Role::SubtleText))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return Ok(());
        };

        let code_lines: Vec<Line> = match self.encoded(payload) {
            Ok(pass) => pass
                .to_terminal_lines()
                .into_iter()
                .map(|l| Line::from(Span::styled(l, theme.style(Role::Code))))
                .collect(),
            Err(_) => vec![Line::from(Span::styled(
                "Unable to render pass.",
                theme.style(Role::Danger),
            ))],
        };

        let caption: Vec<Line> = Self::caption(form.expiry().remaining())
            .into_iter()
            .map(|l| Line::from(Span::styled(l, theme.style(Role::Text))))
            .collect();

        let [code_area, caption_area] = Layout::vertical([
            Constraint::Length(code_lines.len() as u16),
            Constraint::Length(caption.len() as u16),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(code_lines).alignment(Alignment::Center),
            code_area,
        );
        frame.render_widget(
            Paragraph::new(caption).alignment(Alignment::Center),
            caption_area,
        );
        Ok(())
    }
}
