use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_input::{Input, InputRequest};
use visitor_pass::{Field, FormController};

use super::Component;
use crate::{
    action::Action,
    style::{Role, Theme},
    tui::EventResponse,
};

/// The five labelled inputs plus the error / status lines.
///
/// Keystrokes go to the focused [`Input`]; the resulting raw value is sent
/// as [`Action::Edit`] and the input is re-synced from the controller's
/// draft afterwards, which is how rejected keystrokes disappear and
/// accepted ones show up normalised.
pub struct Registration {
    inputs: [Input; 5],
    focus: usize,
    theme: Theme,
}

impl Default for Registration {
    fn default() -> Self {
        Self::new()
    }
}

impl Registration {
    pub fn new() -> Self {
        Self {
            inputs: Default::default(),
            focus: 0,
            theme: Theme,
        }
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn value(&self, field: Field) -> &str {
        self.inputs[index(field)].value()
    }

    /// Take the draft value for `field` into its input, keeping the cursor
    /// where it was as far as the new value allows.
    fn sync(&mut self, field: Field, form: &FormController) {
        let value = form.draft().get(field);
        let input = &mut self.inputs[index(field)];
        if input.value() != value {
            let cursor = input.cursor().min(value.chars().count());
            *input = Input::new(value.to_owned()).with_cursor(cursor);
        }
    }

    fn sync_all(&mut self, form: &FormController) {
        for field in Field::ALL {
            self.sync(field, form);
        }
    }

    fn input_block(&self, field: Field) -> Block<'static> {
        let focused = field == self.focused();
        let border = if focused {
            self.theme.style(Role::FocusBorder)
        } else {
            self.theme.style(Role::Border)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Span::styled(field.label(), border))
    }
}

/// Position in form order.
fn index(field: Field) -> usize {
    field as usize
}

/// Editing keys understood by the inputs.
fn input_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let word = ctrl || key.modifiers.contains(KeyModifiers::ALT);
    let request = match key.code {
        KeyCode::Char('u') if ctrl => InputRequest::DeleteLine,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => InputRequest::InsertChar(c),
        KeyCode::Backspace if word => InputRequest::DeletePrevWord,
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left if word => InputRequest::GoToPrevWord,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right if word => InputRequest::GoToNextWord,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return None,
    };
    Some(request)
}

impl Component for Registration {
    fn init(&mut self, form: &FormController) -> Result<()> {
        self.sync_all(form);
        Ok(())
    }

    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        _form: &FormController,
    ) -> Result<Option<EventResponse<Action>>> {
        let action = match key.code {
            // Esc, Ctrl-C and Ctrl-Z fall through to the app
            KeyCode::Esc => return Ok(None),
            KeyCode::Tab | KeyCode::Down => Action::FocusNext,
            KeyCode::BackTab | KeyCode::Up => Action::FocusPrev,
            KeyCode::Enter => Action::Submit,
            _ => {
                let Some(request) = input_request(key) else {
                    return Ok(None);
                };
                let field = self.focused();
                let input = &mut self.inputs[self.focus];
                let before = input.value().to_owned();
                let _ = input.handle(request);
                if input.value() == before {
                    Action::Render
                } else {
                    Action::Edit(field, input.value().to_owned())
                }
            }
        };
        Ok(Some(EventResponse::Stop(action)))
    }

    fn update(&mut self, action: &Action, form: &FormController) -> Result<Option<Action>> {
        match action {
            Action::FocusNext => self.focus = (self.focus + 1) % Field::ALL.len(),
            Action::FocusPrev => {
                self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len()
            }
            Action::Edit(field, _) => self.sync(*field, form),
            // a successful registration clears the draft
            Action::TaskFinished(..) => self.sync_all(form),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, form: &FormController) -> Result<()> {
        let mut constraints = vec![Constraint::Length(3); Field::ALL.len()];
        constraints.extend([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ]);
        let rows = Layout::vertical(constraints).split(area);

        for (i, field) in Field::ALL.into_iter().enumerate() {
            let block = self.input_block(field);
            let inner = block.inner(rows[i]);
            frame.render_widget(block, rows[i]);

            let input = &self.inputs[i];
            let width = inner.width.max(1) as usize;
            let scroll = input.visual_scroll(width.saturating_sub(1));
            frame.render_widget(
                Paragraph::new(input.value())
                    .style(self.theme.style(Role::Text))
                    .scroll((0, scroll as u16)),
                inner,
            );

            if i == self.focus && inner.width > 0 && inner.height > 0 {
                let col = input.visual_cursor().saturating_sub(scroll) as u16;
                frame.set_cursor_position((
                    inner.x + col.min(inner.width.saturating_sub(1)),
                    inner.y,
                ));
            }
        }

        let n = Field::ALL.len();
        frame.render_widget(
            Paragraph::new(Span::styled(
                form.error_message(),
                self.theme.style(Role::Danger),
            )),
            rows[n],
        );

        if form.is_submitting() {
            frame.render_widget(
                Paragraph::new(Span::styled("Submitting…", self.theme.style(Role::Info))),
                rows[n + 1],
            );
        }

        let hints = Line::from(vec![
            Span::styled("Enter", self.theme.style(Role::Text)),
            Span::raw(": Submit   "),
            Span::styled("Tab/↑↓", self.theme.style(Role::Text)),
            Span::raw(": Next field   "),
            Span::styled("Esc", self.theme.style(Role::Text)),
            Span::raw(": Quit"),
        ])
        .style(self.theme.style(Role::SubtleText));
        frame.render_widget(Paragraph::new(hints), rows[n + 3]);
        Ok(())
    }
}
