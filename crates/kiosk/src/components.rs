use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use visitor_pass::FormController;

use crate::{
    action::Action,
    tui::{Event, EventResponse},
};

pub mod header;
pub mod pass;
pub mod registration;

/// A visual and interactive piece of the kiosk screen.
///
/// Components read the form controller but never mutate it; they turn key
/// presses into [`Action`]s and the app applies those to the controller.
pub trait Component {
    fn init(&mut self, _form: &FormController) -> Result<()> {
        Ok(())
    }

    fn handle_events(
        &mut self,
        event: &Event,
        form: &FormController,
    ) -> Result<Option<EventResponse<Action>>> {
        match event {
            Event::Key(key) => self.handle_key_events(*key, form),
            _ => Ok(None),
        }
    }

    fn handle_key_events(
        &mut self,
        _key: KeyEvent,
        _form: &FormController,
    ) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    /// Called after the app has applied `action` to the controller.
    fn update(&mut self, _action: &Action, _form: &FormController) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, form: &FormController) -> Result<()>;
}
