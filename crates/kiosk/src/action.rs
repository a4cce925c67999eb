use serde::{Deserialize, Serialize};
use strum::Display;
use visitor_pass::{Field, TaskId, TaskResultKind, TickerId};

/// Messages flowing through the kiosk event loop.
///
/// `Display` prints the variant name only, so actions can be logged without
/// leaking what a visitor typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),
    FocusNext,
    FocusPrev,
    /// Raw value of a field after a keystroke.
    Edit(Field, String),
    Submit,
    CountdownTick(TickerId),
    TaskStarted(TaskId, String),
    TaskFinished(TaskId, TaskResultKind),
}
