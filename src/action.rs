use serde::{Deserialize, Serialize};
use strum::Display;

/// Actions that can be triggered by user input or internal events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),
    Help,

    // History navigation
    CycleFilter,
    PageForward,
    PageBackward,
    OpenDetail,
    CloseDetail,
    Retry,
    Refresh,

    // Selection
    ScrollUp,
    ScrollDown,
}
