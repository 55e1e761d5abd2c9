use std::path::PathBuf;

use crate::ui_state::Tab;

/// User actions that can be triggered by commands or UI events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show one of the two views
    SwitchTab(Tab),
    /// Toggle between the two views
    NextTab,
    /// Files chosen through the file input (typed path + Enter)
    Browse(Vec<PathBuf>),
    /// Files dropped onto the terminal
    Drop(Vec<PathBuf>),
    /// Return the analyze view to Idle
    Reset,
    /// Copy detected text to the clipboard
    CopyDetectedText,
    /// Submit the current vibe query
    Recommend,
    /// Open the n-th meme (0-based)
    OpenMeme(usize),
    /// Probe the server
    CheckHealth,
    /// Show help message
    Help,
    /// Quit application
    Quit,
}
