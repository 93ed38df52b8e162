mod filter;
mod move_mode;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

#[allow(unused_imports)]
use filter::*;
#[allow(unused_imports)]
use move_mode::*;
#[allow(unused_imports)]
use navigate::*;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay swallows the next key
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Move => handle_move(app, key),
        Mode::Filter => handle_filter(app, key),
    }
}
