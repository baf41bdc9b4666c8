use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    Resize,
}

/// Block until the next key press or resize.
pub fn next() -> Result<AppEvent> {
    loop {
        match event::read()? {
            // Release/repeat events are reported by some terminals; only presses act.
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(AppEvent::Key(key)),
            Event::Resize(..) => return Ok(AppEvent::Resize),
            _ => {}
        }
    }
}
