pub mod app;
pub mod controller;
mod event;
pub mod form;
pub mod keymap;
pub mod theme;
mod ui;
pub mod view;

use anyhow::Result;

use crate::store::TaskStore;

use theme::Theme;

/// Run the interactive list view until the user quits.
pub fn run(store: TaskStore, theme: Theme) -> Result<()> {
    let mut terminal = ratatui::init();
    let mut app = app::App::new(store, theme);
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
