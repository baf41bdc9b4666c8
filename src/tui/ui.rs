use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::app::App;
use super::form;
use super::view::{self, Emphasis};

pub fn draw(frame: &mut Frame, app: &App) {
    let overlay_height = if app.controller.state().overlay.is_some() {
        3
    } else {
        0
    };

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(overlay_height),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, outer[0]);
    draw_tasks(frame, app, outer[1]);
    if overlay_height > 0 {
        draw_overlay(frame, app, outer[2]);
    }
    draw_footer(frame, app, outer[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = Line::from(vec![
        Span::styled(
            " todo ",
            theme.key_hint_style().add_modifier(Modifier::REVERSED),
        ),
        Span::styled(
            format!(
                "  {} pending \u{b7} {} completed",
                app.pending_count(),
                app.completed_count()
            ),
            theme.muted_style(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_tasks(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .title(" Tasks ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());

    if app.tasks.is_empty() {
        let empty = Paragraph::new(Line::from(vec![
            Span::styled(" No tasks yet. Press ", theme.muted_style()),
            Span::styled("a", theme.key_hint_style()),
            Span::styled(" to add one.", theme.muted_style()),
        ]))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let selected = app.controller.state().selected;
    let rows: Vec<Row> = view::render(&app.tasks, selected, Local::now())
        .into_iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.checkbox).style(theme.emphasis(r.checkbox_emphasis)),
                Cell::from(r.title).style(theme.emphasis(r.title_emphasis)),
                Cell::from(r.priority_label).style(theme.emphasis(r.priority_emphasis)),
                Cell::from(r.status_label).style(theme.emphasis(r.status_emphasis)),
                Cell::from(r.age).style(theme.emphasis(Emphasis::Muted)),
            ])
        })
        .collect();

    let header = Row::new(["", "Title", "Priority", "Status", "Created"])
        .style(theme.header_style());

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block)
    .column_spacing(2)
    .row_highlight_style(theme.selected_row_style())
    .highlight_symbol("\u{25b8} ");

    let mut state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let Some(overlay) = &app.controller.state().overlay else {
        return;
    };
    let theme = &app.theme;
    let block = Block::default()
        .title(format!(" {}", overlay.prompt()))
        .borders(Borders::ALL)
        .border_style(theme.key_hint_style());
    let input = Paragraph::new(form::format_with_cursor(&overlay.buffer, overlay.cursor))
        .style(theme.emphasis(Emphasis::Plain))
        .block(block);
    frame.render_widget(input, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    if let Some(toast) = &app.toast {
        let line = Line::from(Span::styled(
            format!(" {}", toast.message),
            theme.toast_style(toast.style),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    if app.controller.state().overlay.is_some() {
        form::render_hints(
            frame,
            area,
            &[("enter", "save"), ("esc", "cancel")],
            theme.key_hint_style(),
            theme.muted_style(),
        );
        return;
    }

    let hints = app.controller.keymap().hints();
    form::render_hints(
        frame,
        area,
        &hints,
        theme.key_hint_style(),
        theme.muted_style(),
    );
}
