use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

// ── Text editing helpers ──────────────────────────────────────────────

/// Find the byte offset of the previous word boundary (for word-left navigation).
pub fn word_boundary_left(s: &str, pos: usize) -> usize {
    let before = &s[..pos];
    // Skip trailing whitespace
    let trimmed = before.trim_end();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
        Some((idx, ch)) => idx + ch.len_utf8(),
        None => 0,
    }
}

/// Find the byte offset of the next word boundary (for word-right navigation).
pub fn word_boundary_right(s: &str, pos: usize) -> usize {
    let after = &s[pos..];
    match after.find(char::is_whitespace) {
        None => s.len(),
        Some(offset) => {
            let from_ws = &after[offset..];
            match from_ws.find(|c: char| !c.is_whitespace()) {
                None => s.len(),
                Some(word_start) => pos + offset + word_start,
            }
        }
    }
}

fn prev_char_len(buf: &str, cursor: usize) -> usize {
    buf[..cursor].chars().next_back().map_or(0, char::len_utf8)
}

fn next_char_len(buf: &str, cursor: usize) -> usize {
    buf[cursor..].chars().next().map_or(0, char::len_utf8)
}

fn kill_word(buf: &mut String, cursor: &mut usize) {
    let start = word_boundary_left(buf, *cursor);
    buf.drain(start..*cursor);
    *cursor = start;
}

/// Apply single-line editing keys to a buffer with cursor tracking.
///
/// Handles insertion, deletion, arrow/word/line movement and the usual
/// readline kills (Ctrl+W, Ctrl+U). Returns `true` if the key was consumed.
pub fn apply_text_edit(
    buf: &mut String,
    cursor: &mut usize,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    *cursor = (*cursor).min(buf.len());

    match code {
        // --- Cursor movement ---
        KeyCode::Left if modifiers.contains(KeyModifiers::ALT) => {
            *cursor = word_boundary_left(buf, *cursor);
        }
        KeyCode::Left => *cursor -= prev_char_len(buf, *cursor),
        KeyCode::Right if modifiers.contains(KeyModifiers::ALT) => {
            *cursor = word_boundary_right(buf, *cursor);
        }
        KeyCode::Right => *cursor += next_char_len(buf, *cursor),
        KeyCode::Home => *cursor = 0,
        KeyCode::Char('a') if modifiers.contains(KeyModifiers::CONTROL) => *cursor = 0,
        KeyCode::End => *cursor = buf.len(),
        KeyCode::Char('e') if modifiers.contains(KeyModifiers::CONTROL) => *cursor = buf.len(),

        // --- Deletion ---
        KeyCode::Backspace if modifiers.contains(KeyModifiers::ALT) => kill_word(buf, cursor),
        KeyCode::Char('w') if modifiers.contains(KeyModifiers::CONTROL) => kill_word(buf, cursor),
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            buf.drain(..*cursor);
            *cursor = 0;
        }
        KeyCode::Backspace => {
            let len = prev_char_len(buf, *cursor);
            buf.drain(*cursor - len..*cursor);
            *cursor -= len;
        }
        KeyCode::Delete => {
            let len = next_char_len(buf, *cursor);
            buf.drain(*cursor..*cursor + len);
        }

        // --- Character insertion ---
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            buf.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
        _ => return false,
    }
    true
}

/// Format a text buffer with a visible block cursor at the given position.
pub fn format_with_cursor(buf: &str, cursor: usize) -> String {
    let pos = cursor.min(buf.len());
    let (before, after) = buf.split_at(pos);
    format!("{before}\u{2588}{after}")
}

// ── Rendering helpers ─────────────────────────────────────────────────

/// Render a horizontal hint bar: alternating key/description spans.
pub fn render_hints(
    frame: &mut Frame,
    area: Rect,
    hints: &[(&str, &str)],
    key_style: Style,
    desc_style: Style,
) {
    let spans: Vec<Span<'_>> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!(" {key}"), key_style),
                Span::styled(format!(":{desc} "), desc_style),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ── Tests ─────────────────────────────────────────────────────────────
