//! UI rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use linkdash_core::dashboard::{Field, LinkForm};
use linkdash_core::{KeyValueStore, Link};

use super::app::App;

/// Tile size in cells, borders included
const TILE_WIDTH: u16 = 24;
const TILE_HEIGHT: u16 = 5;

/// Width of the "Title: " / "URL:   " labels in the form
const LABEL_WIDTH: u16 = 7;

/// Number of tiles per row for a terminal `width` cells wide
pub fn grid_columns(width: u16) -> usize {
    (width.saturating_sub(2) / TILE_WIDTH).max(1) as usize
}

/// Main UI rendering function
pub fn draw<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    // Create vertical layout for status bar at the bottom
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    draw_grid(frame, app, chunks[0]);
    draw_status_bar(frame, app, chunks[1]);

    if let Some(form) = app.view().modal.form() {
        let editing = app.view().modal.target().is_some();
        draw_link_form(frame, form, editing);
    }

    // Draw help overlay if visible
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the tile grid
fn draw_grid<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let view = app.view();

    let (title, border_style) = if view.edit_mode {
        (" Links (editing) ", Style::default().fg(Color::Yellow))
    } else {
        (" Links ", Style::default().add_modifier(Modifier::BOLD))
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.links.is_empty() {
        let empty = Paragraph::new("No links yet. Press 'a' to add one.")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(empty, inner);
        return;
    }

    let columns = grid_columns(area.width);
    let visible_rows = ((inner.height / TILE_HEIGHT) as usize).max(1);
    let first_row = first_visible_row(app.selected / columns, visible_rows);

    for (index, link) in view.links.iter().enumerate() {
        let row = index / columns;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = index % columns;
        let tile_area = Rect::new(
            inner.x + col as u16 * TILE_WIDTH,
            inner.y + (row - first_row) as u16 * TILE_HEIGHT,
            TILE_WIDTH.min(inner.width),
            TILE_HEIGHT.min(inner.height),
        );
        draw_tile(
            frame,
            link,
            tile_area,
            index == app.selected,
            view.edit_mode,
        );
    }
}

/// First grid row to draw so the selected row stays on screen
fn first_visible_row(selected_row: usize, visible_rows: usize) -> usize {
    (selected_row + 1).saturating_sub(visible_rows)
}

/// Draw a single tile
fn draw_tile(frame: &mut Frame, link: &Link, area: Rect, selected: bool, edit_mode: bool) {
    // The delete marker is shown in both modes
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(" ✕ ").alignment(Alignment::Right));

    if edit_mode {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }

    let text_style = if selected {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    if selected {
        block = block.border_style(if edit_mode {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        });
    }

    let max_len = area.width.saturating_sub(4) as usize;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(ellipsize(&link.title, max_len), text_style)),
    ];

    let tile = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(tile, area);
}

/// Draw the add/edit form
fn draw_link_form(frame: &mut Frame, form: &LinkForm, editing: bool) {
    let area = frame.area();

    // Calculate centered popup area
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 7.min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let title = if editing { " Edit Link " } else { " New Link " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(popup_area);

    let save_style = if form.can_save() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let lines = vec![
        form_line("Title: ", &form.title, form.focus == Field::Title),
        form_line("URL:   ", &form.url, form.focus == Field::Url),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter:save", save_style),
            Span::styled(
                "  Tab:next field  Esc:cancel",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);

    // Position cursor at the end of the focused field
    let (row, value) = match form.focus {
        Field::Title => (0, &form.title),
        Field::Url => (1, &form.url),
    };
    let max_x = inner.x + inner.width.saturating_sub(1);
    let cursor_x = (inner.x + LABEL_WIDTH + value.chars().count() as u16).min(max_x);
    frame.set_cursor_position((cursor_x, inner.y + row));
}

fn form_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    Line::from(vec![Span::styled(label, label_style), Span::raw(value)])
}

/// Draw the status bar at the bottom
fn draw_status_bar<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let view = app.view();

    let mut spans = Vec::new();
    if view.edit_mode {
        spans.push(Span::styled(
            " EDIT ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
        spans.push(Span::raw(" "));
    }
    if !app.is_durable() {
        spans.push(Span::styled("unsaved ", Style::default().fg(Color::Red)));
    }

    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else if view.modal.is_open() {
        "Enter:save  Tab:next field  Esc:cancel".to_string()
    } else if view.edit_mode {
        "Enter:edit  x:delete  a:add  e:done  ?:help  q:quit".to_string()
    } else {
        "Enter:open  a:add  e:edit mode  x:delete  ?:help  q:quit".to_string()
    };
    spans.push(Span::styled(
        content,
        Style::default().add_modifier(Modifier::DIM),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Calculate centered popup area
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 23.min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the popup area
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Dashboard:"),
        Line::from("  h/j/k/l, arrows  Move between tiles"),
        Line::from("  g / G            First / last tile"),
        Line::from("  Enter, Space     Open link (edit in edit mode)"),
        Line::from("  x, Delete        Delete tile"),
        Line::from("  e                Toggle edit mode"),
        Line::from("  a                Add link"),
        Line::from("  q                Quit"),
        Line::from(""),
        Line::from("Link form:"),
        Line::from("  Tab              Next field"),
        Line::from("  Enter            Save"),
        Line::from("  Esc              Cancel"),
        Line::from("  Ctrl-E           Toggle edit mode"),
        Line::from(""),
        Line::from("URLs without http(s):// get https:// added."),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}

/// Shorten to `max_len` characters, ending in "…" when cut
fn ellipsize(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkdash_core::storage::MemoryStore;
    use linkdash_core::LinkStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App<MemoryStore>, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with(titles: &[&str]) -> App<MemoryStore> {
        let mut store = LinkStore::load(MemoryStore::new(), "savedLinks");
        for title in titles {
            store.add(*title, "https://example.com");
        }
        App::new(store)
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(0), 1);
        assert_eq!(grid_columns(30), 1);
        assert_eq!(grid_columns(50), 2);
        assert_eq!(grid_columns(98), 4);
    }

    #[test]
    fn test_first_visible_row() {
        assert_eq!(first_visible_row(0, 3), 0);
        assert_eq!(first_visible_row(2, 3), 0);
        assert_eq!(first_visible_row(3, 3), 1);
        assert_eq!(first_visible_row(7, 1), 7);
    }

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("Mail", 10), "Mail");
        assert_eq!(ellipsize("Calendar", 5), "Cale…");
    }

    #[test]
    fn test_draws_tiles_in_order() {
        let app = app_with(&["Mail", "Calendar"]);

        let screen = render(&app, 80, 20);

        let mail = screen.find("Mail").unwrap();
        let calendar = screen.find("Calendar").unwrap();
        assert!(mail < calendar);
        assert_eq!(screen.matches('✕').count(), 2);
        assert!(!screen.contains("editing"));
    }

    #[test]
    fn test_edit_mode_marks_grid() {
        let mut app = app_with(&["Mail"]);
        app.dispatch(linkdash_core::Intent::ToggleEditMode);

        let screen = render(&app, 80, 20);

        assert!(screen.contains('✕'));
        assert!(screen.contains("editing"));
    }

    #[test]
    fn test_empty_dashboard_hint() {
        let app = app_with(&[]);
        let screen = render(&app, 80, 20);
        assert!(screen.contains("No links yet"));
    }

    #[test]
    fn test_form_title_depends_on_target() {
        let mut app = app_with(&["Mail"]);
        app.dispatch(linkdash_core::Intent::OpenCreate);
        assert!(render(&app, 80, 20).contains("New Link"));

        app.dispatch(linkdash_core::Intent::Cancel);
        app.dispatch(linkdash_core::Intent::ToggleEditMode);
        let id = app.selected_id().unwrap();
        app.dispatch(linkdash_core::Intent::ClickTile(id));
        assert!(render(&app, 80, 20).contains("Edit Link"));
    }
}
