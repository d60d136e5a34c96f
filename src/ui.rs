//! The UI renders the application state into something visible and scrollable.
//!
//! The draw function dispatches based on the current view (file list or document).
//! The document view shows the section index on the left, highlighting the active section,
//! and the document itself on the right.

use crate::app_state::{AppState, FileMode, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    match app.current_view {
        View::FileList => draw_file_list(f, app),
        View::Document => draw_document(f, app),
    }
}

fn main_and_help(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    (chunks[0], chunks[1])
}

fn draw_file_list(f: &mut Frame, app: &AppState) {
    let (main, help) = main_and_help(f.area());

    let items: Vec<ListItem> = app
        .files
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let style = if i == app.current_file_index {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!("📄 {}", path.display()),
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            )))
            .style(style)
        })
        .collect();

    let title = format!("Files ({})", app.files.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, main);

    let help_widget = Paragraph::new("↑/↓: Navigate | Enter: Open | q: Quit")
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, help);
}

fn draw_document(f: &mut Frame, app: &mut AppState) {
    let (main, help) = main_and_help(f.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main);

    // Document first, so the tracker works with the pane height actually on screen
    let doc_block = Block::default().borders(Borders::ALL).title(
        app.files
            .get(app.current_file_index)
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
    );
    let inner = doc_block.inner(panes[1]);
    app.set_viewport_height(usize::from(inner.height));

    let text: Vec<Line> = app
        .layout
        .lines
        .iter()
        .enumerate()
        .map(|(row, line)| {
            if app.layout.is_heading_row(row) {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(line.clone())
            }
        })
        .collect();
    let offset = u16::try_from(app.scroll_top).unwrap_or(u16::MAX);
    let document = Paragraph::new(text).block(doc_block).scroll((offset, 0));
    f.render_widget(document, panes[1]);

    let active = app.highlighted();
    let items: Vec<ListItem> = app
        .spy
        .nav_items()
        .into_iter()
        .zip(&app.sections)
        .map(|(item, section)| {
            let indent = "  ".repeat(section.level.saturating_sub(1));
            ListItem::new(format!("{indent}{}", item.label))
        })
        .collect();
    let tracking = if app.spy.listener().is_some() {
        "Index"
    } else {
        "Index (paused)"
    };
    let index = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(tracking))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(active));
    f.render_stateful_widget(index, panes[0], &mut state);

    let help_text = if let Some(ref msg) = app.message {
        msg.clone()
    } else {
        let back = if app.file_mode == FileMode::Multi {
            "q: Files"
        } else {
            "q: Quit"
        };
        format!("↑/↓: Scroll | PgUp/PgDn: Page | [/]: Prev/Next Section | t: Tracking | {back}")
    };
    let help_widget = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, help);
}
