//! Shared UI components (search bar, status bar, snackbar, help overlay).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, Focus};
use crate::viewmodel::UiState;

/// Top bar with the raw query; the title shows the query currently applied.
pub fn render_search_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Search;
    let query = &app.view.search_query;
    let title = if app.view.applied_query.is_empty() {
        "Search users".to_string()
    } else {
        format!("Search users (filter: {})", app.view.applied_query)
    };
    let mut spans = vec![Span::styled(query.clone(), Style::default().fg(app.theme.header_fg))];
    if focused {
        spans.push(Span::raw("▏"));
    }
    if !query.is_empty() {
        spans.push(Span::styled(
            "   Ctrl+u: clear",
            Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC),
        ));
    }
    let p = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(app.theme.header_bg))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused {
                    app.theme.focus
                } else {
                    app.theme.border
                })),
        );
    f.render_widget(p, area);
}

/// Bottom line: focus, counts and the message of the last successful operation.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let state = match &app.view.ui_state {
        UiState::Loading => "loading".to_string(),
        UiState::Success { message, .. } => message.clone(),
        UiState::Error(_) => "error".to_string(),
    };
    let total = app.view.ui_state.users().map_or(0, <[_]>::len);
    let msg = format!(
        "mode: {}  shown:{}  total:{}  {}  — Tab: focus; ?: help; q: quit",
        app.focus.label(),
        app.view.filtered_users.len(),
        total,
        state
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

pub fn render_snackbar(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(snack) = &app.snackbar else {
        return;
    };
    let mut spans = vec![Span::styled(
        snack.message.clone(),
        Style::default().fg(app.theme.status_fg),
    )];
    if snack.undo {
        let keys = app.keymap.keys_for(KeyAction::Undo).join("/");
        spans.push(Span::styled(
            format!("   [{keys}] Undo"),
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD),
        ));
    }
    let p = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(app.theme.status_bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, area);
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Help overlay listing the list bindings from the active keymap plus the fixed keys.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let rect = centered_rect(64, 22, area);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let mut lines: Vec<Line> = vec![Line::from(Span::styled("List", bold))];
    for (label, action) in [
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Page up", KeyAction::PageUp),
        ("Page down", KeyAction::PageDown),
        ("Delete selected", KeyAction::DeleteSelection),
        ("Undo delete", KeyAction::Undo),
        ("Clear all users", KeyAction::ClearAll),
        ("Refresh", KeyAction::Refresh),
        ("Search", KeyAction::StartSearch),
        ("New user", KeyAction::NewUser),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ] {
        let keys = app.keymap.keys_for(action);
        if keys.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<18}", label)),
            Span::styled(keys.join(", "), italic),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Anywhere", bold)));
    for (label, keys) in [
        ("Next / prev field", "Tab, BackTab"),
        ("Back to list", "Esc"),
        ("Add user", "Enter (in Name or Email)"),
        ("Clear search", "Ctrl+u (in Search)"),
        ("Quit", "Ctrl+c"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<18}", label)),
            Span::styled(keys, italic),
        ]));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
