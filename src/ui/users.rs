use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, Focus};
use crate::viewmodel::UiState;

/// List area: spinner text, the filtered table, an empty notice, or the error.
pub fn render_user_list(f: &mut Frame, area: Rect, app: &mut AppState) {
    let focused = app.focus == Focus::List;
    let block = Block::default()
        .title(format!("Users ({})", app.view.filtered_users.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { app.theme.focus } else { app.theme.border }));

    if app.view.ui_state.users().is_some() && !app.view.filtered_users.is_empty() {
        render_users_table(f, area, app, block);
        return;
    }
    let (text, style) = match &app.view.ui_state {
        UiState::Success { .. } => (
            "No users available".to_string(),
            Style::default().fg(app.theme.muted),
        ),
        UiState::Loading => ("Loading…".to_string(), Style::default().fg(app.theme.title)),
        UiState::Error(message) => (
            message.clone(),
            Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD),
        ),
    };
    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style)
        .block(block);
    f.render_widget(p, area);
}

fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState, block: Block) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let users = &app.view.filtered_users;
    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(users.len());
    let slice = &users[start.min(end)..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ];
    let header = Row::new(vec!["ID", "NAME", "EMAIL"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

/// Name and email inputs with their validation hints.
pub fn render_user_form(f: &mut Frame, area: Rect, app: &AppState) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(4)].as_ref())
        .split(area);

    let name_hint = app.view.name_error.then_some("Name cannot be empty");
    let email_hint = app.view.email_error.then(|| {
        if app.view.email.is_empty() {
            "Email cannot be empty"
        } else {
            "Invalid email address"
        }
    });

    render_field(f, halves[0], app, "Name", &app.view.name, name_hint, app.focus == Focus::Name);
    render_field(f, halves[1], app, "Email", &app.view.email, email_hint, app.focus == Focus::Email);
}

fn render_field(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    label: &str,
    value: &str,
    hint: Option<&str>,
    focused: bool,
) {
    let border = if hint.is_some() {
        app.theme.error
    } else if focused {
        app.theme.focus
    } else {
        app.theme.border
    };
    let cursor = if focused { "▏" } else { "" };
    let mut lines = vec![Line::from(vec![
        Span::styled(value.to_string(), Style::default().fg(app.theme.text)),
        Span::raw(cursor),
    ])];
    if let Some(hint) = hint {
        lines.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(app.theme.error).add_modifier(Modifier::ITALIC),
        )));
    }
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(label.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}
