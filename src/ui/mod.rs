pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::AppState;

/// Height of the add-user form: two bordered fields with a hint line each.
const FORM_HEIGHT: u16 = 8;

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(FORM_HEIGHT),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    components::render_search_bar(f, root[0], app);
    users::render_user_list(f, root[1], app);
    users::render_user_form(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    if app.snackbar.is_some() {
        components::render_snackbar(f, snackbar_area(root[1]), app);
    }
    if app.show_help {
        components::render_help_modal(f, f.area(), app);
    }
}

/// Bottom three rows of the list area.
fn snackbar_area(list: Rect) -> Rect {
    let height = 3u16.min(list.height);
    Rect {
        x: list.x + 1,
        y: list.y + list.height.saturating_sub(height),
        width: list.width.saturating_sub(2),
        height,
    }
}
