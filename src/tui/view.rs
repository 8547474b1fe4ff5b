use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::session::{Mode, Outcome, Session};
use super::theme::Theme;

pub const TITLE: &str = "Universal Package Uninstaller";
pub const HELP: &str = "↑/↓: navigate • enter: uninstall • /: search • q: quit";
const LOADING: &str = "Loading packages...";

pub fn render(frame: &mut Frame, session: &Session, theme: &Theme) {
    let area = frame.area();

    if session.is_loading() && session.mode() == Mode::List {
        render_loading(frame, area, theme);
        return;
    }

    let [title, status, list, filter, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {} ", TITLE), theme.title)),
        title,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(status_text(session), theme.status)),
        status,
    );
    render_list(frame, list, session, theme);
    frame.render_widget(Paragraph::new(filter_line(session, theme)), filter);
    frame.render_widget(Paragraph::new(Span::styled(HELP, theme.help)), help);

    if session.mode() != Mode::List {
        render_dialog(frame, area, session, theme);
    }
}

fn status_text(session: &Session) -> String {
    let shown = session.visible_len();
    let total = session.packages().len();
    let noun = if total == 1 { "package" } else { "packages" };
    if session.filter().is_empty() {
        format!("{} {}", total, noun)
    } else {
        format!("{} of {} {} • filter: {}", shown, total, noun, session.filter())
    }
}

fn filter_line<'a>(session: &'a Session, theme: &Theme) -> Line<'a> {
    if session.is_filtering() {
        Line::from(vec![
            Span::styled("Filter: ", theme.filter),
            Span::raw(session.filter()),
            Span::styled("█", theme.filter),
        ])
    } else {
        Line::default()
    }
}

fn render_list(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let items: Vec<ListItem> = session
        .visible()
        .map(|pkg| {
            ListItem::new(vec![
                Line::from(Span::styled(pkg.name.clone(), theme.item)),
                Line::from(Span::styled(format!("  {}", pkg.summary_line()), theme.detail)),
            ])
        })
        .collect();

    if items.is_empty() {
        let text = if session.filter().is_empty() {
            "No packages found."
        } else {
            "No packages match the filter."
        };
        frame.render_widget(Paragraph::new(Span::styled(text, theme.detail)), area);
        return;
    }

    let list = List::new(items)
        .highlight_style(theme.highlight)
        .highlight_symbol("│ ");
    let mut state = ListState::default().with_selected(Some(session.cursor()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_dialog(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let (text, style) = match session.mode() {
        Mode::Confirm => {
            let name = session.selected().map(|p| p.name.as_str()).unwrap_or("?");
            (
                format!(
                    "Are you sure you want to uninstall {}?\n\nPress 'y' to confirm or 'n' to cancel",
                    name
                ),
                theme.dialog,
            )
        }
        Mode::Uninstalling => ("Uninstalling...".to_string(), theme.dialog),
        Mode::Done => match session.outcome() {
            Some(Outcome::Success(msg)) => (format!("✓ {}", msg), theme.success),
            Some(Outcome::Failure(msg)) => (format!("✗ {}", msg), theme.error),
            None => (String::new(), theme.dialog),
        },
        Mode::List => return,
    };

    let popup = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).border_style(theme.dialog)),
        popup,
    );
}

fn render_loading(frame: &mut Frame, area: Rect, theme: &Theme) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);
    frame.render_widget(
        Paragraph::new(Span::styled(format!("   {}", LOADING), theme.status)),
        middle,
    );
}

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::package::{Manager, Package};
    use crate::tui::session::Event;

    fn draw(session: &Session) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| render(frame, session, &Theme::new(false)))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn press(session: &mut Session, code: KeyCode) {
        session.handle(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn loaded() -> Session {
        let mut session = Session::new();
        session.start();
        let vim = Package {
            version: "9.1".to_string(),
            size: "3.5 MB".to_string(),
            ..Package::new("vim", Manager::Pacman)
        };
        session.handle(Event::Loaded(vec![vim, Package::new("curl", Manager::Apt)]));
        session
    }

    #[test]
    fn test_loading_screen() {
        let mut session = Session::new();
        session.start();
        let screen = draw(&session);
        assert!(screen.contains("Loading packages..."));
        assert!(!screen.contains(TITLE));
    }

    #[test]
    fn test_list_screen() {
        let screen = draw(&loaded());
        assert!(screen.contains(TITLE));
        assert!(screen.contains("2 packages"));
        assert!(screen.contains("vim"));
        assert!(screen.contains("[pacman] 9.1 - 3.5 MB"));
        assert!(screen.contains("enter: uninstall"));
    }

    #[test]
    fn test_filter_line_and_status() {
        let mut session = loaded();
        press(&mut session, KeyCode::Char('/'));
        press(&mut session, KeyCode::Char('v'));
        let screen = draw(&session);
        assert!(screen.contains("Filter: v"));
        assert!(screen.contains("1 of 2 packages"));
    }

    #[test]
    fn test_confirm_dialog_names_package() {
        let mut session = loaded();
        press(&mut session, KeyCode::Enter);
        let screen = draw(&session);
        assert!(screen.contains("uninstall curl?"));
        assert!(screen.contains("Press 'y' to confirm"));
    }

    #[test]
    fn test_empty_list_message() {
        let mut session = Session::new();
        session.start();
        session.handle(Event::Loaded(Vec::new()));
        assert!(draw(&session).contains("No packages found."));
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 30, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 15);
        assert_eq!(popup.x, 20);
    }
}
