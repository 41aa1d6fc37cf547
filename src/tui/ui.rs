use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{BookShelf, ContentPanel, ImagePanel, PageList, TitleBar};
use crate::tui::{Focus, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

fn help_text(tui: &TuiState, app: &App) -> &'static str {
    if app.image.fullscreen {
        return "f/Esc close fullscreen | Ctrl+C quit";
    }
    if tui.shelf.searching {
        return "type to search | Enter select | Esc done | Ctrl+U clear";
    }
    match tui.focus {
        Focus::Books => "↑↓ move | ←→ letter | Enter open | / search | Tab next | r retry | q quit",
        Focus::Pages => "↑↓ move | Enter open | Esc clear | f fullscreen | Tab next | r retry | q quit",
        Focus::Content => "↑↓ PgUp PgDn scroll | f fullscreen | Tab next | r retry | q quit",
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min, Percentage};
    let [title_area, shelf_area, reader_area, help_area] =
        Layout::vertical([Length(1), Percentage(40), Min(0), Length(1)]).areas(frame.area());
    let [pages_area, image_area, content_area] =
        Layout::horizontal([Percentage(14), Percentage(43), Percentage(43)]).areas(reader_area);

    TitleBar {
        book_title: app.selection.book.as_ref().map(|book| book.title.as_str()),
        status_message: &app.status_message,
    }
    .render(frame, title_area);

    BookShelf::new(&mut tui.shelf, app, tui.focus == Focus::Books, spinner_frame)
        .render(frame, shelf_area);
    PageList::new(&mut tui.page_list, app, tui.focus == Focus::Pages, spinner_frame)
        .render(frame, pages_area);
    ContentPanel {
        app,
        scroll_state: &mut tui.content_scroll,
        focused: tui.focus == Focus::Content,
        spinner_frame,
    }
    .render(frame, content_area);

    frame.render_widget(
        Line::from(Span::styled(help_text(tui, app), Style::default().fg(Color::DarkGray))),
        help_area,
    );

    // Last: fullscreen mode overlays everything above
    ImagePanel::new(app, spinner_frame).render(frame, image_area);
}
