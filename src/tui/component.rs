use ratatui::layout::Rect;
use ratatui::Frame;

/// A reusable UI component.
///
/// Components receive data via props (struct fields), may borrow
/// persistent presentation state (`&mut State` fields), and render to a
/// `Frame` within a given `Rect`.
///
/// `render` takes `&mut self` so components can update scroll offsets or
/// list selection while drawing, like ratatui's `StatefulWidget`.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
