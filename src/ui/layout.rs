use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Screen regions shared by every wizard view
pub struct Layout {
    pub header: Rect,
    pub sidebar: Rect,
    pub content: Rect,
    pub message: Rect,
    pub status: Rect,
}

impl Layout {
    pub fn new(area: Rect) -> Self {
        // The message panel is always reserved so the content does not jump
        let rows = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),  // Header
                Constraint::Min(10),    // Sidebar + content
                Constraint::Length(3),  // Message panel
                Constraint::Length(1),  // Status bar
            ])
            .split(area);

        let columns = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(30)])
            .split(rows[1]);

        Self {
            header: rows[0],
            sidebar: columns[0],
            content: columns[1],
            message: rows[2],
            status: rows[3],
        }
    }
}

/// A `width` x `height` box centred in `area`, shrunk to fit
pub fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centred_box_fits_inside() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(center_rect(area, 40, 10), Rect::new(20, 7, 40, 10));
        assert_eq!(center_rect(area, 100, 30), area);
    }

    #[test]
    fn regions_stack_vertically() {
        let layout = Layout::new(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.status.y, 29);
        assert_eq!(layout.message.height, 3);
        assert_eq!(layout.sidebar.width, 24);
        assert_eq!(layout.content.x, 24);
    }
}
