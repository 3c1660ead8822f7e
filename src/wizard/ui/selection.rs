use ratatui::{prelude::*, widgets::Paragraph};

use super::super::{ContentFocus, PanelFocus, WizardApp};
use crate::catalog::SERVICES;

pub fn draw_selection(frame: &mut Frame, area: Rect, app: &WizardApp) {
    if area.height < 6 || area.width < 30 {
        return;
    }

    let is_focused =
        app.panel_focus == PanelFocus::Content && app.content_focus == ContentFocus::List;

    frame.render_widget(
        Paragraph::new(format!(
            "Choose your services ({} selected)",
            app.store.selected_services().len()
        ))
        .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, area.y + 1, area.width - 4, 1),
    );

    let list_top = area.y + 3;
    let list_height = area.height.saturating_sub(5) as usize;
    let scroll_offset = (app.list_cursor + 1).saturating_sub(list_height);

    for (row, (idx, service)) in SERVICES
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(list_height)
        .enumerate()
    {
        let checked = if app.store.is_selected(service.id) { "[x]" } else { "[ ]" };
        let line = format!(
            "{checked} {:<16} {:<18} {}",
            service.name,
            service.category.label(),
            service.description
        );

        let style = if idx == app.list_cursor {
            app.theme.selected_style(is_focused)
        } else if app.store.is_selected(service.id) {
            app.theme.secondary_style()
        } else {
            app.theme.style()
        };

        frame.render_widget(
            Paragraph::new(line).style(style),
            Rect::new(area.x + 2, list_top + row as u16, area.width - 4, 1),
        );
    }

    if app.store.is_selected("torrent") && !app.store.is_selected("vpn") {
        frame.render_widget(
            Paragraph::new("qBittorrent without the VPN exposes your IP")
                .style(app.theme.warning_style()),
            Rect::new(area.x + 2, area.y + area.height - 1, area.width - 4, 1),
        );
    }
}
