use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use super::super::{ContentFocus, PanelFocus, WelcomeChoice, WizardApp};

pub fn draw_welcome(frame: &mut Frame, area: Rect, app: &WizardApp) {
    if area.height < 8 || area.width < 30 {
        return;
    }

    let is_focused =
        app.panel_focus == PanelFocus::Content && app.content_focus == ContentFocus::List;
    let mut y = area.y + 1;

    frame.render_widget(
        Paragraph::new(app.settings.general.subtitle.clone())
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, area.width - 4, 1),
    );
    y += 2;

    let choices = WelcomeChoice::all();
    for (idx, choice) in choices.iter().enumerate() {
        if y >= area.y + area.height {
            break;
        }
        let is_selected = idx == app.list_cursor;
        let style = if is_selected {
            app.theme.selected_style(is_focused)
        } else {
            app.theme.style()
        };
        frame.render_widget(
            Paragraph::new(format!("{} {}", if is_selected { ">" } else { " " }, choice.title()))
                .style(style),
            Rect::new(area.x + 2, y, area.width - 4, 1),
        );
        y += 1;
        // Blank line between the two modes and the templates
        if idx == 1 {
            y += 1;
        }
    }

    let detail = match choices.get(app.list_cursor) {
        Some(WelcomeChoice::Template(t)) => format!(
            "{}\n\nHighlights: {}\nServices: {}",
            t.description,
            t.highlights.join(", "),
            t.services.join(", ")
        ),
        Some(WelcomeChoice::Mode(_)) | None => {
            "Newbie preselects Plex, the *arr apps, qBittorrent behind a VPN, notifications and stats. \
Expert starts from an empty selection."
                .to_string()
        }
    };

    y += 1;
    let bottom = area.y + area.height;
    if y < bottom {
        frame.render_widget(
            Paragraph::new(detail)
                .style(app.theme.muted_style())
                .wrap(Wrap { trim: true }),
            Rect::new(area.x + 2, y, area.width - 4, bottom - y),
        );
    }
}
