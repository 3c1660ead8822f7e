use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use super::super::WizardApp;
use crate::catalog::service_name;
use crate::render::{compose_services, review_summary};
use crate::storage::StoragePathType;

pub fn draw_review(frame: &mut Frame, area: Rect, app: &WizardApp) {
    if area.height < 8 || area.width < 30 {
        return;
    }

    let store = &app.store;
    let config = store.config();
    let summary = review_summary(store);
    let width = area.width - 4;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled(
        "Review & generate",
        app.theme.primary_style().add_modifier(Modifier::BOLD),
    ));
    lines.push(Line::default());
    lines.push(Line::from(format!("  Domain:   {}", config.domain)));
    lines.push(Line::from(format!("  Timezone: {}", config.timezone)));
    lines.push(Line::from(format!("  PUID/PGID: {}/{}", config.puid, config.pgid)));
    lines.push(Line::from(format!(
        "  Mode:     {}",
        store.mode().map(|m| m.label()).unwrap_or("-")
    )));

    let names: Vec<&str> = store.selected_services().iter().map(|s| service_name(s)).collect();
    lines.push(Line::from(format!("  Services: {}", names.join(", "))));
    lines.push(Line::from(format!(
        "  Containers: {}",
        compose_services(store.selected_services()).len()
    )));
    if let Some(running) = &app.compose_listing {
        lines.push(Line::styled(
            format!("  Already known to the control server: {}", running.len()),
            app.theme.muted_style(),
        ));
    }

    lines.push(Line::default());
    lines.push(Line::styled(
        format!("Storage ({})", store.storage_mode().label()),
        app.theme.primary_style(),
    ));
    for entry in &summary.storage {
        let marker = match entry.path_type {
            StoragePathType::Network => " (network)",
            StoragePathType::Local => "",
        };
        lines.push(Line::from(format!("  {:<14} {}{marker}", entry.label, entry.path)));
    }

    if let Some(warning) = summary.vpn_warning {
        lines.push(Line::default());
        lines.push(Line::styled(warning, app.theme.warning_style()));
    }

    lines.push(Line::default());
    if app.written_files.is_empty() {
        lines.push(Line::styled(
            format!(
                "Enter writes the files to {}",
                app.settings.output.directory.display()
            ),
            app.theme.muted_style(),
        ));
    } else {
        for path in &app.written_files {
            lines.push(Line::styled(
                format!("  wrote {}", path.display()),
                app.theme.success_style(),
            ));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        Rect::new(area.x + 2, area.y + 1, width, area.height - 1),
    );
}
