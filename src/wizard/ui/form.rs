use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use super::super::{FieldKey, WizardApp};
use super::field_line;
use crate::catalog::{service_fields, service_name};
use crate::setup::StorageMode;
use crate::storage::{is_absolute_path, StoragePathType};

/// Title, the current step's fields, then any trailing notes
pub fn draw_form(frame: &mut Frame, area: Rect, app: &WizardApp, title: &str, notes: &[String]) {
    if area.height < 4 || area.width < 20 {
        return;
    }

    let mut y = area.y + 1;
    frame.render_widget(
        Paragraph::new(title.to_string())
            .style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, y, area.width - 4, 1),
    );
    y += 2;

    let labels: Vec<String> = app.fields.iter().map(|f| f.key.label()).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let bottom = area.y + area.height;

    for (idx, label) in labels.iter().enumerate() {
        if y >= bottom {
            return;
        }
        frame.render_widget(
            Paragraph::new(field_line(app, label, idx, label_width)),
            Rect::new(area.x + 2, y, area.width - 4, 1),
        );
        y += 1;

        if let Some(warning) = path_warning(app, idx) {
            if y >= bottom {
                return;
            }
            frame.render_widget(
                Paragraph::new(format!("    {warning}")).style(app.theme.warning_style()),
                Rect::new(area.x + 2, y, area.width - 4, 1),
            );
            y += 1;
        }
    }

    if app.fields.is_empty() {
        frame.render_widget(
            Paragraph::new("Nothing to configure here. Press n for the next step.")
                .style(app.theme.muted_style()),
            Rect::new(area.x + 2, y, area.width - 4, 1),
        );
        y += 1;
    }

    y += 1;
    if y < bottom && !notes.is_empty() {
        frame.render_widget(
            Paragraph::new(notes.iter().map(|n| Line::from(n.clone())).collect::<Vec<_>>())
                .style(app.theme.muted_style())
                .wrap(Wrap { trim: true }),
            Rect::new(area.x + 2, y, area.width - 4, bottom - y),
        );
    }
}

/// Storage fields get a hint for relative paths and network shares
fn path_warning(app: &WizardApp, idx: usize) -> Option<&'static str> {
    let field = app.fields.get(idx)?;
    let FieldKey::StoragePath(_) = field.key else {
        return None;
    };
    let path = field.buffer.content();
    if path.is_empty() {
        None
    } else if StoragePathType::detect(path) == Some(StoragePathType::Network) {
        Some("Network share: mount it on the host before deploying")
    } else if !is_absolute_path(path) {
        Some("Use an absolute path")
    } else {
        None
    }
}

pub fn draw_service_config(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let mut notes: Vec<String> = app
        .store
        .selected_services()
        .iter()
        .filter_map(|service| {
            service_fields(service)
                .map(|f| format!("{}: {}", service_name(service), f.post_install_note))
        })
        .collect();

    if let Some(keys) = app.store.service_config("arr") {
        let stored: Vec<&str> = keys
            .keys()
            .filter(|k| k.ends_with("_API_KEY"))
            .map(String::as_str)
            .collect();
        if !stored.is_empty() {
            notes.insert(0, format!("API keys on file: {}", stored.join(", ")));
        }
    } else if app.store.is_selected("arr") {
        notes.insert(0, "Run :bootstrap once the *arr apps are up to fetch their API keys".to_string());
    }

    draw_form(frame, area, app, "Service settings", &notes);
}

pub fn draw_advanced(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let title = match app.store.storage_mode() {
        StorageMode::Simple => "Storage (simple: every path follows the data root)",
        StorageMode::Advanced => "Storage (advanced: per-category paths)",
    };
    let notes = vec![
        "Secrets here are kept in memory only and never written to the state file.".to_string(),
    ];
    draw_form(frame, area, app, title, &notes);
}
