mod form;
mod review;
mod selection;
mod welcome;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{ConfirmAction, PanelFocus, WizardApp};
use crate::setup::StepId;
use crate::ui::{center_rect, Layout};
use crate::vim::VimMode;

/// Main draw function for the setup wizard
pub fn draw(frame: &mut Frame, app: &WizardApp) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    let layout = Layout::new(area);
    draw_header(frame, layout.header, app);
    draw_sidebar(frame, layout.sidebar, app);
    draw_main_content(frame, layout.content, app);
    draw_message(frame, layout.message, app);
    draw_status_bar(frame, layout.status, app);

    if let Some(action) = app.confirm_action {
        draw_confirm_dialog(frame, action, app);
    }

    if app.show_help {
        draw_help(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let mut title = format!(
        " {} (v{}) ",
        app.settings.general.title,
        env!("CARGO_PKG_VERSION")
    );
    if app.is_dryrun() {
        title.push_str("[dry run] ");
    }
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    let (status, style) = if app.is_control_offline() {
        ("[Control: off] ", app.theme.muted_style())
    } else {
        match app.control_online {
            Some(true) => ("[Control: online] ", app.theme.success_style()),
            Some(false) => ("[Control: offline] ", app.theme.error_style()),
            None => ("[Control: ...] ", app.theme.muted_style()),
        }
    };
    frame.render_widget(
        Paragraph::new(status).style(style).alignment(Alignment::Right),
        area,
    );
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let is_focused = app.panel_focus == PanelFocus::Sidebar;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.primary_style()
        } else {
            app.theme.border_style()
        })
        .title(" Steps ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let current = app.step().index();
    for (idx, step) in StepId::ALL.iter().enumerate() {
        if idx as u16 >= inner.height {
            break;
        }

        let marker = match idx.cmp(&current) {
            std::cmp::Ordering::Less => "[x]",
            std::cmp::Ordering::Equal => "[>]",
            std::cmp::Ordering::Greater => "[ ]",
        };
        let line = format!(" {marker} {}", step.short_name());

        let style = if idx == current {
            app.theme.selected_style(is_focused)
        } else if idx < current {
            app.theme.secondary_style()
        } else {
            app.theme.muted_style()
        };

        frame.render_widget(
            Paragraph::new(line).style(style),
            Rect::new(inner.x, inner.y + idx as u16, inner.width, 1),
        );
    }

    let mode = app.store.mode().map(|m| m.label()).unwrap_or("no mode");
    if inner.height > StepId::ALL.len() as u16 + 2 {
        frame.render_widget(
            Paragraph::new(format!(" {mode}, {} services", app.store.selected_services().len()))
                .style(app.theme.muted_style()),
            Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
        );
    }
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let is_focused = app.panel_focus == PanelFocus::Content;
    let step = app.step();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.primary_style()
        } else {
            app.theme.border_style()
        })
        .title(format!(" {} ", step.title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match step {
        StepId::Welcome => welcome::draw_welcome(frame, inner, app),
        StepId::BasicConfig => form::draw_form(frame, inner, app, "Basic configuration", &[]),
        StepId::StackSelection => selection::draw_selection(frame, inner, app),
        StepId::ServiceConfig => form::draw_service_config(frame, inner, app),
        StepId::Advanced => form::draw_advanced(frame, inner, app),
        StepId::Review => review::draw_review(frame, inner, app),
    }
}

fn draw_message(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let (title, border_style, text_style, text) = match &app.message {
        Some(msg) if msg.is_error => (
            " Error ",
            app.theme.error_style(),
            app.theme.error_style(),
            msg.text.clone(),
        ),
        Some(msg) => (
            " Info ",
            app.theme.secondary_style(),
            app.theme.style(),
            format_busy(app, &msg.text),
        ),
        None if app.is_busy => (
            " Info ",
            app.theme.secondary_style(),
            app.theme.style(),
            format_busy(app, "Please wait..."),
        ),
        None => return,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, text_style)))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn format_busy(app: &WizardApp, text: &str) -> String {
    if app.is_busy {
        format!("{} {text}", app.spinner_char())
    } else {
        text.to_string()
    }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let mode_span = Span::styled(
        format!(" {} ", app.vim_mode.display_name()),
        app.theme.mode_style(app.vim_mode),
    );

    let after_mode = if app.vim_mode == VimMode::Command {
        Span::styled(format!(":{}", app.command_buffer.content()), app.theme.style())
    } else {
        Span::styled(app.status_bar.left_hint.clone(), app.theme.muted_style())
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![mode_span, Span::raw(" "), after_mode])),
        Rect::new(area.x, area.y, area.width * 2 / 3, 1),
    );

    let progress = format!("{}/{}", app.step().index() + 1, StepId::ALL.len());
    let right_text = if app.status_bar.right_hint.is_empty() {
        progress
    } else {
        format!("{progress}  {}", app.status_bar.right_hint)
    };

    frame.render_widget(
        Paragraph::new(right_text)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        Rect::new(area.x + area.width / 3, area.y, area.width - area.width / 3, 1),
    );
}

fn draw_confirm_dialog(frame: &mut Frame, action: ConfirmAction, app: &WizardApp) {
    let (title, message) = match action {
        ConfirmAction::Reset => ("Reset", "Start over? Saved profiles are kept."),
        ConfirmAction::Quit => ("Quit", "Leave the wizard? Progress is saved."),
    };

    let area = center_rect(frame.area(), 46, 7);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.primary_style())
        .title(format!(" {title} "));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    frame.render_widget(
        Paragraph::new(message)
            .style(app.theme.style().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );

    let hints = Line::from(vec![
        Span::styled("[", app.theme.style()),
        Span::styled("Y", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]es / [", app.theme.style()),
        Span::styled("N", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]o", app.theme.style()),
    ]);
    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 3, inner.width, 1),
    );
}

const HELP_TEXT: &[&str] = &[
    "",
    "Navigation:",
    "  Ctrl+h / Ctrl+l   Sidebar / content",
    "  j/k               Move (sidebar: next/previous step)",
    "  Enter             Choose, toggle or edit",
    "  Space             Toggle service",
    "  n / b             Next / previous step",
    "  m                 Simple or advanced storage",
    "",
    "Editing:",
    "  i                 Edit field    Esc  Done",
    "  Tab / S-Tab       Next / previous field",
    "",
    "Commands:",
    "  :next :back :reset :mode <newbie|expert>",
    "  :storage <simple|advanced> :template <id>",
    "  :save :load :delete <name>",
    "  :export :import <path> :bootstrap :write :q",
    "",
    "Press q or Esc to close",
];

fn draw_help(frame: &mut Frame, app: &WizardApp) {
    let area = center_rect(frame.area(), 60, HELP_TEXT.len() as u16 + 2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for (i, line) in HELP_TEXT.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}

/// One `label: value` row, with a cursor when editing
pub(super) fn field_line(
    app: &WizardApp,
    label: &str,
    idx: usize,
    label_width: usize,
) -> Line<'static> {
    let Some(field) = app.fields.get(idx) else {
        return Line::default();
    };
    let is_focused = app.panel_focus == PanelFocus::Content && app.focused_field() == Some(idx);
    let is_editing = is_focused && app.vim_mode == VimMode::Insert;

    let label_style = if is_focused {
        app.theme.primary_style().add_modifier(Modifier::BOLD)
    } else {
        app.theme.style()
    };
    let mut spans = vec![
        Span::styled(if is_focused { "> " } else { "  " }, label_style),
        Span::styled(format!("{label:<label_width$} "), label_style),
    ];

    if is_editing {
        let (before, after) = field.buffer.split_at_cursor('*');
        spans.push(Span::styled(before, app.theme.style()));
        spans.push(Span::styled("|", app.theme.primary_style().add_modifier(Modifier::BOLD)));
        spans.push(Span::styled(after, app.theme.style()));
    } else if field.buffer.is_empty() {
        spans.push(Span::styled("(empty)", app.theme.muted_style()));
    } else {
        spans.push(Span::styled(field.buffer.display('*'), app.theme.secondary_style()));
    }
    Line::from(spans)
}
