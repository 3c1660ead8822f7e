mod form;
mod settings;
pub mod ui;
mod widgets;

pub use form::{build_fields, field_keys, FieldKey, FormField, WelcomeChoice};
pub use settings::{
    ControlSettings, DefaultsSettings, GeneralSettings, OutputSettings, WizardSettings,
    CONTROL_URL_ENV,
};
pub use widgets::StatusBarState;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog::{template, SERVICES};
use crate::control::{BootstrapResult, ControlClient};
use crate::error::{Result, WizardError};
use crate::render;
use crate::setup::validate::{validate_advanced, validate_basic, validate_selection, FieldError};
use crate::setup::{write_atomic, SetupStore, StepId, StorageMode, LAST_STEP};
use crate::ui::Theme;
use crate::vim::{parse_command, Command, InputBuffer, ModeAction, VimMode};

/// Results of control server calls, drained on every tick
#[derive(Debug)]
pub enum ControlMessage {
    Health(bool),
    Bootstrapped(Result<BootstrapResult>),
    ComposeListing(Result<Vec<String>>),
}

/// Work the event loop performs on behalf of the app
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    Bootstrap,
    WriteArtifacts,
    Export(PathBuf),
    Import(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Sidebar,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFocus {
    /// Cursor on a choice or service row
    List,
    InputField(usize),
    None,
}

pub struct Message {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Reset,
    Quit,
}

pub struct WizardApp {
    pub settings: WizardSettings,
    pub theme: Theme,
    pub store: SetupStore,

    // Vim mode state
    pub vim_mode: VimMode,
    pub command_buffer: InputBuffer,

    // Panel navigation
    pub panel_focus: PanelFocus,
    pub content_focus: ContentFocus,
    pub list_cursor: usize,
    pub fields: Vec<FormField>,
    shown_step: usize,

    // Control server
    control: ControlClient,
    control_tx: mpsc::UnboundedSender<ControlMessage>,
    control_rx: mpsc::UnboundedReceiver<ControlMessage>,
    health_in_flight: bool,
    ticks_since_health: u32,
    pub control_online: Option<bool>,
    pub compose_listing: Option<Vec<String>>,
    pub is_busy: bool,

    // UI state
    pub message: Option<Message>,
    pub confirm_action: Option<ConfirmAction>,
    pub show_help: bool,
    pub should_exit: bool,
    pub written_files: Vec<PathBuf>,
    pub status_bar: StatusBarState,
    spinner_frame: usize,
}

impl WizardApp {
    pub fn new(settings: WizardSettings, store: SetupStore, control: ControlClient) -> Self {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let shown_step = store.current_step();
        let health_interval = settings.control.health_interval_ticks;

        let mut app = Self {
            settings,
            theme: Theme::default(),
            store,
            vim_mode: VimMode::Normal,
            command_buffer: InputBuffer::new(),
            panel_focus: PanelFocus::Content,
            content_focus: ContentFocus::None,
            list_cursor: 0,
            fields: Vec::new(),
            shown_step,
            control,
            control_tx,
            control_rx,
            health_in_flight: false,
            // First tick checks straight away
            ticks_since_health: health_interval,
            control_online: None,
            compose_listing: None,
            is_busy: false,
            message: None,
            confirm_action: None,
            show_help: false,
            should_exit: false,
            written_files: Vec::new(),
            status_bar: StatusBarState::default(),
            spinner_frame: 0,
        };
        app.load_step_content();
        app.update_status_bar();
        app
    }

    pub fn step(&self) -> StepId {
        self.store.step()
    }

    pub fn is_dryrun(&self) -> bool {
        self.settings.is_dryrun()
    }

    pub fn is_control_offline(&self) -> bool {
        self.control.is_offline()
    }

    /// Rows of the list on the current step, if it has one
    pub fn list_len(&self) -> usize {
        match self.step() {
            StepId::Welcome => WelcomeChoice::all().len(),
            StepId::StackSelection => SERVICES.len(),
            _ => 0,
        }
    }

    pub fn focused_field(&self) -> Option<usize> {
        match self.content_focus {
            ContentFocus::InputField(idx) if idx < self.fields.len() => Some(idx),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<WizardAction> {
        if self.message.is_some() && !self.is_busy {
            self.message = None;
        }

        if let Some(action) = self.confirm_action {
            self.handle_confirm_key(key, action);
            self.after_input();
            return None;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            self.after_input();
            return None;
        }

        let result = match self.vim_mode {
            VimMode::Normal => self.handle_normal_mode(key),
            VimMode::Insert => self.handle_insert_mode(key),
            VimMode::Command => self.handle_command_mode(key),
        };

        self.after_input();
        result
    }

    /// Rebuild step content when the store moved underneath us
    fn after_input(&mut self) {
        if self.vim_mode != VimMode::Insert {
            self.sync_step_content();
        }
        self.update_status_bar();
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<WizardAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('h') => self.focus_sidebar(),
                KeyCode::Char('l') => self.focus_content(),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char(':') => {
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterCommand);
                self.command_buffer.clear();
            }

            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.navigate_down(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.navigate_up(),

            KeyCode::Char('i') | KeyCode::Char('a') => self.enter_insert(),

            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if self.panel_focus == PanelFocus::Sidebar {
                    self.focus_content();
                } else {
                    return self.handle_enter();
                }
            }

            KeyCode::Char('h') | KeyCode::Left | KeyCode::Esc => self.focus_sidebar(),

            KeyCode::Char(' ') => {
                if self.panel_focus == PanelFocus::Content && self.step() == StepId::StackSelection {
                    self.toggle_service_at_cursor();
                }
            }

            KeyCode::Char('m') => {
                if self.step() == StepId::Advanced {
                    let next = match self.store.storage_mode() {
                        StorageMode::Simple => StorageMode::Advanced,
                        StorageMode::Advanced => StorageMode::Simple,
                    };
                    self.store.set_storage_mode(next);
                    self.set_info(format!("Storage mode: {}", next.label()));
                }
            }

            KeyCode::Char('n') => self.advance(),
            KeyCode::Char('b') => self.go_back(),

            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,

            _ => {}
        }
        None
    }

    fn handle_insert_mode(&mut self, key: KeyEvent) -> Option<WizardAction> {
        let Some(idx) = self.focused_field() else {
            self.vim_mode = VimMode::Normal;
            return None;
        };

        match key.code {
            KeyCode::Esc => self.leave_insert(),
            KeyCode::Enter => {
                self.commit_field(idx);
                if idx + 1 < self.fields.len() {
                    self.content_focus = ContentFocus::InputField(idx + 1);
                    self.sync_step_content();
                } else {
                    self.leave_insert();
                }
            }
            KeyCode::Tab => {
                self.commit_field(idx);
                self.sync_step_content();
                if idx + 1 < self.fields.len() {
                    self.content_focus = ContentFocus::InputField(idx + 1);
                }
            }
            KeyCode::BackTab => {
                self.commit_field(idx);
                self.sync_step_content();
                if idx > 0 {
                    self.content_focus = ContentFocus::InputField(idx - 1);
                }
            }
            code => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                if let Some(field) = self.fields.get_mut(idx) {
                    let buffer = &mut field.buffer;
                    match code {
                        KeyCode::Backspace => {
                            buffer.delete_back();
                        }
                        KeyCode::Delete => {
                            buffer.delete_forward();
                        }
                        KeyCode::Left => buffer.move_left(),
                        KeyCode::Right => buffer.move_right(),
                        KeyCode::Home => buffer.move_start(),
                        KeyCode::End => buffer.move_end(),
                        KeyCode::Char('u') if ctrl => buffer.clear(),
                        KeyCode::Char('a') if ctrl => buffer.move_start(),
                        KeyCode::Char('e') if ctrl => buffer.move_end(),
                        KeyCode::Char(c) if !ctrl => buffer.insert(c),
                        _ => {}
                    }
                }
            }
        }
        None
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<WizardAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let cmd = self.command_buffer.content().to_string();
                self.vim_mode = self.vim_mode.transition(ModeAction::Execute);
                self.command_buffer.clear();
                return self.run_command_line(&cmd);
            }
            KeyCode::Backspace => {
                if self.command_buffer.is_empty() {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                } else {
                    self.command_buffer.delete_back();
                }
            }
            KeyCode::Left => self.command_buffer.move_left(),
            KeyCode::Right => self.command_buffer.move_right(),
            KeyCode::Char(c) => self.command_buffer.insert(c),
            _ => {}
        }
        None
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, action: ConfirmAction) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm_action = None;
                match action {
                    ConfirmAction::Reset => {
                        info!("Resetting wizard");
                        self.store.reset_wizard();
                        self.list_cursor = 0;
                        self.written_files.clear();
                        self.set_info("Wizard reset. Saved profiles were kept.".to_string());
                    }
                    ConfirmAction::Quit => self.should_exit = true,
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_action = None;
            }
            _ => {}
        }
    }

    pub fn run_command_line(&mut self, line: &str) -> Option<WizardAction> {
        match parse_command(line) {
            Ok(command) => self.execute_command(command),
            Err(e) => {
                self.set_error(e.to_string());
                None
            }
        }
    }

    pub fn execute_command(&mut self, command: Command) -> Option<WizardAction> {
        debug!("command {:?}", command);
        match command {
            Command::Next => self.advance(),
            Command::Back => self.go_back(),
            Command::Reset => self.confirm_action = Some(ConfirmAction::Reset),
            Command::Mode(mode) => {
                self.store.set_mode(mode);
                self.set_info(format!("Mode: {}", mode.label()));
            }
            Command::Storage(mode) => {
                self.store.set_storage_mode(mode);
                self.set_info(format!("Storage mode: {}", mode.label()));
            }
            Command::Template(id) => match template(&id) {
                Some(t) => {
                    t.apply(&mut self.store);
                    self.set_info(format!("Loaded template {}", t.name));
                }
                None => self.set_error(format!("Unknown template: {id}")),
            },
            Command::Save(name) => {
                self.store.save_profile(&name);
                self.set_info(format!("Saved profile {name}"));
            }
            Command::Load(name) => {
                if self.store.load_profile(&name) {
                    self.set_info(format!("Loaded profile {name}"));
                } else {
                    self.set_error(format!("No profile named {name}"));
                }
            }
            Command::Delete(name) => {
                if self.store.saved_profiles().contains_key(&name) {
                    self.store.delete_profile(&name);
                    self.set_info(format!("Deleted profile {name}"));
                } else {
                    self.set_error(format!("No profile named {name}"));
                }
            }
            Command::Export(path) => return Some(WizardAction::Export(path)),
            Command::Import(path) => return Some(WizardAction::Import(path)),
            Command::Bootstrap => return Some(WizardAction::Bootstrap),
            Command::Write => return Some(WizardAction::WriteArtifacts),
            Command::Help => self.show_help = true,
            Command::Quit => self.confirm_action = Some(ConfirmAction::Quit),
        }
        None
    }

    fn handle_enter(&mut self) -> Option<WizardAction> {
        match self.step() {
            StepId::Welcome => {
                if let Some(choice) = WelcomeChoice::all().get(self.list_cursor) {
                    choice.apply(&mut self.store);
                    self.advance();
                }
            }
            StepId::StackSelection => self.toggle_service_at_cursor(),
            StepId::Review => return Some(WizardAction::WriteArtifacts),
            StepId::BasicConfig | StepId::ServiceConfig | StepId::Advanced => {
                if self.fields.is_empty() {
                    self.advance();
                } else {
                    self.enter_insert();
                }
            }
        }
        None
    }

    fn toggle_service_at_cursor(&mut self) {
        if let Some(service) = SERVICES.get(self.list_cursor) {
            self.store.toggle_service(service.id);
        }
    }

    /// Problems that keep the current step from moving on
    pub fn step_errors(&self) -> Vec<FieldError> {
        match self.step() {
            StepId::Welcome if self.store.mode().is_none() => vec![FieldError {
                field: "mode",
                message: "Choose a mode or a template first".to_string(),
            }],
            StepId::BasicConfig => validate_basic(self.store.config()),
            StepId::StackSelection => validate_selection(self.store.selected_services()),
            _ => Vec::new(),
        }
    }

    /// Move to the next step when the current one validates
    pub fn advance(&mut self) {
        if self.store.current_step() >= LAST_STEP {
            return;
        }
        let errors = self.step_errors();
        if let Some(first) = errors.first() {
            let more = if errors.len() > 1 {
                format!(" (+{} more)", errors.len() - 1)
            } else {
                String::new()
            };
            self.set_error(format!("{}{more}", first.message));
            return;
        }
        self.store.next_step();
    }

    pub fn go_back(&mut self) {
        self.store.prev_step();
    }

    fn enter_insert(&mut self) {
        if self.panel_focus != PanelFocus::Content || self.fields.is_empty() {
            return;
        }
        if self.focused_field().is_none() {
            self.content_focus = ContentFocus::InputField(0);
        }
        self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
    }

    fn leave_insert(&mut self) {
        if let Some(idx) = self.focused_field() {
            self.commit_field(idx);
        }
        self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
    }

    /// Invalid advanced settings are reported and not stored
    fn commit_field(&mut self, idx: usize) {
        let Some(field) = self.fields.get(idx) else {
            return;
        };
        if field.key == FieldKey::WireguardAddresses {
            if let Some(error) = validate_advanced(field.buffer.content()).into_iter().next() {
                self.set_error(error.message);
                return;
            }
        }
        field.commit(&mut self.store);
    }

    fn focus_sidebar(&mut self) {
        self.panel_focus = PanelFocus::Sidebar;
    }

    fn focus_content(&mut self) {
        self.panel_focus = PanelFocus::Content;
        self.content_focus = self.default_content_focus();
    }

    fn default_content_focus(&self) -> ContentFocus {
        if self.list_len() > 0 {
            ContentFocus::List
        } else if !self.fields.is_empty() {
            ContentFocus::InputField(0)
        } else {
            ContentFocus::None
        }
    }

    fn navigate_down(&mut self) {
        match self.panel_focus {
            PanelFocus::Sidebar => self.advance(),
            PanelFocus::Content => match self.content_focus {
                ContentFocus::List => {
                    if self.list_cursor + 1 < self.list_len() {
                        self.list_cursor += 1;
                    }
                }
                ContentFocus::InputField(idx) => {
                    if idx + 1 < self.fields.len() {
                        self.content_focus = ContentFocus::InputField(idx + 1);
                    }
                }
                ContentFocus::None => {}
            },
        }
    }

    fn navigate_up(&mut self) {
        match self.panel_focus {
            PanelFocus::Sidebar => self.go_back(),
            PanelFocus::Content => match self.content_focus {
                ContentFocus::List => self.list_cursor = self.list_cursor.saturating_sub(1),
                ContentFocus::InputField(idx) => {
                    self.content_focus = ContentFocus::InputField(idx.saturating_sub(1));
                }
                ContentFocus::None => {}
            },
        }
    }

    /// Reload the content panel for a new step, or refresh the field
    /// values for the same one
    fn sync_step_content(&mut self) {
        if self.store.current_step() != self.shown_step {
            self.shown_step = self.store.current_step();
            self.load_step_content();
        } else {
            self.fields = build_fields(self.step(), &self.store);
            if self.focused_field().is_none() && !self.fields.is_empty() {
                if let ContentFocus::InputField(_) = self.content_focus {
                    self.content_focus = ContentFocus::InputField(self.fields.len() - 1);
                }
            }
            if self.list_cursor >= self.list_len() {
                self.list_cursor = self.list_len().saturating_sub(1);
            }
        }
    }

    fn load_step_content(&mut self) {
        self.list_cursor = 0;
        self.fields = build_fields(self.step(), &self.store);
        self.content_focus = self.default_content_focus();
        if self.step() == StepId::Review {
            self.request_compose_listing();
        }
    }

    // --- control server ---

    fn request_compose_listing(&mut self) {
        if self.control.is_offline() || tokio::runtime::Handle::try_current().is_err() {
            return;
        }
        let control = self.control.clone();
        let tx = self.control_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(ControlMessage::ComposeListing(control.compose_services().await));
        });
    }

    fn spawn_health_check(&mut self) {
        self.health_in_flight = true;
        self.ticks_since_health = 0;
        let control = self.control.clone();
        let tx = self.control_tx.clone();
        tokio::spawn(async move {
            let online = match control.health().await {
                Ok(online) => online,
                Err(e) => {
                    debug!("Health check failed: {}", e);
                    false
                }
            };
            let _ = tx.send(ControlMessage::Health(online));
        });
    }

    /// Ask the control server for the *arr API keys
    pub fn start_bootstrap(&mut self) {
        if self.is_busy {
            self.set_error("A bootstrap request is already running".to_string());
            return;
        }
        info!("Requesting *arr bootstrap");
        self.is_busy = true;
        self.set_info("Fetching API keys from the control server...".to_string());
        let control = self.control.clone();
        let tx = self.control_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(ControlMessage::Bootstrapped(control.bootstrap_arr().await));
        });
    }

    pub fn handle_control_message(&mut self, msg: ControlMessage) {
        match msg {
            ControlMessage::Health(online) => {
                self.health_in_flight = false;
                if self.control_online != Some(online) {
                    info!("Control server {}", if online { "online" } else { "offline" });
                }
                self.control_online = Some(online);
            }
            ControlMessage::Bootstrapped(Ok(result)) => {
                self.is_busy = false;
                if result.success && !result.keys.is_empty() {
                    self.store.store_arr_api_keys(&result.keys);
                    self.set_info(format!("Stored {} API key(s)", result.keys.len()));
                } else if result.success {
                    self.set_info("Bootstrap finished; no API keys were returned".to_string());
                } else {
                    let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
                    warn!("Bootstrap failed: {}", reason);
                    self.set_error(format!("Bootstrap failed: {reason}"));
                }
            }
            ControlMessage::Bootstrapped(Err(e)) => {
                self.is_busy = false;
                warn!("Bootstrap request failed: {}", e);
                self.set_error(format!("Bootstrap failed: {e}"));
            }
            ControlMessage::ComposeListing(Ok(services)) => {
                debug!("Control server knows {} services", services.len());
                self.compose_listing = Some(services);
            }
            ControlMessage::ComposeListing(Err(e)) => {
                debug!("Compose listing unavailable: {}", e);
                self.compose_listing = None;
            }
        }
    }

    // --- files ---

    pub fn write_artifacts(&mut self) {
        let errors: Vec<FieldError> = validate_basic(self.store.config())
            .into_iter()
            .chain(validate_selection(self.store.selected_services()))
            .collect();
        if let Some(first) = errors.first() {
            self.set_error(format!("Cannot write files: {}", first.message));
            return;
        }

        let dir = self.settings.output.directory.clone();
        match render::write_bundle(&dir, &self.store) {
            Ok(written) => {
                self.set_info(format!("Wrote {} files to {}", written.len(), dir.display()));
                self.written_files = written;
            }
            Err(e) => {
                warn!("Writing artifacts failed: {}", e);
                self.set_error(format!("Writing files failed: {e}"));
            }
        }
    }

    pub fn export_to(&mut self, path: &Path) {
        let result = self
            .store
            .export_config()
            .and_then(|json| write_atomic(path, json.as_bytes()).map_err(WizardError::from));
        match result {
            Ok(()) => {
                info!("Exported configuration to {:?}", path);
                self.set_info(format!("Exported to {} (contains secrets)", path.display()));
            }
            Err(e) => self.set_error(format!("Export failed: {e}")),
        }
    }

    pub fn import_from(&mut self, path: &Path) {
        let result = std::fs::read_to_string(path)
            .map_err(WizardError::from)
            .and_then(|data| self.store.import_json(&data));
        match result {
            Ok(()) => self.set_info(format!("Imported {}", path.display())),
            Err(e) => {
                warn!("Import of {:?} failed: {}", path, e);
                self.set_error(format!("Import failed: {e}"));
            }
        }
        self.sync_step_content();
    }

    pub fn perform(&mut self, action: WizardAction) {
        match action {
            WizardAction::Bootstrap => self.start_bootstrap(),
            WizardAction::WriteArtifacts => self.write_artifacts(),
            WizardAction::Export(path) => self.export_to(&path),
            WizardAction::Import(path) => self.import_from(&path),
        }
        self.sync_step_content();
        self.update_status_bar();
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: true,
        });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: false,
        });
    }

    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 4;

        while let Ok(msg) = self.control_rx.try_recv() {
            self.handle_control_message(msg);
        }

        if !self.control.is_offline() && !self.health_in_flight {
            self.ticks_since_health = self.ticks_since_health.saturating_add(1);
            if self.ticks_since_health >= self.settings.control.health_interval_ticks {
                self.spawn_health_check();
            }
        }

        if self.vim_mode != VimMode::Insert {
            self.sync_step_content();
        }
        self.update_status_bar();
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
        SPINNER[self.spinner_frame]
    }

    pub fn update_status_bar(&mut self) {
        if self.is_busy {
            self.status_bar = StatusBarState::busy();
            return;
        }

        if self.vim_mode == VimMode::Command {
            self.status_bar = StatusBarState::command_mode();
            return;
        }

        self.status_bar = match self.panel_focus {
            PanelFocus::Sidebar => StatusBarState::sidebar_normal(),
            PanelFocus::Content => self.content_status_bar(),
        };
    }

    fn content_status_bar(&self) -> StatusBarState {
        if self.vim_mode == VimMode::Insert {
            return StatusBarState::form_insert();
        }
        match self.step() {
            StepId::Welcome => StatusBarState::list_normal(),
            StepId::StackSelection => StatusBarState::selection_normal(),
            StepId::BasicConfig | StepId::ServiceConfig => StatusBarState::form_normal(),
            StepId::Advanced => {
                StatusBarState::storage_normal(self.store.storage_mode() == StorageMode::Advanced)
            }
            StepId::Review => StatusBarState::review_step(),
        }
    }
}
