/// Hints shown either side of the mode indicator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarState {
    pub left_hint: String,
    pub right_hint: String,
}

impl StatusBarState {
    fn new(left: &str, right: &str) -> Self {
        Self {
            left_hint: left.to_string(),
            right_hint: right.to_string(),
        }
    }

    pub fn sidebar_normal() -> Self {
        Self::new("j/k: steps", "l/Enter: edit  :help")
    }

    pub fn list_normal() -> Self {
        Self::new("j/k: move  Enter: choose", "Ctrl+h: sidebar  :next")
    }

    pub fn selection_normal() -> Self {
        Self::new("j/k: move  Space: toggle", "Ctrl+h: sidebar  :next")
    }

    pub fn form_normal() -> Self {
        Self::new("j/k: fields  i: edit", "Enter: edit  :next")
    }

    pub fn form_insert() -> Self {
        Self::new("Type to enter text", "Esc: done  Tab: next field")
    }

    pub fn storage_normal(advanced: bool) -> Self {
        if advanced {
            Self::new("j/k: paths  i: edit", "m: simple storage  :next")
        } else {
            Self::new("j/k: fields  i: edit", "m: advanced storage  :next")
        }
    }

    pub fn review_step() -> Self {
        Self::new("Review your stack", "Enter: write files  :export <path>")
    }

    pub fn command_mode() -> Self {
        Self::new("", "Enter: run  Esc: cancel")
    }

    pub fn busy() -> Self {
        Self::new("Waiting for control server...", "")
    }
}
