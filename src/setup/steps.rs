/// Index of the last wizard step
pub const LAST_STEP: usize = 5;

/// Unique identifier for each wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    Welcome,
    BasicConfig,
    StackSelection,
    ServiceConfig,
    Advanced,
    Review,
}

impl StepId {
    pub const ALL: [StepId; LAST_STEP + 1] = [
        StepId::Welcome,
        StepId::BasicConfig,
        StepId::StackSelection,
        StepId::ServiceConfig,
        StepId::Advanced,
        StepId::Review,
    ];

    /// Step for a stored index; out-of-range indices clamp to the last step
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(LAST_STEP)]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            StepId::Welcome => "Welcome",
            StepId::BasicConfig => "Basics",
            StepId::StackSelection => "Stack",
            StepId::ServiceConfig => "Services",
            StepId::Advanced => "Advanced",
            StepId::Review => "Review",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StepId::Welcome => "Welcome",
            StepId::BasicConfig => "Basic Configuration",
            StepId::StackSelection => "Stack Selection",
            StepId::ServiceConfig => "Service Configuration",
            StepId::Advanced => "Advanced Settings",
            StepId::Review => "Review & Generate",
        }
    }
}
