pub const DEFAULT_GATE_MESSAGE: &str = "You do not have enough credits to run an analysis.";

/// Prerequisite check evaluated before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditGate {
    pub available: u32,
    pub minimum: u32,
    pub message: String,
}

impl CreditGate {
    pub fn new(available: u32, minimum: u32) -> Self {
        Self {
            available,
            minimum,
            message: DEFAULT_GATE_MESSAGE.to_string(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn permits(&self) -> bool {
        self.available >= self.minimum
    }
}
