use serde::{Deserialize, Serialize};

/// Which of the two templates an invocation renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Empty method bodies for a hand-written implementation
    Stub,
    /// Overridable, call-counting implementation for tests
    Mock,
}

impl GenerationMode {
    pub fn from_mock_flag(mock: bool) -> Self {
        if mock {
            GenerationMode::Mock
        } else {
            GenerationMode::Stub
        }
    }

    /// Suffix appended to the interface name for the default receiver
    pub fn receiver_suffix(self) -> &'static str {
        match self {
            GenerationMode::Stub => "Gen",
            GenerationMode::Mock => "Mock",
        }
    }

    /// Receiver used when none is configured, e.g. `*ReaderMock`
    pub fn default_receiver(self, interface_name: &str) -> String {
        format!("*{}{}", interface_name, self.receiver_suffix())
    }
}
