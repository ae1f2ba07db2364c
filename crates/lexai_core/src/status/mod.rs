use serde::Serialize;

use crate::domain::DocumentStatus;

/// Actions enabled for a document in a given status.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusActions {
    pub can_view: bool,
    pub can_download: bool,
    pub can_delete: bool,
    pub can_analyze: bool,
}

/// Derive the enabled actions from a document status.
///
/// Viewing needs extracted content, which only exists after successful processing.
/// Everything else works on the stored artifact. Failed documents may be analyzed again.
pub fn status_gate(status: DocumentStatus) -> StatusActions {
    match status {
        DocumentStatus::Pending | DocumentStatus::Processing => StatusActions {
            can_view: false,
            can_download: true,
            can_delete: true,
            can_analyze: false,
        },
        DocumentStatus::Processed => StatusActions {
            can_view: true,
            can_download: true,
            can_delete: true,
            can_analyze: true,
        },
        DocumentStatus::Failed => StatusActions {
            can_view: false,
            can_download: true,
            can_delete: true,
            can_analyze: true,
        },
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Warning,
    Info,
    Success,
    Danger,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: BadgeTone,
    pub animated: bool,
}

pub fn status_badge(status: DocumentStatus) -> StatusBadge {
    match status {
        DocumentStatus::Pending => StatusBadge {
            label: "Pending",
            tone: BadgeTone::Warning,
            animated: false,
        },
        DocumentStatus::Processing => StatusBadge {
            label: "Processing",
            tone: BadgeTone::Info,
            animated: true,
        },
        DocumentStatus::Processed => StatusBadge {
            label: "Processed",
            tone: BadgeTone::Success,
            animated: false,
        },
        DocumentStatus::Failed => StatusBadge {
            label: "Failed",
            tone: BadgeTone::Danger,
            animated: false,
        },
    }
}

impl DocumentStatus {
    /// Transition table for server-reported status changes.
    ///
    /// Forward: pending -> processing -> {processed, failed}, pending -> failed.
    /// Backward: failed -> processing (retry) and processed -> processing (re-analysis).
    /// Self-transitions are accepted since a refetch may report an unchanged status.
    pub fn can_transition_to(self, next: DocumentStatus) -> bool {
        use DocumentStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Failed)
                | (Processing, Processed)
                | (Processing, Failed)
                | (Failed, Processing)
                | (Processed, Processing)
        )
    }
}
