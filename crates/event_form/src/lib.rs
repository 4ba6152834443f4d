//! Headless core of the create-event screen: draft state, validation gate,
//! picker wiring and the input queue that drives them.

use async_trait::async_trait;
use shared::error::SubmissionError;

pub mod controller;
pub mod draft;
pub mod navigation;
pub mod pickers;
pub mod session;
pub mod validation;

pub use controller::{EventFormController, FormOptions, FormSnapshot, IgnoreReason, SubmitOutcome};
pub use draft::{DraftEvent, TIME_PLACEHOLDER};
pub use session::{spawn_form_session, FormInput, FormSessionHandle, SessionError};

pub const IMAGE_MIME_TYPE: &str = "image/*";

/// What the platform media picker is asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    pub mime_type: &'static str,
}

impl MediaRequest {
    pub fn images() -> Self {
        Self {
            mime_type: IMAGE_MIME_TYPE,
        }
    }
}

/// Single-shot platform media picker. `None` means the user backed out.
#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn pick(&self, request: MediaRequest) -> Option<String>;
}

/// Accepts a fully valid draft for creation.
#[async_trait]
pub trait EventSubmitter: Send + Sync {
    async fn submit(&self, draft: &DraftEvent) -> Result<(), SubmissionError>;
}

/// Picker used when the platform offers no media access.
pub struct NoImagePicker;

#[async_trait]
impl ImagePicker for NoImagePicker {
    async fn pick(&self, _request: MediaRequest) -> Option<String> {
        None
    }
}

/// Event creation is not wired to any backend yet.
pub struct UnavailableSubmitter;

#[async_trait]
impl EventSubmitter for UnavailableSubmitter {
    async fn submit(&self, draft: &DraftEvent) -> Result<(), SubmissionError> {
        Err(SubmissionError::unavailable(format!(
            "event creation backend unavailable for '{}'",
            draft.name
        )))
    }
}
