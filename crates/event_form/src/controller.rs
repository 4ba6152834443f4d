use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::{
    domain::{DraftField, EventType},
    error::SubmissionError,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    draft::DraftEvent,
    pickers::{self, DatePickerConfig, FocusTarget, PickerKind, TimePickerConfig},
    validation, EventSubmitter, ImagePicker, MediaRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOptions {
    /// Distance from screen entry to the date the date picker starts on.
    pub proposed_date_offset: Duration,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            proposed_date_offset: Duration::days(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    NotSubmittable,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Submitted,
    Ignored(IgnoreReason),
}

/// Everything a renderer needs to draw the screen at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub draft_id: Uuid,
    pub draft: DraftEvent,
    pub submittable: bool,
    pub failing_fields: Vec<DraftField>,
    pub open_picker: Option<PickerKind>,
    pub focused: Option<FocusTarget>,
    pub type_selector_expanded: bool,
    pub image_pick_pending: bool,
    pub proposed_date: DateTime<Utc>,
    pub disposed: bool,
}

/// Owns the draft for the lifetime of one create-event screen.
///
/// Every mutating operation ends by re-running the full validation gate, so
/// [`EventFormController::is_submittable`] always reflects the current draft.
/// After [`EventFormController::dispose`] all operations are ignored.
pub struct EventFormController {
    draft_id: Uuid,
    draft: DraftEvent,
    submittable: bool,
    open_picker: Option<PickerKind>,
    focused: Option<FocusTarget>,
    type_selector_expanded: bool,
    image_pick_pending: bool,
    proposed_date: DateTime<Utc>,
    disposed: bool,
}

impl Default for EventFormController {
    fn default() -> Self {
        Self::new(FormOptions::default())
    }
}

impl EventFormController {
    pub fn new(options: FormOptions) -> Self {
        Self::starting_at(Utc::now(), options)
    }

    pub fn starting_at(now: DateTime<Utc>, options: FormOptions) -> Self {
        let draft = DraftEvent::default();
        let submittable = validation::compute_submittable(&draft);
        let controller = Self {
            draft_id: Uuid::new_v4(),
            draft,
            submittable,
            open_picker: None,
            focused: None,
            type_selector_expanded: false,
            image_pick_pending: false,
            proposed_date: pickers::proposed_date(now, options.proposed_date_offset),
            disposed: false,
        };
        debug!(draft_id = %controller.draft_id, proposed_date = %controller.proposed_date, "create-event form opened");
        controller
    }

    pub fn draft_id(&self) -> Uuid {
        self.draft_id
    }

    pub fn draft(&self) -> &DraftEvent {
        &self.draft
    }

    pub fn is_submittable(&self) -> bool {
        self.submittable
    }

    pub fn failing_fields(&self) -> Vec<DraftField> {
        validation::failing_fields(&self.draft)
    }

    pub fn open_picker(&self) -> Option<PickerKind> {
        self.open_picker
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        self.focused
    }

    pub fn is_type_selector_expanded(&self) -> bool {
        self.type_selector_expanded
    }

    pub fn is_image_pick_pending(&self) -> bool {
        self.image_pick_pending
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Seed for the date picker cursor. Never written into the draft.
    pub fn proposed_date(&self) -> DateTime<Utc> {
        self.proposed_date
    }

    pub fn date_picker_config(&self) -> DatePickerConfig {
        DatePickerConfig {
            initial_selection: self.proposed_date,
        }
    }

    pub fn time_picker_config(&self) -> TimePickerConfig {
        TimePickerConfig::default()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            draft_id: self.draft_id,
            draft: self.draft.clone(),
            submittable: self.submittable,
            failing_fields: self.failing_fields(),
            open_picker: self.open_picker,
            focused: self.focused,
            type_selector_expanded: self.type_selector_expanded,
            image_pick_pending: self.image_pick_pending,
            proposed_date: self.proposed_date,
            disposed: self.disposed,
        }
    }

    pub fn set_name(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.mutate("set_name", |draft| draft.name = text);
    }

    pub fn set_location(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.mutate("set_location", |draft| draft.location = text);
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.mutate("set_description", |draft| draft.description = text);
    }

    pub fn set_price(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.mutate("set_price", |draft| draft.price = text);
    }

    pub fn set_link(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.mutate("set_link", |draft| draft.link = text);
    }

    /// Focus landed on the read-only type field.
    pub fn open_type_selector(&mut self) {
        if self.ignored_after_dispose("open_type_selector") {
            return;
        }
        self.focused = Some(FocusTarget::Type);
        self.type_selector_expanded = true;
    }

    pub fn dismiss_type_selector(&mut self) {
        if self.ignored_after_dispose("dismiss_type_selector") {
            return;
        }
        self.type_selector_expanded = false;
        self.focused = None;
    }

    pub fn set_type(&mut self, event_type: EventType) {
        if self.mutate("set_type", |draft| draft.event_type = Some(event_type)) {
            self.type_selector_expanded = false;
            self.focused = None;
        }
    }

    pub fn on_date_focus_requested(&mut self) {
        self.request_picker(PickerKind::Date);
    }

    pub fn confirm_date(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.confirm_picker(PickerKind::Date, text);
    }

    /// The date dialog was dismissed without a selection.
    pub fn dismiss_date_picker(&mut self) {
        self.close_picker(PickerKind::Date);
    }

    pub fn on_start_time_focus_requested(&mut self) {
        self.request_picker(PickerKind::StartTime);
    }

    pub fn confirm_start_time(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.confirm_picker(PickerKind::StartTime, text);
    }

    pub fn cancel_start_time_picker(&mut self) {
        self.close_picker(PickerKind::StartTime);
    }

    pub fn on_end_time_focus_requested(&mut self) {
        self.request_picker(PickerKind::EndTime);
    }

    pub fn confirm_end_time(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.confirm_picker(PickerKind::EndTime, text);
    }

    pub fn cancel_end_time_picker(&mut self) {
        self.close_picker(PickerKind::EndTime);
    }

    /// Marks an image pick as in flight. Returns `false` when the pick should
    /// not be launched: the form is disposed or a pick is already running.
    pub fn begin_image_pick(&mut self) -> bool {
        if self.ignored_after_dispose("pick_image") {
            return false;
        }
        if self.image_pick_pending {
            debug!(draft_id = %self.draft_id, "image pick already in flight");
            return false;
        }
        self.image_pick_pending = true;
        true
    }

    /// Delivers the picker's answer. `None` leaves the current image in place.
    pub fn apply_picked_image(&mut self, uri: Option<String>) {
        if self.ignored_after_dispose("apply_picked_image") {
            return;
        }
        self.image_pick_pending = false;
        match uri {
            Some(uri) => {
                self.mutate("apply_picked_image", |draft| draft.image_uri = uri);
            }
            None => debug!(draft_id = %self.draft_id, "image pick cancelled"),
        }
    }

    pub async fn pick_image(&mut self, picker: &dyn ImagePicker) {
        if !self.begin_image_pick() {
            return;
        }
        let picked = picker.pick(MediaRequest::images()).await;
        self.apply_picked_image(picked);
    }

    pub async fn submit(
        &mut self,
        sink: &dyn EventSubmitter,
    ) -> Result<SubmitOutcome, SubmissionError> {
        if self.disposed {
            warn!(draft_id = %self.draft_id, "submit on disposed form ignored");
            return Ok(SubmitOutcome::Ignored(IgnoreReason::Disposed));
        }
        if !self.submittable {
            warn!(
                draft_id = %self.draft_id,
                failing = ?self.failing_fields(),
                "submit rejected: draft is not submittable"
            );
            return Ok(SubmitOutcome::Ignored(IgnoreReason::NotSubmittable));
        }

        info!(draft_id = %self.draft_id, name = %self.draft.name, "submitting event draft");
        sink.submit(&self.draft).await?;
        info!(draft_id = %self.draft_id, "event draft submitted");
        Ok(SubmitOutcome::Submitted)
    }

    /// The owning screen is gone. Later operations become no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.open_picker = None;
        self.focused = None;
        self.type_selector_expanded = false;
        self.image_pick_pending = false;
        debug!(draft_id = %self.draft_id, "create-event form disposed");
    }

    fn request_picker(&mut self, kind: PickerKind) {
        if self.ignored_after_dispose("request_picker") {
            return;
        }
        if let Some(open) = self.open_picker.filter(|open| *open != kind) {
            debug!(draft_id = %self.draft_id, requested = ?kind, ?open, "another picker is open");
            return;
        }
        self.focused = Some(kind.into());
        self.open_picker = Some(kind);
        self.type_selector_expanded = false;
        debug!(draft_id = %self.draft_id, picker = ?kind, "picker opened");
    }

    fn confirm_picker(&mut self, kind: PickerKind, text: String) {
        if let Some(open) = self.open_picker.filter(|open| *open != kind) {
            debug!(
                draft_id = %self.draft_id,
                confirmed = ?kind,
                ?open,
                "confirm ignored while another picker is open"
            );
            return;
        }
        let applied = self.mutate("confirm_picker", |draft| match kind {
            PickerKind::Date => draft.date = text,
            PickerKind::StartTime => draft.start_time = text,
            PickerKind::EndTime => draft.end_time = text,
        });
        if applied {
            if self.open_picker == Some(kind) {
                self.open_picker = None;
            }
            self.focused = None;
        }
    }

    fn close_picker(&mut self, kind: PickerKind) {
        if self.ignored_after_dispose("close_picker") {
            return;
        }
        if self.open_picker == Some(kind) {
            self.open_picker = None;
            debug!(draft_id = %self.draft_id, picker = ?kind, "picker closed without selection");
        }
    }

    fn mutate(&mut self, op: &'static str, apply: impl FnOnce(&mut DraftEvent)) -> bool {
        if self.ignored_after_dispose(op) {
            return false;
        }
        apply(&mut self.draft);
        self.recompute();
        debug!(draft_id = %self.draft_id, op, submittable = self.submittable, "draft updated");
        true
    }

    fn recompute(&mut self) {
        self.submittable = validation::compute_submittable(&self.draft);
    }

    fn ignored_after_dispose(&self, op: &'static str) -> bool {
        if self.disposed {
            warn!(draft_id = %self.draft_id, op, "operation on disposed form ignored");
        }
        self.disposed
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
