//! Single-consumer input queue around an [`EventFormController`].
//!
//! Inputs are applied strictly one at a time: an input's mutation and the
//! revalidation that follows complete before the next input is dequeued. Each
//! processed input publishes a fresh [`FormSnapshot`].

use std::sync::Arc;

use shared::{domain::EventType, error::SubmissionError};
use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    controller::{EventFormController, FormSnapshot, SubmitOutcome},
    EventSubmitter, ImagePicker, MediaRequest,
};

const INPUT_QUEUE_CAPACITY: usize = 64;

/// User intent coming from the rendered screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    SetName(String),
    SetLocation(String),
    SetDescription(String),
    SetPrice(String),
    SetLink(String),
    OpenTypeSelector,
    DismissTypeSelector,
    SetType(EventType),
    FocusDate,
    ConfirmDate(String),
    DismissDate,
    FocusStartTime,
    ConfirmStartTime(String),
    CancelStartTime,
    FocusEndTime,
    ConfirmEndTime(String),
    CancelEndTime,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("create-event session is closed")]
    Closed,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

enum SessionMessage {
    Input(FormInput),
    PickImage,
    ImagePicked(Option<String>),
    Submit(oneshot::Sender<Result<SubmitOutcome, SubmissionError>>),
    Sync(oneshot::Sender<FormSnapshot>),
    Close,
}

impl EventFormController {
    pub fn apply(&mut self, input: FormInput) {
        match input {
            FormInput::SetName(text) => self.set_name(text),
            FormInput::SetLocation(text) => self.set_location(text),
            FormInput::SetDescription(text) => self.set_description(text),
            FormInput::SetPrice(text) => self.set_price(text),
            FormInput::SetLink(text) => self.set_link(text),
            FormInput::OpenTypeSelector => self.open_type_selector(),
            FormInput::DismissTypeSelector => self.dismiss_type_selector(),
            FormInput::SetType(event_type) => self.set_type(event_type),
            FormInput::FocusDate => self.on_date_focus_requested(),
            FormInput::ConfirmDate(text) => self.confirm_date(text),
            FormInput::DismissDate => self.dismiss_date_picker(),
            FormInput::FocusStartTime => self.on_start_time_focus_requested(),
            FormInput::ConfirmStartTime(text) => self.confirm_start_time(text),
            FormInput::CancelStartTime => self.cancel_start_time_picker(),
            FormInput::FocusEndTime => self.on_end_time_focus_requested(),
            FormInput::ConfirmEndTime(text) => self.confirm_end_time(text),
            FormInput::CancelEndTime => self.cancel_end_time_picker(),
        }
    }
}

#[derive(Clone)]
pub struct FormSessionHandle {
    messages: mpsc::Sender<SessionMessage>,
    snapshots: watch::Receiver<FormSnapshot>,
}

impl FormSessionHandle {
    pub async fn send(&self, input: FormInput) -> Result<(), SessionError> {
        self.dispatch(SessionMessage::Input(input)).await
    }

    /// Launches the image picker. The result is queued like any other input
    /// once the picker resolves.
    pub async fn pick_image(&self) -> Result<(), SessionError> {
        self.dispatch(SessionMessage::PickImage).await
    }

    pub async fn submit(&self) -> Result<SubmitOutcome, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.dispatch(SessionMessage::Submit(reply_tx)).await?;
        let outcome = reply_rx.await.map_err(|_| SessionError::Closed)?;
        Ok(outcome?)
    }

    /// Waits until every input queued before this call has been applied.
    pub async fn sync(&self) -> Result<FormSnapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.dispatch(SessionMessage::Sync(reply_tx)).await?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn close(&self) -> Result<(), SessionError> {
        self.dispatch(SessionMessage::Close).await
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.snapshots.clone()
    }

    async fn dispatch(&self, message: SessionMessage) -> Result<(), SessionError> {
        self.messages
            .send(message)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

/// Moves `controller` onto its own task. The task ends on
/// [`FormSessionHandle::close`] or once every handle is dropped, and yields
/// the disposed controller.
pub fn spawn_form_session(
    controller: EventFormController,
    picker: Arc<dyn ImagePicker>,
    submitter: Arc<dyn EventSubmitter>,
) -> (FormSessionHandle, JoinHandle<EventFormController>) {
    let (messages_tx, messages_rx) = mpsc::channel(INPUT_QUEUE_CAPACITY);
    let (snapshots_tx, snapshots_rx) = watch::channel(controller.snapshot());
    let picker_results = messages_tx.downgrade();

    let task = tokio::spawn(run_session(
        controller,
        messages_rx,
        picker_results,
        snapshots_tx,
        picker,
        submitter,
    ));

    (
        FormSessionHandle {
            messages: messages_tx,
            snapshots: snapshots_rx,
        },
        task,
    )
}

async fn run_session(
    mut controller: EventFormController,
    mut messages: mpsc::Receiver<SessionMessage>,
    picker_results: mpsc::WeakSender<SessionMessage>,
    snapshots: watch::Sender<FormSnapshot>,
    picker: Arc<dyn ImagePicker>,
    submitter: Arc<dyn EventSubmitter>,
) -> EventFormController {
    let draft_id = controller.draft_id();
    info!(%draft_id, "create-event session started");

    while let Some(message) = messages.recv().await {
        match message {
            SessionMessage::Input(input) => controller.apply(input),
            SessionMessage::PickImage => {
                if controller.begin_image_pick() {
                    spawn_image_pick(picker.clone(), picker_results.clone(), draft_id);
                }
            }
            SessionMessage::ImagePicked(uri) => controller.apply_picked_image(uri),
            SessionMessage::Submit(reply) => {
                let outcome = controller.submit(submitter.as_ref()).await;
                let _ = reply.send(outcome);
            }
            SessionMessage::Sync(reply) => {
                let _ = reply.send(controller.snapshot());
                continue;
            }
            SessionMessage::Close => break,
        }
        snapshots.send_replace(controller.snapshot());
    }

    controller.dispose();
    snapshots.send_replace(controller.snapshot());
    info!(%draft_id, "create-event session closed");
    controller
}

fn spawn_image_pick(
    picker: Arc<dyn ImagePicker>,
    results: mpsc::WeakSender<SessionMessage>,
    draft_id: uuid::Uuid,
) {
    tokio::spawn(async move {
        // A picker that panics still reports back, as a cancelled pick, so
        // the in-flight flag is released.
        let pick = tokio::spawn(async move { picker.pick(MediaRequest::images()).await });
        let picked = match pick.await {
            Ok(picked) => picked,
            Err(err) => {
                warn!(%draft_id, "image picker failed: {err}");
                None
            }
        };
        let Some(results) = results.upgrade() else {
            debug!(%draft_id, "image pick resolved after session closed; dropped");
            return;
        };
        if results
            .send(SessionMessage::ImagePicked(picked))
            .await
            .is_err()
        {
            debug!(%draft_id, "image pick resolved after session closed; dropped");
        }
    });
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
