use super::*;

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{
    sync::{Mutex, Notify},
    time::timeout,
};

use crate::{controller::IgnoreReason, DraftEvent, NoImagePicker};

const WAIT: Duration = Duration::from_secs(5);

struct FixedPicker(Option<String>);

#[async_trait]
impl ImagePicker for FixedPicker {
    async fn pick(&self, _request: MediaRequest) -> Option<String> {
        self.0.clone()
    }
}

/// Holds the pick open until the test releases it.
struct GatedPicker {
    release: Mutex<Option<oneshot::Receiver<Option<String>>>>,
    started: Arc<Notify>,
}

#[async_trait]
impl ImagePicker for GatedPicker {
    async fn pick(&self, _request: MediaRequest) -> Option<String> {
        let release = self.release.lock().await.take();
        self.started.notify_one();
        match release {
            Some(release) => release.await.ok().flatten(),
            None => None,
        }
    }
}

/// Panics on its first pick, then resolves normally.
#[derive(Default)]
struct FlakyPicker {
    calls: AtomicUsize,
}

#[async_trait]
impl ImagePicker for FlakyPicker {
    async fn pick(&self, _request: MediaRequest) -> Option<String> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("media picker crashed");
        }
        Some("img://retry".into())
    }
}

struct AcceptingSubmitter;

#[async_trait]
impl EventSubmitter for AcceptingSubmitter {
    async fn submit(&self, _draft: &DraftEvent) -> Result<(), SubmissionError> {
        Ok(())
    }
}

fn spawn_with(
    picker: Arc<dyn ImagePicker>,
) -> (FormSessionHandle, JoinHandle<EventFormController>) {
    spawn_form_session(
        EventFormController::default(),
        picker,
        Arc::new(AcceptingSubmitter),
    )
}

async fn fill(handle: &FormSessionHandle) {
    for input in [
        FormInput::SetName("Tech Meetup".into()),
        FormInput::SetLocation("Kinshasa".into()),
        FormInput::FocusDate,
        FormInput::ConfirmDate("12/05/2025".into()),
        FormInput::FocusStartTime,
        FormInput::ConfirmStartTime("10:00".into()),
        FormInput::FocusEndTime,
        FormInput::ConfirmEndTime("12:00".into()),
        FormInput::SetDescription("Annual tech gathering".into()),
        FormInput::SetPrice("0".into()),
        FormInput::OpenTypeSelector,
        FormInput::SetType(EventType::Conference),
    ] {
        handle.send(input).await.expect("send");
    }
}

#[tokio::test]
async fn inputs_are_applied_in_order() {
    let (handle, _task) = spawn_with(Arc::new(NoImagePicker));
    handle.send(FormInput::SetName("ab".into())).await.expect("send");
    handle.send(FormInput::SetName("abc".into())).await.expect("send");
    handle.send(FormInput::FocusStartTime).await.expect("send");

    let snapshot = handle.sync().await.expect("sync");
    assert_eq!(snapshot.draft.name, "abc");
    assert_eq!(
        snapshot.open_picker,
        Some(crate::pickers::PickerKind::StartTime)
    );
    assert_eq!(handle.snapshot(), snapshot);
}

#[tokio::test]
async fn picked_image_reenters_queue_and_enables_submit() {
    let (handle, _task) = spawn_with(Arc::new(FixedPicker(Some("img://abc".into()))));
    fill(&handle).await;
    assert!(!handle.sync().await.expect("sync").submittable);

    let mut updates = handle.subscribe();
    handle.pick_image().await.expect("pick");
    let snapshot = timeout(WAIT, updates.wait_for(|s| s.draft.image_uri == "img://abc"))
        .await
        .expect("pick resolved")
        .expect("session alive")
        .clone();
    assert!(snapshot.submittable);
    assert!(!snapshot.image_pick_pending);

    assert_eq!(handle.submit().await.expect("submit"), SubmitOutcome::Submitted);
}

#[tokio::test]
async fn submit_through_session_rejects_incomplete_draft() {
    let (handle, _task) = spawn_with(Arc::new(NoImagePicker));
    let outcome = handle.submit().await.expect("submit");
    assert_eq!(outcome, SubmitOutcome::Ignored(IgnoreReason::NotSubmittable));
}

#[tokio::test]
async fn unavailable_sink_error_reaches_caller() {
    let (handle, _task) = spawn_form_session(
        EventFormController::default(),
        Arc::new(FixedPicker(Some("img://abc".into()))),
        Arc::new(crate::UnavailableSubmitter),
    );
    fill(&handle).await;
    let mut updates = handle.subscribe();
    handle.pick_image().await.expect("pick");
    timeout(WAIT, updates.wait_for(|s| s.submittable))
        .await
        .expect("pick resolved")
        .expect("session alive");

    let err = handle.submit().await.expect_err("sink unavailable");
    assert!(matches!(err, SessionError::Submission(_)));
}

#[tokio::test]
async fn image_resolving_after_close_is_dropped() {
    let (release_tx, release_rx) = oneshot::channel();
    let started = Arc::new(Notify::new());
    let picker = GatedPicker {
        release: Mutex::new(Some(release_rx)),
        started: started.clone(),
    };
    let (handle, task) = spawn_with(Arc::new(picker));

    handle.pick_image().await.expect("pick");
    timeout(WAIT, started.notified()).await.expect("picker launched");
    assert!(handle.sync().await.expect("sync").image_pick_pending);

    handle.close().await.expect("close");
    let controller = timeout(WAIT, task).await.expect("session ended").expect("join");
    assert!(controller.is_disposed());

    let _ = release_tx.send(Some("img://late".into()));
    tokio::task::yield_now().await;

    assert!(controller.draft().image_uri.is_empty());
    assert!(handle.snapshot().disposed);
    assert!(matches!(
        handle.send(FormInput::SetName("late".into())).await,
        Err(SessionError::Closed)
    ));
}

#[tokio::test]
async fn dropping_every_handle_disposes_controller() {
    let (handle, task) = spawn_with(Arc::new(NoImagePicker));
    handle.send(FormInput::SetName("Tech Meetup".into())).await.expect("send");
    drop(handle);

    let controller = timeout(WAIT, task).await.expect("session ended").expect("join");
    assert!(controller.is_disposed());
    assert_eq!(controller.draft().name, "Tech Meetup");
}

#[tokio::test]
async fn crashed_picker_releases_pick_for_retry() {
    let picker = Arc::new(FlakyPicker::default());
    let (handle, _task) = spawn_with(picker.clone());
    let mut updates = handle.subscribe();

    handle.pick_image().await.expect("pick");
    handle.sync().await.expect("sync");
    let snapshot = timeout(WAIT, updates.wait_for(|s| !s.image_pick_pending))
        .await
        .expect("crashed pick reported")
        .expect("session alive")
        .clone();
    assert!(snapshot.draft.image_uri.is_empty());

    handle.pick_image().await.expect("pick again");
    timeout(WAIT, updates.wait_for(|s| s.draft.image_uri == "img://retry"))
        .await
        .expect("retry resolved")
        .expect("session alive");
    assert_eq!(picker.calls.load(Ordering::SeqCst), 2);
}
