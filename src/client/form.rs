use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::client::api::FeedbackApi;
use crate::client::list::FeedbackList;
use crate::models::NewFeedbackRequest;
use crate::validation::{self, FieldErrors};

/// How long a success or failure notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_millis(3500);
pub const SUCCESS_MESSAGE: &str = "✅ Thank you for your feedback!";
pub const FAILURE_MESSAGE: &str = "Submission failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Open,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    OpenRequested,
    Cancel,
    EscapePressed,
    ClickedOutside,
    SubmitInvalid,
    SubmitValid,
    Succeeded,
    Failed,
}

impl FormState {
    /// Transition table. `None` means the event is ignored in this state.
    pub fn next(self, event: FormEvent) -> Option<FormState> {
        use FormEvent::*;
        use FormState::*;

        match (self, event) {
            (Closed, OpenRequested) => Some(Open),
            (Open, Cancel | EscapePressed | ClickedOutside) => Some(Closed),
            (Open, SubmitInvalid) => Some(Open),
            (Open, SubmitValid) => Some(Submitting),
            (Submitting, Succeeded) => Some(Closed),
            (Submitting, Failed) => Some(Open),
            _ => None,
        }
    }
}

/// Raw field values as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub course: String,
    /// Star rating as picked, `"1"`..`"5"`, or empty.
    pub rating: String,
    pub how_heard: String,
    pub message: String,
}

impl FormData {
    fn parsed_rating(&self) -> Option<i64> {
        self.rating.trim().parse().ok()
    }

    pub fn validate(&self) -> FieldErrors {
        validation::check(
            &self.name,
            &self.email,
            &self.course,
            self.parsed_rating(),
            &self.message,
        )
    }

    pub fn to_request(&self) -> NewFeedbackRequest {
        NewFeedbackRequest {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            course: Some(self.course.clone()),
            rating: self.parsed_rating(),
            how_heard: Some(self.how_heard.clone()),
            message: Some(self.message.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: &'static str,
    shown_at: Instant,
}

impl Notice {
    fn new(kind: NoticeKind, text: &'static str) -> Self {
        Self {
            kind,
            text,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTICE_TTL
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; no request was made.
    Invalid,
    Submitted,
    /// The request failed; the form is still open with its values.
    Failed,
    /// A submission is already in flight.
    Busy,
    /// The form is closed.
    Ignored,
}

/// Resets an abandoned submission back to `Open` if the request future is
/// dropped before it settles.
struct InFlight<'a> {
    state: &'a mut FormState,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled && *self.state == FormState::Submitting {
            *self.state = FormState::Open;
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedbackForm {
    state: FormState,
    data: FormData,
    errors: FieldErrors,
    notice: Option<Notice>,
}

impl Default for FeedbackForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self {
            state: FormState::Closed,
            data: FormData::default(),
            errors: FieldErrors::default(),
            notice: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != FormState::Closed
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Field edits are only accepted while the form is open and idle.
    pub fn data_mut(&mut self) -> Option<&mut FormData> {
        match self.state {
            FormState::Open => Some(&mut self.data),
            FormState::Closed | FormState::Submitting => None,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The current notice, unless it has outlived `NOTICE_TTL`.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired(now))
    }

    pub fn clear_expired_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    pub fn open(&mut self) -> bool {
        self.apply(FormEvent::OpenRequested)
    }

    pub fn cancel(&mut self) -> bool {
        self.apply(FormEvent::Cancel)
    }

    pub fn press_escape(&mut self) -> bool {
        self.apply(FormEvent::EscapePressed)
    }

    pub fn click_outside(&mut self) -> bool {
        self.apply(FormEvent::ClickedOutside)
    }

    fn apply(&mut self, event: FormEvent) -> bool {
        match self.state.next(event) {
            Some(next) => {
                debug!(from = ?self.state, to = ?next, ?event, "form transition");
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Validates and, if valid, sends the submission. On success the list is
    /// replaced with the server's latest entries.
    pub async fn submit<A>(&mut self, api: &A, list: &mut FeedbackList) -> SubmitOutcome
    where
        A: FeedbackApi + ?Sized,
    {
        match self.state {
            FormState::Open => {}
            FormState::Submitting => return SubmitOutcome::Busy,
            FormState::Closed => return SubmitOutcome::Ignored,
        }

        let errors = self.data.validate();
        if !errors.is_empty() {
            self.errors = errors;
            self.apply(FormEvent::SubmitInvalid);
            return SubmitOutcome::Invalid;
        }
        self.errors = FieldErrors::default();

        let request = self.data.to_request();
        self.apply(FormEvent::SubmitValid);

        let result = {
            let mut flight = InFlight {
                state: &mut self.state,
                settled: false,
            };
            let result = api.create(&request).await;
            flight.settled = true;
            result
        };

        match result {
            Ok(latest) => {
                self.apply(FormEvent::Succeeded);
                self.data = FormData::default();
                list.replace(latest);
                self.notice = Some(Notice::new(NoticeKind::Success, SUCCESS_MESSAGE));
                SubmitOutcome::Submitted
            }
            Err(e) => {
                warn!("feedback submission failed: {}", e);
                self.apply(FormEvent::Failed);
                self.notice = Some(Notice::new(NoticeKind::Error, FAILURE_MESSAGE));
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use FormEvent::*;
        use FormState::*;

        assert_eq!(Closed.next(OpenRequested), Some(Open));
        assert_eq!(Open.next(Cancel), Some(Closed));
        assert_eq!(Open.next(EscapePressed), Some(Closed));
        assert_eq!(Open.next(ClickedOutside), Some(Closed));
        assert_eq!(Open.next(SubmitInvalid), Some(Open));
        assert_eq!(Open.next(SubmitValid), Some(Submitting));
        assert_eq!(Submitting.next(Succeeded), Some(Closed));
        assert_eq!(Submitting.next(Failed), Some(Open));

        assert_eq!(Closed.next(SubmitValid), None);
        assert_eq!(Open.next(OpenRequested), None);
        assert_eq!(Submitting.next(EscapePressed), None);
        assert_eq!(Submitting.next(SubmitValid), None);
    }

    #[test]
    fn test_close_actions() {
        let mut form = FeedbackForm::new();
        assert!(!form.cancel());

        let closers: [fn(&mut FeedbackForm) -> bool; 3] = [
            FeedbackForm::cancel,
            FeedbackForm::press_escape,
            FeedbackForm::click_outside,
        ];
        for close in closers {
            assert!(form.open());
            assert!(form.is_open());
            assert!(close(&mut form));
            assert_eq!(form.state(), FormState::Closed);
        }
    }

    #[test]
    fn test_edits_only_while_open() {
        let mut form = FeedbackForm::new();
        assert!(form.data_mut().is_none());

        form.open();
        form.data_mut().unwrap().name = "Ada".to_string();
        assert_eq!(form.data().name, "Ada");
    }

    #[test]
    fn test_form_data_request_keeps_rating_numeric() {
        let data = FormData {
            rating: "4".to_string(),
            ..FormData::default()
        };
        assert_eq!(data.to_request().rating, Some(4));
        assert_eq!(FormData::default().to_request().rating, None);
    }

    #[tokio::test]
    async fn test_submit_refused_while_in_flight_or_closed() {
        let api = crate::client::HttpFeedbackApi::new("http://127.0.0.1:9").unwrap();
        let mut list = FeedbackList::new();
        let mut form = FeedbackForm::new();

        assert_eq!(form.submit(&api, &mut list).await, SubmitOutcome::Ignored);

        form.state = FormState::Submitting;
        assert_eq!(form.submit(&api, &mut list).await, SubmitOutcome::Busy);
        assert_eq!(form.state(), FormState::Submitting);
    }

    #[test]
    fn test_notice_expiry() {
        let notice = Notice::new(NoticeKind::Success, SUCCESS_MESSAGE);
        assert!(!notice.is_expired(notice.shown_at));
        assert!(!notice.is_expired(notice.shown_at + Duration::from_millis(3499)));
        assert!(notice.is_expired(notice.shown_at + NOTICE_TTL));
    }
}
