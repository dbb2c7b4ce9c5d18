//! Browser-side behavior of the feedback page: the submission form, the
//! latest-feedback list, and the HTTP calls they make.

pub mod api;
pub mod form;
pub mod list;

pub use api::{FeedbackApi, HttpFeedbackApi, NetworkError};
pub use form::{FeedbackForm, FormData, FormEvent, FormState, Notice, NoticeKind, SubmitOutcome};
pub use list::{FeedbackCard, FeedbackList, ListState, ListView, LoadOutcome};
