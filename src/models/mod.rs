pub mod course;
pub mod feedback;

pub use course::Course;
pub use feedback::{FeedbackEntry, NewFeedbackRequest, LATEST_WINDOW};
