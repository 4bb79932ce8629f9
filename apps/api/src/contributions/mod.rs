// Activity calendars: per-resume and across all of a user's resumes.

pub mod aggregate;
pub mod calendar;
pub mod handlers;
