use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::report::Severity;

pub const SESSION_NOT_OPEN: &str = "Feedback Session Not Open";
pub const SESSION_CLOSING_HEADER: &str = "Feedback Session Will Be Closing Soon";
pub const SESSION_CLOSING_MESSAGE: &str =
    "Warning: you have less than 15 minutes before the submission deadline expires!";
pub const RESPONSES_SUBMITTED: &str = "All your responses have been successfully recorded! \
     You may now leave this page. Note that you can change your responses and submit them again \
     any time before the session closes.";

/// Remaining time at or below which the closing-soon warning is shown.
pub const CLOSING_SOON: Duration = Duration::minutes(15);

/// Session signals. Only used for banners, never for validation.
pub trait SessionState {
    fn is_open(&self) -> bool;

    /// Time until the submission deadline; `None` when there is no deadline.
    fn time_remaining(&self) -> Option<Duration>;

    /// Server-provided explanation shown with the not-open banner.
    fn closed_notice(&self) -> Option<&str> {
        None
    }
}

/// Modal content handed to the render sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

/// Banner to show when the page opens, if any. A closed session wins over the deadline warning.
pub fn session_banner(session: &dyn SessionState) -> Option<Banner> {
    if !session.is_open() {
        return Some(Banner {
            title: SESSION_NOT_OPEN.to_string(),
            body: session.closed_notice().unwrap_or_default().to_string(),
            severity: Severity::Error,
        });
    }
    let remaining = session.time_remaining()?;
    (remaining > Duration::ZERO && remaining <= CLOSING_SOON).then(|| Banner {
        title: SESSION_CLOSING_HEADER.to_string(),
        body: SESSION_CLOSING_MESSAGE.to_string(),
        severity: Severity::Error,
    })
}

pub fn submitted_banner(status: &str) -> Banner {
    Banner {
        title: status.to_string(),
        body: RESPONSES_SUBMITTED.to_string(),
        severity: Severity::Success,
    }
}

/// Session with fixed signals, for previews and offline use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedSession {
    pub open: bool,
    pub remaining: Option<Duration>,
    pub notice: Option<String>,
}

impl FixedSession {
    pub fn open() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    pub fn closed(notice: impl Into<String>) -> Self {
        Self {
            open: false,
            remaining: None,
            notice: Some(notice.into()),
        }
    }

    pub fn closing_in(remaining: Duration) -> Self {
        Self {
            open: true,
            remaining: Some(remaining),
            notice: None,
        }
    }
}

impl SessionState for FixedSession {
    fn is_open(&self) -> bool {
        self.open
    }

    fn time_remaining(&self) -> Option<Duration> {
        self.remaining
    }

    fn closed_notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

/// Session bounded by wall-clock start and end times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledSession {
    pub starts_at: OffsetDateTime,
    pub ends_at: OffsetDateTime,
}

impl ScheduledSession {
    pub fn is_open_at(&self, now: OffsetDateTime) -> bool {
        self.starts_at <= now && now < self.ends_at
    }

    pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
        self.ends_at - now
    }
}

impl SessionState for ScheduledSession {
    fn is_open(&self) -> bool {
        self.is_open_at(OffsetDateTime::now_utc())
    }

    fn time_remaining(&self) -> Option<Duration> {
        Some(self.remaining_at(OffsetDateTime::now_utc()))
    }
}
