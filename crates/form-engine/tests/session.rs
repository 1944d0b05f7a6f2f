use form_engine::session::{
    SESSION_CLOSING_HEADER, SESSION_CLOSING_MESSAGE, SESSION_NOT_OPEN, submitted_banner,
};
use form_engine::{FixedSession, ScheduledSession, SessionState, Severity, session_banner};
use time::{Duration, OffsetDateTime};

#[test]
fn closed_session_wins_over_deadline() {
    let banner = session_banner(&FixedSession::closed("Submissions ended yesterday."))
        .expect("banner");
    assert_eq!(banner.title, SESSION_NOT_OPEN);
    assert_eq!(banner.body, "Submissions ended yesterday.");
}

#[test]
fn closing_soon_window_is_fifteen_minutes() {
    for (minutes, expected) in [(1, true), (15, true), (16, false), (0, false), (-5, false)] {
        let banner = session_banner(&FixedSession::closing_in(Duration::minutes(minutes)));
        assert_eq!(banner.is_some(), expected, "{minutes} minutes left");
    }
    let banner = session_banner(&FixedSession::closing_in(Duration::minutes(5))).expect("banner");
    assert_eq!(banner.title, SESSION_CLOSING_HEADER);
    assert_eq!(banner.body, SESSION_CLOSING_MESSAGE);
}

#[test]
fn open_session_without_deadline_is_silent() {
    assert_eq!(session_banner(&FixedSession::open()), None);
}

#[test]
fn scheduled_session_tracks_wall_clock() {
    let now = OffsetDateTime::now_utc();
    let session = ScheduledSession {
        starts_at: now - Duration::hours(1),
        ends_at: now + Duration::hours(1),
    };
    assert!(session.is_open_at(now));
    assert!(!session.is_open_at(now + Duration::hours(2)));
    assert_eq!(session.remaining_at(now), Duration::hours(1));
    assert!(session.is_open());
}

#[test]
fn success_banner_uses_server_status() {
    let banner = submitted_banner("Your responses have been saved.");
    assert_eq!(banner.title, "Your responses have been saved.");
    assert_eq!(banner.severity, Severity::Success);
    assert!(banner.body.starts_with("All your responses have been successfully recorded!"));
}
