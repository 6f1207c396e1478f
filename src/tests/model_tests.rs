use super::*;

#[test]
fn empty_strings_count_as_absent() {
    let session = Session::from_data(SessionData {
        csrf: Some(String::new()),
        email: Some(String::new()),
        enabled: Some(true),
        ..Default::default()
    });
    assert_eq!(session.state, SessionState::Unauthorized);
    assert_eq!(session.csrf, None);
    assert!(session.loaded());
}

#[test]
fn enabled_wins_over_expired() {
    let data = SessionData {
        email: Some("user@example.com".into()),
        enabled: Some(true),
        expired: Some(true),
        ..Default::default()
    };
    assert!(matches!(
        SessionState::from_data(&data),
        SessionState::AuthorizedEnabled { .. }
    ));
}

#[test]
fn missing_booleans_mean_disabled() {
    let data: SessionData =
        serde_json::from_str(r#"{"csrf":"t","email":"user@example.com"}"#).expect("decode");
    assert_eq!(
        SessionState::from_data(&data),
        SessionState::AuthorizedDisabled {
            email: "user@example.com".into()
        }
    );
}

#[test]
fn progress_needs_thread_count() {
    let without = Session::from_data(SessionData {
        num_labeled: Some(4),
        ..Default::default()
    });
    assert_eq!(without.progress, None);

    let with = Session::from_data(SessionData {
        num_threads: Some(9),
        ..Default::default()
    });
    assert_eq!(
        with.progress,
        Some(Progress {
            num_threads: 9,
            num_labeled: 0
        })
    );
}

#[test]
fn snapshot_serializes_flat() {
    let session = Session {
        state: SessionState::AuthorizedExpired {
            email: "user@example.com".into(),
        },
        csrf: Some("t".into()),
        progress: None,
        pending: Some(Action::Enable),
    };
    let v = serde_json::to_value(&session).expect("encode");
    assert_eq!(
        v,
        serde_json::json!({
            "state": "authorized_expired",
            "email": "user@example.com",
            "csrf": "t",
            "pending": "enable",
        })
    );
}
