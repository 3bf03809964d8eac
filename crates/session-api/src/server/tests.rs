use super::*;

fn create_request(session_id: &str) -> CreateSessionRequest {
    CreateSessionRequest {
        session_id: Some(session_id.to_string()),
        seed: Some(1337),
        agent_count: None,
        total_budget: None,
        notes: None,
        auto_start: Some(true),
        sqlite_path: None,
        replace_existing: None,
    }
}

#[test]
fn pagination_enforces_max_bounds() {
    let (start, end, next_cursor) = paginate(100, Some(10), Some(20)).expect("page should work");
    assert_eq!(start, 10);
    assert_eq!(end, 30);
    assert_eq!(next_cursor, Some(30));

    let (_, end, next_cursor) = paginate(5, None, Some(50)).expect("short page");
    assert_eq!(end, 5);
    assert_eq!(next_cursor, None);

    let out_of_range = paginate(5, Some(10), Some(1));
    assert!(out_of_range.is_err());
}

#[test]
fn default_seed_is_stable_per_session_id() {
    assert_eq!(default_seed("session_001"), default_seed("session_001"));
    assert_ne!(default_seed("session_001"), default_seed("session_002"));
}

#[test]
fn phase_and_topic_filters_parse_or_reject() {
    assert_eq!(
        parse_phase_filter(Some("group")).expect("valid"),
        Some(Phase::Group)
    );
    assert_eq!(parse_phase_filter(None).expect("absent"), None);
    assert!(parse_phase_filter(Some("intermission")).is_err());

    assert_eq!(
        parse_topic_filter(Some("teacher_training")).expect("valid"),
        Some(PolicyArea::TeacherTraining)
    );
    assert!(parse_topic_filter(Some("border_control")).is_err());
}

#[tokio::test]
async fn create_then_act_then_destroy_round_trip() {
    let state = AppState::new();

    let created = create_session(State(state.clone()), Json(create_request("session_rt")))
        .await
        .expect("create succeeds");
    assert_eq!(created.0.session_id, "session_rt");
    assert_eq!(created.0.status.phase, Phase::Individual);
    assert_eq!(created.0.profiles.len(), 4);
    assert!(!created.0.replaced_existing_session);

    let preference = set_preference(
        Path("session_rt".to_string()),
        State(state.clone()),
        Json(SetPreferenceRequest {
            area: "access_to_education".to_string(),
            option: 3,
        }),
    )
    .await
    .expect("preference accepted");
    assert_eq!(preference.0.outcome.budget_remaining, 11);

    let destroyed = destroy_session(Path("session_rt".to_string()), State(state.clone()))
        .await
        .expect("destroy succeeds");
    assert!(destroyed.0.destroyed);

    let missing = start_session(Path("session_rt".to_string()), State(state.clone())).await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn rejected_actions_map_to_conflict_status() {
    let state = AppState::new();
    create_session(State(state.clone()), Json(create_request("session_conflict")))
        .await
        .expect("create succeeds");

    // Individual phase: finalizing a topic is a phase violation.
    let err = finalize_topic(
        Path("session_conflict".to_string()),
        State(state.clone()),
        Json(FinalizeTopicRequest { option: 2 }),
    )
    .await
    .expect_err("wrong phase");
    assert_eq!(err.status, StatusCode::CONFLICT);
    assert_eq!(err.error.error_code, ErrorCode::PhaseViolation);

    let err = set_preference(
        Path("session_conflict".to_string()),
        State(state.clone()),
        Json(SetPreferenceRequest {
            area: "border_control".to_string(),
            option: 2,
        }),
    )
    .await
    .expect_err("unknown area");
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.error.error_code, ErrorCode::UnknownArea);
}

#[tokio::test]
async fn stance_detection_requires_a_live_session() {
    let state = AppState::new();
    let missing = detect_stance_text(
        Path("session_ghost".to_string()),
        State(state.clone()),
        Json(DetectStanceRequest {
            speech_text: "comprehensive rights".to_string(),
        }),
    )
    .await;
    assert!(missing.is_err());

    create_session(State(state.clone()), Json(create_request("session_voice")))
        .await
        .expect("create succeeds");
    let detected = detect_stance_text(
        Path("session_voice".to_string()),
        State(state.clone()),
        Json(DetectStanceRequest {
            speech_text: "We need comprehensive, inclusive, equal rights".to_string(),
        }),
    )
    .await
    .expect("session exists");
    assert_eq!(detected.0.detected_stance, 3);
}

#[tokio::test]
async fn generated_session_ids_are_sequential_and_unique() {
    let state = AppState::new();
    let mut request = create_request("");
    request.session_id = None;
    request.auto_start = None;

    let first = create_session(State(state.clone()), Json(request))
        .await
        .expect("create succeeds");

    let mut request = create_request("");
    request.session_id = None;
    request.auto_start = None;
    let second = create_session(State(state.clone()), Json(request))
        .await
        .expect("create succeeds");

    assert_ne!(first.0.session_id, second.0.session_id);
    assert!(first.0.session_id.starts_with("session_"));
    assert_eq!(first.0.status.phase, Phase::Setup);
}
