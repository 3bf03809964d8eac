#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    session_id: Option<String>,
    seed: Option<u64>,
    agent_count: Option<usize>,
    total_budget: Option<u32>,
    notes: Option<String>,
    auto_start: Option<bool>,
    sqlite_path: Option<String>,
    replace_existing: Option<bool>,
}

#[derive(Debug, Serialize)]
struct CreateSessionResponse {
    schema_version: String,
    session_id: String,
    status: SessionStatus,
    profiles: Vec<ParticipantProfile>,
    replaced_existing_session: bool,
    started: bool,
}

async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, HttpApiError> {
    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| state.registry.next_session_id());
    let seed = request.seed.unwrap_or_else(|| default_seed(&session_id));

    let config = SessionConfig {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        session_id: session_id.clone(),
        seed,
        agent_count: request.agent_count.unwrap_or(contracts::DEFAULT_AGENT_COUNT),
        total_budget: request.total_budget.unwrap_or(DEFAULT_TOTAL_BUDGET),
        notes: request.notes,
    };

    let mut api = SessionApi::from_config(config);
    if let Some(path) = request.sqlite_path.filter(|path| !path.trim().is_empty()) {
        api.attach_sqlite_store(path)
            .map_err(HttpApiError::from_persistence)?;
        api.initialize_session_storage(request.replace_existing.unwrap_or(true))
            .map_err(HttpApiError::from_persistence)?;
    }

    let auto_start = request.auto_start.unwrap_or(false);
    if auto_start {
        api.start().map_err(|err| HttpApiError::from_action(&err))?;
    }

    let profiles = api.profiles().to_vec();
    let status = api.status();
    let replaced_existing_session = state.registry.insert(api).await;

    let mut messages = Vec::new();
    if replaced_existing_session {
        messages.push(StreamMessage::warning(
            &session_id,
            "existing session state was replaced by POST /sessions".to_string(),
        ));
    }
    messages.push(StreamMessage::session_status(&status));
    broadcast_messages(&state, messages);

    Ok(Json(CreateSessionResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        session_id,
        status,
        profiles,
        replaced_existing_session,
        started: auto_start,
    }))
}

#[derive(Debug, Deserialize)]
struct ListSessionsQuery {
    page_size: Option<usize>,
    sqlite_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListSessionsResponse {
    schema_version: String,
    active_sessions: Vec<SessionStatus>,
    persisted_sessions: Option<Vec<PersistedSessionSummary>>,
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<ListSessionsResponse>, HttpApiError> {
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let active_sessions = state.registry.statuses().await;

    let persisted_sessions = match query.sqlite_path.filter(|path| !path.trim().is_empty()) {
        Some(path) => {
            let store = crate::persistence::SqliteSessionStore::open(path)
                .map_err(HttpApiError::from_persistence)?;
            Some(
                store
                    .list_sessions(page_size)
                    .map_err(HttpApiError::from_persistence)?,
            )
        }
        None => None,
    };

    Ok(Json(ListSessionsResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        active_sessions,
        persisted_sessions,
    }))
}

#[derive(Debug, Serialize)]
struct DestroySessionResponse {
    schema_version: String,
    session_id: String,
    destroyed: bool,
}

async fn destroy_session(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DestroySessionResponse>, HttpApiError> {
    if !state.registry.remove(&session_id).await {
        return Err(HttpApiError::session_not_found(&session_id));
    }

    Ok(Json(DestroySessionResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        session_id,
        destroyed: true,
    }))
}

#[derive(Debug, Serialize)]
struct SessionStatusResponse {
    schema_version: String,
    session_id: String,
    status: SessionStatus,
}

async fn start_session(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SessionStatusResponse>, HttpApiError> {
    let slot = require_session(&state, &session_id).await?;
    let (response, messages) = {
        let mut slot = slot.lock().await;
        let status = slot
            .api
            .start()
            .map_err(|err| HttpApiError::from_action(&err))?;

        let mut messages = collect_delta_messages(&mut slot);
        messages.push(StreamMessage::session_status(&status));
        (
            SessionStatusResponse {
                schema_version: SCHEMA_VERSION_V1.to_string(),
                session_id: status.session_id.clone(),
                status,
            },
            messages,
        )
    };

    broadcast_messages(&state, messages);
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct SetPreferenceRequest {
    area: String,
    option: u8,
}

#[derive(Debug, Serialize)]
struct SetPreferenceResponse {
    schema_version: String,
    session_id: String,
    outcome: PreferenceOutcome,
    status: SessionStatus,
}

async fn set_preference(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<SetPreferenceRequest>,
) -> Result<Json<SetPreferenceResponse>, HttpApiError> {
    let area = PolicyArea::from_str(&request.area).map_err(|err| HttpApiError::from_action(&err))?;

    let slot = require_session(&state, &session_id).await?;
    let (response, messages) = {
        let mut slot = slot.lock().await;
        let outcome = slot
            .api
            .set_preference(area, request.option)
            .map_err(|err| HttpApiError::from_action(&err))?;
        let status = slot.api.status();

        let mut messages = collect_delta_messages(&mut slot);
        messages.push(StreamMessage::session_status(&status));
        (
            SetPreferenceResponse {
                schema_version: SCHEMA_VERSION_V1.to_string(),
                session_id: status.session_id.clone(),
                outcome,
                status,
            },
            messages,
        )
    };

    broadcast_messages(&state, messages);
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct GroupStartResponse {
    schema_version: String,
    session_id: String,
    outcome: GroupStartOutcome,
    status: SessionStatus,
}

async fn start_group_discussion(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<GroupStartResponse>, HttpApiError> {
    let slot = require_session(&state, &session_id).await?;
    let (response, messages) = {
        let mut slot = slot.lock().await;
        let outcome = slot
            .api
            .start_group_discussion()
            .map_err(|err| HttpApiError::from_action(&err))?;
        let status = slot.api.status();

        let mut messages = collect_delta_messages(&mut slot);
        messages.push(StreamMessage::session_status(&status));
        (
            GroupStartResponse {
                schema_version: SCHEMA_VERSION_V1.to_string(),
                session_id: status.session_id.clone(),
                outcome,
                status,
            },
            messages,
        )
    };

    broadcast_messages(&state, messages);
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct SubmitArgumentRequest {
    argument: String,
    preferred_option: u8,
}

#[derive(Debug, Serialize)]
struct SubmitArgumentResponse {
    schema_version: String,
    session_id: String,
    outcome: ArgumentOutcome,
    status: SessionStatus,
}

async fn submit_argument(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<SubmitArgumentRequest>,
) -> Result<Json<SubmitArgumentResponse>, HttpApiError> {
    let slot = require_session(&state, &session_id).await?;
    let (response, messages) = {
        let mut slot = slot.lock().await;
        let outcome = slot
            .api
            .submit_argument(&request.argument, request.preferred_option)
            .map_err(|err| HttpApiError::from_action(&err))?;
        let status = slot.api.status();

        let mut messages = collect_delta_messages(&mut slot);
        messages.push(StreamMessage::session_status(&status));
        (
            SubmitArgumentResponse {
                schema_version: SCHEMA_VERSION_V1.to_string(),
                session_id: status.session_id.clone(),
                outcome,
                status,
            },
            messages,
        )
    };

    broadcast_messages(&state, messages);
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct FinalizeTopicRequest {
    option: u8,
}

#[derive(Debug, Serialize)]
struct FinalizeTopicResponse {
    schema_version: String,
    session_id: String,
    outcome: TopicOutcome,
    status: SessionStatus,
}

async fn finalize_topic(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<FinalizeTopicRequest>,
) -> Result<Json<FinalizeTopicResponse>, HttpApiError> {
    let slot = require_session(&state, &session_id).await?;
    let (response, messages) = {
        let mut slot = slot.lock().await;
        let outcome = slot
            .api
            .finalize_topic(request.option)
            .map_err(|err| HttpApiError::from_action(&err))?;
        let status = slot.api.status();

        let mut messages = collect_delta_messages(&mut slot);
        messages.push(StreamMessage::session_status(&status));
        (
            FinalizeTopicResponse {
                schema_version: SCHEMA_VERSION_V1.to_string(),
                session_id: status.session_id.clone(),
                outcome,
                status,
            },
            messages,
        )
    };

    broadcast_messages(&state, messages);
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ReflectionResponse {
    schema_version: String,
    session_id: String,
    outcome: ReflectionOutcome,
    status: SessionStatus,
}

async fn start_reflection(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ReflectionResponse>, HttpApiError> {
    let slot = require_session(&state, &session_id).await?;
    let (response, messages) = {
        let mut slot = slot.lock().await;
        let outcome = slot
            .api
            .start_reflection()
            .map_err(|err| HttpApiError::from_action(&err))?;
        let status = slot.api.status();

        let mut messages = collect_delta_messages(&mut slot);
        messages.push(StreamMessage::session_status(&status));
        (
            ReflectionResponse {
                schema_version: SCHEMA_VERSION_V1.to_string(),
                session_id: status.session_id.clone(),
                outcome,
                status,
            },
            messages,
        )
    };

    broadcast_messages(&state, messages);
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct FinalReportResponse {
    schema_version: String,
    session_id: String,
    report: FinalReport,
    status: SessionStatus,
}

async fn generate_report(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<FinalReportResponse>, HttpApiError> {
    let slot = require_session(&state, &session_id).await?;
    let (response, messages) = {
        let mut slot = slot.lock().await;
        let report = slot
            .api
            .final_report()
            .map_err(|err| HttpApiError::from_action(&err))?;
        let status = slot.api.status();

        let mut messages = collect_delta_messages(&mut slot);
        messages.push(StreamMessage::session_status(&status));
        (
            FinalReportResponse {
                schema_version: SCHEMA_VERSION_V1.to_string(),
                session_id: status.session_id.clone(),
                report,
                status,
            },
            messages,
        )
    };

    broadcast_messages(&state, messages);
    Ok(Json(response))
}
