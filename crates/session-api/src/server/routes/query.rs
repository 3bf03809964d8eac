async fn get_catalog() -> Json<Value> {
    Json(json!({
        "schema_version": SCHEMA_VERSION_V1,
        "total_budget": DEFAULT_TOTAL_BUDGET,
        "policy_areas": catalog::catalog_value(),
        "reflection_questions": catalog::REFLECTION_QUESTIONS,
    }))
}

#[derive(Debug, Serialize)]
struct SessionStateResponse {
    schema_version: String,
    session_id: String,
    status: SessionStatus,
    human_allocation: contracts::AllocationSummary,
    group_allocation: contracts::AllocationSummary,
    profiles: Vec<ParticipantProfile>,
}

async fn get_session_state(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SessionStateResponse>, HttpApiError> {
    let slot = require_session(&state, &session_id).await?;
    let slot = slot.lock().await;

    Ok(Json(SessionStateResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        session_id,
        status: slot.api.status(),
        human_allocation: slot.api.human_summary(),
        group_allocation: slot.api.group_summary(),
        profiles: slot.api.profiles().to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
struct TranscriptQuery {
    cursor: Option<usize>,
    page_size: Option<usize>,
    phase: Option<String>,
    topic: Option<String>,
    speaker: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranscriptResponse {
    schema_version: String,
    session_id: String,
    total: usize,
    next_cursor: Option<usize>,
    entries: Vec<DiscussionEntry>,
}

async fn get_transcript(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Query(query): Query<TranscriptQuery>,
) -> Result<Json<TranscriptResponse>, HttpApiError> {
    let phase_filter = parse_phase_filter(query.phase.as_deref())?;
    let topic_filter = parse_topic_filter(query.topic.as_deref())?;

    let slot = require_session(&state, &session_id).await?;
    let slot = slot.lock().await;

    let filtered: Vec<DiscussionEntry> = slot
        .api
        .transcript()
        .iter()
        .filter(|entry| phase_filter.map_or(true, |phase| entry.phase == phase))
        .filter(|entry| topic_filter.map_or(true, |topic| entry.topic == Some(topic)))
        .filter(|entry| {
            query
                .speaker
                .as_deref()
                .map_or(true, |speaker| entry.speaker.as_deref() == Some(speaker))
        })
        .cloned()
        .collect();

    let (start, end, next_cursor) = paginate(filtered.len(), query.cursor, query.page_size)?;

    Ok(Json(TranscriptResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        session_id,
        total: filtered.len(),
        next_cursor,
        entries: filtered[start..end].to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
struct DetectStanceRequest {
    speech_text: String,
}

#[derive(Debug, Serialize)]
struct DetectStanceResponse {
    schema_version: String,
    session_id: String,
    processed_text: String,
    detected_stance: u8,
}

/// Keyword-level stance guess over free speech text; the session must
/// exist but is not mutated.
async fn detect_stance_text(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<DetectStanceRequest>,
) -> Result<Json<DetectStanceResponse>, HttpApiError> {
    require_session(&state, &session_id).await?;

    let detected_stance = detect_stance(&request.speech_text);
    Ok(Json(DetectStanceResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        session_id,
        processed_text: request.speech_text,
        detected_stance,
    }))
}
