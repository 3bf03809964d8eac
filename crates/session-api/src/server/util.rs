fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET,POST,OPTIONS,PUT,PATCH,DELETE"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-max-age"),
        HeaderValue::from_static("3600"),
    );
}

/// Deterministic reconnect token so a reconnecting stream client can tell the
/// server where it left off. Encodes the message label and, when present, the
/// monotonic sequence it corresponds to.
fn reconnect_token(label: &str, sequence: Option<u64>) -> String {
    match sequence {
        Some(sequence) => format!("{label}:{sequence}"),
        None => label.to_string(),
    }
}

/// Stable fallback seed derived from the session id, so an id-only create
/// request still replays deterministically.
fn default_seed(session_id: &str) -> u64 {
    let mut hash = 0xA24B_1C62_5B93_2D47_u64;
    for byte in session_id.as_bytes() {
        hash = hash.rotate_left(5) ^ u64::from(*byte);
        hash = hash.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    }
    hash
}

fn paginate(
    total: usize,
    cursor: Option<usize>,
    page_size: Option<usize>,
) -> Result<(usize, usize, Option<usize>), HttpApiError> {
    let start = cursor.unwrap_or(0);
    if start > total {
        return Err(HttpApiError::invalid_request(
            "cursor is out of bounds",
            Some(format!("cursor={start} total={total}")),
        ));
    }

    let size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .max(1)
        .min(MAX_PAGE_SIZE);
    let end = start.saturating_add(size).min(total);
    let next_cursor = if end < total { Some(end) } else { None };

    Ok((start, end, next_cursor))
}

fn parse_phase_filter(raw: Option<&str>) -> Result<Option<Phase>, HttpApiError> {
    let Some(value) = raw else {
        return Ok(None);
    };

    let phase = match value.trim().to_lowercase().as_str() {
        "setup" => Phase::Setup,
        "individual" => Phase::Individual,
        "group" => Phase::Group,
        "reflection" => Phase::Reflection,
        "complete" => Phase::Complete,
        _ => {
            return Err(HttpApiError::invalid_request(
                "invalid phase filter",
                Some(format!("phase={value}")),
            ))
        }
    };

    Ok(Some(phase))
}

fn parse_topic_filter(raw: Option<&str>) -> Result<Option<PolicyArea>, HttpApiError> {
    let Some(value) = raw else {
        return Ok(None);
    };

    PolicyArea::from_str(value)
        .map(Some)
        .map_err(|err| HttpApiError::from_action(&err))
}
