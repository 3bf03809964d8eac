async fn stream_session(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, HttpApiError> {
    let initial_message = {
        let slot = require_session(&state, &session_id).await?;
        let slot = slot.lock().await;
        StreamMessage::session_status(&slot.api.status())
    };

    Ok(ws.on_upgrade(move |socket| stream_socket(socket, state, session_id, initial_message)))
}

async fn stream_socket(
    mut socket: WebSocket,
    state: AppState,
    session_id: String,
    initial_message: StreamMessage,
) {
    if send_stream_message(&mut socket, &initial_message)
        .await
        .is_err()
    {
        return;
    }

    let mut rx = state.stream_tx.subscribe();

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                        break;
                    }
                    _ => {}
                }
            }
            outgoing = rx.recv() => {
                match outgoing {
                    Ok(message) => {
                        if message.session_id != session_id {
                            continue;
                        }

                        if send_stream_message(&mut socket, &message).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        let warning = StreamMessage::warning(
                            &session_id,
                            format!("stream client lagged and skipped {skipped} message(s)"),
                        );

                        if send_stream_message(&mut socket, &warning).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        }
    }
}

async fn send_stream_message(
    socket: &mut WebSocket,
    message: &StreamMessage,
) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(message).map_err(axum::Error::new)?;
    socket.send(Message::Text(payload.into())).await
}

#[derive(Debug, Clone, Serialize)]
struct StreamMessage {
    schema_version: String,
    #[serde(rename = "type")]
    message_type: String,
    session_id: String,
    sequence: Option<u64>,
    reconnect_token: String,
    payload: Value,
}

impl StreamMessage {
    fn session_status(status: &SessionStatus) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "session.status".to_string(),
            session_id: status.session_id.clone(),
            sequence: None,
            reconnect_token: reconnect_token("status", Some(status.log_entries as u64)),
            payload: json!(status),
        }
    }

    fn entry_appended(entry: &DiscussionEntry) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "entry.appended".to_string(),
            session_id: entry.session_id.clone(),
            sequence: Some(entry.sequence),
            reconnect_token: reconnect_token("entry", Some(entry.sequence)),
            payload: json!(entry),
        }
    }

    fn warning(session_id: &str, warning: String) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            message_type: "warning".to_string(),
            session_id: session_id.to_string(),
            sequence: None,
            reconnect_token: reconnect_token("warning", None),
            payload: json!({ "message": warning }),
        }
    }
}
