#[derive(Clone)]
struct AppState {
    registry: Arc<SessionRegistry>,
    stream_tx: broadcast::Sender<StreamMessage>,
}

impl AppState {
    fn new() -> Self {
        let (stream_tx, _) = broadcast::channel(1024);
        Self {
            registry: Arc::new(SessionRegistry::default()),
            stream_tx,
        }
    }
}

/// Per-session state behind its own mutex: actions against one session
/// serialize, distinct sessions proceed in parallel.
struct SessionSlot {
    api: SessionApi,
    streamed_entries: usize,
}

/// Explicit session store: the registry map is locked only to look up or
/// change membership, never across a session action.
#[derive(Default)]
struct SessionRegistry {
    slots: Mutex<HashMap<String, Arc<Mutex<SessionSlot>>>>,
    next_session_number: AtomicU64,
}

impl SessionRegistry {
    fn next_session_id(&self) -> String {
        let number = self.next_session_number.fetch_add(1, Ordering::Relaxed) + 1;
        format!("session_{number:03}")
    }

    /// Registers the session, returning whether an existing slot with the
    /// same id was replaced.
    async fn insert(&self, api: SessionApi) -> bool {
        let session_id = api.session_id().to_string();
        let slot = Arc::new(Mutex::new(SessionSlot {
            api,
            streamed_entries: 0,
        }));
        let mut slots = self.slots.lock().await;
        slots.insert(session_id, slot).is_some()
    }

    async fn get(&self, session_id: &str) -> Option<Arc<Mutex<SessionSlot>>> {
        let slots = self.slots.lock().await;
        slots.get(session_id).cloned()
    }

    async fn remove(&self, session_id: &str) -> bool {
        let mut slots = self.slots.lock().await;
        slots.remove(session_id).is_some()
    }

    async fn statuses(&self) -> Vec<SessionStatus> {
        let handles: Vec<Arc<Mutex<SessionSlot>>> = {
            let slots = self.slots.lock().await;
            slots.values().cloned().collect()
        };

        let mut statuses = Vec::with_capacity(handles.len());
        for handle in handles {
            let slot = handle.lock().await;
            statuses.push(slot.api.status());
        }
        statuses.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        statuses
    }
}

async fn require_session(
    state: &AppState,
    session_id: &str,
) -> Result<Arc<Mutex<SessionSlot>>, HttpApiError> {
    state
        .registry
        .get(session_id)
        .await
        .ok_or_else(|| HttpApiError::session_not_found(session_id))
}

/// Entries appended since the last collection, as stream messages, plus a
/// warning when the most recent persistence flush failed.
fn collect_delta_messages(slot: &mut SessionSlot) -> Vec<StreamMessage> {
    let mut messages = Vec::new();

    let entries = slot.api.transcript();
    for entry in &entries[slot.streamed_entries..] {
        messages.push(StreamMessage::entry_appended(entry));
    }
    slot.streamed_entries = entries.len();

    if let Some(last_error) = slot.api.last_persistence_error() {
        messages.push(StreamMessage::warning(
            slot.api.session_id(),
            last_error.to_string(),
        ));
    }

    messages
}

fn broadcast_messages(state: &AppState, messages: Vec<StreamMessage>) {
    for message in messages {
        let _ = state.stream_tx.send(message);
    }
}
