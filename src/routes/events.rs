use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt, future, stream};
use tokio_stream::wrappers::BroadcastStream;

use crate::{
    middleware::auth::AuthUser,
    services::order_service,
    state::AppState,
    sync::{ChangeEvent, ChangeKind},
};

/// Live dashboard feed. Emits a full snapshot immediately, then another
/// after every relevant change; the client replaces its state wholesale
/// each time. Mutation responses only acknowledge the write, the resulting
/// view update always arrives through this channel.
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "text/event-stream of dashboard snapshots"),
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn dashboard_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let rx = state.changes.subscribe();
    let owner_id = user.user_id;

    let kickoff = ChangeEvent {
        kind: ChangeKind::Orders,
        owner_id: Some(owner_id),
    };
    let triggers = stream::once(future::ready(kickoff))
        .chain(BroadcastStream::new(rx).filter_map(|event| future::ready(event.ok())))
        .filter(move |event| future::ready(event.concerns(owner_id)));

    let snapshots = triggers.then(move |_event| {
        let state = state.clone();
        let user = user.clone();
        async move { order_service::snapshot(&state, &user).await }
    });

    let events = snapshots.map(|snapshot| match snapshot {
        Ok(snapshot) => Event::default().event("snapshot").json_data(&snapshot),
        Err(err) => {
            tracing::error!(error = %err, "dashboard snapshot failed");
            Ok(Event::default().event("error").data("snapshot unavailable"))
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
