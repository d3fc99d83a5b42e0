//! Background tasks. Each task owns its side effects and reports back to
//! the UI loop over the shared event channel; state transitions happen
//! only in `App::apply`.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, sleep_until, Instant};

use crate::api::ApiClient;
use crate::app::{BackendMsg, SearchRequest, LOADING_MESSAGES};
use crate::tui::AppEvent;

pub const READY_INITIAL_DELAY: Duration = Duration::from_millis(1500);
pub const READY_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Offsets (from search start) at which the later loading messages
/// replace the initial one, while the request is still pending.
pub const STAGE_OFFSETS: [Duration; 2] = [Duration::from_secs(2), Duration::from_secs(5)];

/// Probe the backend until it answers. Failures are retried silently at a
/// fixed cadence, with no backoff and no retry cap: the target is a
/// co-located backend that is still starting up.
pub async fn poll_ready(client: ApiClient, tx: mpsc::UnboundedSender<AppEvent>) {
    poll_ready_with(client, tx, READY_INITIAL_DELAY, READY_RETRY_DELAY).await;
}

async fn poll_ready_with(
    client: ApiClient,
    tx: mpsc::UnboundedSender<AppEvent>,
    initial_delay: Duration,
    retry_delay: Duration,
) {
    sleep(initial_delay).await;
    loop {
        if client.ready().await.is_ok() {
            // Ignore send error if the UI is already gone.
            let _ = tx.send(AppEvent::Backend(BackendMsg::Ready));
            return;
        }
        sleep(retry_delay).await;
    }
}

/// Drive one recommend request together with its staged loading messages.
/// Running both in a single task means a settled request can never be
/// followed by a stale stage message: the task ends with `SearchDone`.
pub async fn run_search(
    client: ApiClient,
    request: SearchRequest,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    run_search_with(client, request, tx, STAGE_OFFSETS).await;
}

async fn run_search_with(
    client: ApiClient,
    request: SearchRequest,
    tx: mpsc::UnboundedSender<AppEvent>,
    offsets: [Duration; 2],
) {
    let started = Instant::now();
    let recommend = client.recommend(&request.preference);
    tokio::pin!(recommend);

    let mut next_stage = 0usize;
    let result = loop {
        if next_stage < offsets.len() {
            tokio::select! {
                res = &mut recommend => break res,
                _ = sleep_until(started + offsets[next_stage]) => {
                    let _ = tx.send(AppEvent::Backend(BackendMsg::LoadingStage {
                        generation: request.generation,
                        message: LOADING_MESSAGES[next_stage + 1],
                    }));
                    next_stage += 1;
                }
            }
        } else {
            break recommend.await;
        }
    };

    let _ = tx.send(AppEvent::Backend(BackendMsg::SearchDone {
        generation: request.generation,
        result,
    }));
}
