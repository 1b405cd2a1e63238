//! Settles a stream of search-box values before filtering.
//!
//! A value is emitted only after the input has been quiet for the configured
//! window, and only if it differs from the last emitted value. HTTP routes
//! take an already settled `?q=`; this serves in-process consumers that feed
//! keystrokes directly.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::timeout;

use crate::utils::search::{Searchable, SearchableList};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Spawns the settling task and returns the receiver of settled values.
///
/// Closing the input flushes a pending value and then closes the output.
pub fn debounce(mut input: UnboundedReceiver<String>, quiet: Duration) -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut last_emitted: Option<String> = None;

        while let Some(mut pending) = input.recv().await {
            let mut closed = false;
            loop {
                match timeout(quiet, input.recv()).await {
                    Ok(Some(newer)) => pending = newer,
                    Ok(None) => {
                        closed = true;
                        break;
                    }
                    Err(_) => break,
                }
            }

            if last_emitted.as_deref() != Some(pending.as_str()) {
                last_emitted = Some(pending.clone());
                if tx.send(pending).is_err() {
                    return;
                }
            }

            if closed {
                return;
            }
        }
    });

    rx
}

/// Refilters `list` every time a settled query arrives, until the stream ends.
pub async fn drive<T, F>(list: &mut SearchableList<T>, mut settled: UnboundedReceiver<String>, mut on_change: F)
where
    T: Searchable + Clone,
    F: FnMut(&SearchableList<T>),
{
    while let Some(query) = settled.recv().await {
        tracing::debug!(query = %query, "search settled");
        list.apply_query(&query);
        on_change(list);
    }
}
