//! Deferred execution on the local single-threaded executor.
//!
//! Everything in this crate runs on one thread. Work that must not happen on
//! the current turn (waiter notification, late subscribers, tracked futures)
//! is handed to [`tokio::task::spawn_local`], so a [`LocalSet`] has to be
//! driving the caller.
//!
//! [`LocalSet`]: tokio::task::LocalSet

use std::future::Future ;



/// Runs `action` on a later scheduling tick, never synchronously.
///
/// Deferred actions run in the order they were scheduled.
pub(crate) fn defer( action: impl FnOnce() + 'static ) {
	spawn( async move { action() });
}

/// Spawns a future on the local executor, detached.
pub(crate) fn spawn( future: impl Future<Output = ()> + 'static ) {
	// Detached: completion is observed through the future's own side effects.
	let _ = tokio::task::spawn_local( future );
}
