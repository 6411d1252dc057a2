//! Optimistic like/dislike toggles.
//!
//! A toggle is applied to the feed immediately, then the server's answer overwrites it. Every
//! toggle is tagged with a sequence number when it is dispatched; only the response to the latest
//! toggle of a post is allowed to touch that post.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use agora_types::{ApiError, PostId, ReactionKind, ReactionSnapshot};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::api;
use crate::feed::PostFeedStore;
use crate::gateway::RequestGateway;

/// A dispatched toggle that has not been reconciled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionDelta {
    pub post_id: PostId,
    pub kind: ReactionKind,
    pub sequence: u64,
    /// Counters before the toggle
    pub prior: ReactionSnapshot,
    /// Counters shown while the request is in flight
    pub predicted: ReactionSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// The server's counters were applied.
    Confirmed(ReactionSnapshot),
    /// A newer toggle for the same post was dispatched; this response was dropped.
    Superseded { sequence: u64 },
    /// The post is not in the feed (never was, still provisional, or removed meanwhile).
    Absent,
    /// The request failed. The prediction was rolled back and, unless the session ended, the
    /// feed was reloaded.
    Failed { error: ApiError, resynced: bool },
}

/// Drives like/dislike toggles against the shared [`PostFeedStore`].
///
/// Lock order is feed first, then the pending map, then the feed's reaction holds. The pending map
/// is only touched from inside [`PostFeedStore::update_one`] or on its own.
#[derive(Debug, Clone)]
pub struct ReactionEngine {
    gateway: Arc<RequestGateway>,
    feed: PostFeedStore,
    pending: Arc<DashMap<PostId, ReactionDelta>>,
    sequence: Arc<AtomicU64>,
}

impl ReactionEngine {
    pub fn new(gateway: Arc<RequestGateway>, feed: PostFeedStore) -> Self {
        Self {
            gateway,
            feed,
            pending: Arc::new(DashMap::new()),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn toggle_like(&self, id: PostId) -> ReactionOutcome {
        self.toggle(id, ReactionKind::Like).await
    }

    pub async fn toggle_dislike(&self, id: PostId) -> ReactionOutcome {
        self.toggle(id, ReactionKind::Dislike).await
    }

    /// Latest unreconciled toggle for a post, for rendering a pending state.
    pub fn pending(&self, id: PostId) -> Option<ReactionDelta> {
        self.pending.get(&id).map(|delta| *delta)
    }

    pub fn latest_sequence(&self, id: PostId) -> Option<u64> {
        self.pending(id).map(|delta| delta.sequence)
    }

    pub async fn toggle(&self, id: PostId, kind: ReactionKind) -> ReactionOutcome {
        if id.is_provisional() {
            debug!(%id, "Ignoring reaction on unpublished post");
            return ReactionOutcome::Absent;
        }
        let Some(delta) = self.predict(id, kind) else {
            debug!(%id, "Ignoring reaction on post not in feed");
            return ReactionOutcome::Absent;
        };
        debug!(
            %id,
            %kind,
            sequence = delta.sequence,
            likes = delta.predicted.likes,
            dislikes = delta.predicted.dislikes,
            "Applied optimistic reaction"
        );

        match api::posts::react(&self.gateway, id, kind).await {
            Ok(server) => self.reconcile(delta, server),
            Err(error) => self.roll_back(delta, error).await,
        }
    }

    /// Apply the predicted transition and register it as the latest for the post.
    fn predict(&self, id: PostId, kind: ReactionKind) -> Option<ReactionDelta> {
        self.feed.update_one(id, |post| {
            let prior = post.reactions;
            let predicted = prior.toggled(kind);
            let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            let delta = ReactionDelta { post_id: id, kind, sequence, prior, predicted };
            post.reactions = predicted;
            self.pending.insert(id, delta);
            self.feed.hold_reaction(id);
            delta
        })
    }

    /// Take the pending entry if `delta` is still the latest for its post.
    fn take_if_latest(&self, delta: &ReactionDelta) -> bool {
        self.pending
            .remove_if(&delta.post_id, |_, latest| latest.sequence == delta.sequence)
            .is_some()
    }

    fn reconcile(&self, delta: ReactionDelta, server: ReactionSnapshot) -> ReactionOutcome {
        let applied = self.feed.update_one(delta.post_id, |post| {
            if !self.take_if_latest(&delta) {
                return false;
            }
            post.reactions = server;
            self.feed.settle_reaction(delta.post_id, true);
            true
        });
        match applied {
            Some(true) => {
                debug!(id = %delta.post_id, sequence = delta.sequence, "Reaction confirmed");
                ReactionOutcome::Confirmed(server)
            }
            Some(false) => {
                warn!(id = %delta.post_id, sequence = delta.sequence, "Discarding stale reaction response");
                ReactionOutcome::Superseded { sequence: delta.sequence }
            }
            None => {
                if self.take_if_latest(&delta) {
                    self.feed.settle_reaction(delta.post_id, false);
                }
                ReactionOutcome::Absent
            }
        }
    }

    async fn roll_back(&self, delta: ReactionDelta, error: ApiError) -> ReactionOutcome {
        let reverted = self.feed.update_one(delta.post_id, |post| {
            if !self.take_if_latest(&delta) {
                return false;
            }
            post.reactions = delta.prior;
            self.feed.settle_reaction(delta.post_id, false);
            true
        });
        match reverted {
            Some(true) => {}
            Some(false) => {
                warn!(id = %delta.post_id, sequence = delta.sequence, "Stale reaction failed: {}", error);
                return ReactionOutcome::Superseded { sequence: delta.sequence };
            }
            None => {
                if self.take_if_latest(&delta) {
                    self.feed.settle_reaction(delta.post_id, false);
                }
                return ReactionOutcome::Absent;
            }
        }

        warn!(id = %delta.post_id, kind = %delta.kind, "Reaction failed, resyncing feed: {}", error);
        // After a 401 the session is gone and a reload would only fail again.
        let resynced = if error.is_unauthorized() {
            false
        } else {
            match self.feed.reload(&self.gateway).await {
                Ok(applied) => applied,
                Err(e) => {
                    warn!("Feed resync failed: {}", e);
                    false
                }
            }
        };
        ReactionOutcome::Failed { error, resynced }
    }
}
