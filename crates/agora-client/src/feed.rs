//! The posts on screen.
//!
//! [`PostFeedStore`] is the single owner of the post collection. Everything else, the reaction
//! engine included, mutates posts through [`PostFeedStore::update_one`] and never keeps a copy.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use agora_types::{ApiError, Post, PostDraft, PostId};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::api;
use crate::gateway::RequestGateway;

#[derive(Debug)]
struct FeedInner {
    posts: RwLock<Vec<Post>>,
    /// Next provisional id; counts down from -1
    next_provisional: AtomicI64,
    refresh_generation: AtomicU64,
    /// Posts whose local reactions a reload must not overwrite. Locked after `posts`.
    reaction_holds: Mutex<HashMap<PostId, ReactionHold>>,
}

/// Why a post's local reaction counters outrank a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReactionHold {
    /// A toggle is in flight.
    Pending,
    /// Reconciled with the server while refresh generation `.0` was current.
    ConfirmedAt(u64),
}

/// Shared handle to the feed. Clones see the same posts.
#[derive(Debug, Clone)]
pub struct PostFeedStore {
    inner: Arc<FeedInner>,
}

impl Default for PostFeedStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that a reload was started; see [`PostFeedStore::begin_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

impl PostFeedStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(FeedInner {
                posts: RwLock::new(Vec::new()),
                next_provisional: AtomicI64::new(-1),
                refresh_generation: AtomicU64::new(0),
                reaction_holds: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Copy of the feed in display order.
    pub fn snapshot(&self) -> Vec<Post> {
        self.inner.posts.read().clone()
    }

    pub fn get(&self, id: PostId) -> Option<Post> {
        self.inner.posts.read().iter().find(|p| p.id == id).cloned()
    }

    pub fn contains(&self, id: PostId) -> bool {
        self.inner.posts.read().iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.inner.posts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.posts.read().is_empty()
    }

    /// Replace the whole feed, in the given order.
    ///
    /// Reloads that were started before this call will be discarded when they finish.
    pub fn replace_all(&self, posts: Vec<Post>) {
        let mut guard = self.inner.posts.write();
        self.inner.refresh_generation.fetch_add(1, Ordering::SeqCst);
        self.inner.reaction_holds.lock().retain(|_, hold| *hold == ReactionHold::Pending);
        debug!(count = posts.len(), "Feed replaced");
        *guard = posts;
    }

    /// Drop every post, e.g. on logout.
    pub fn clear(&self) {
        self.replace_all(Vec::new());
    }

    /// Append a predicted post under a fresh provisional id.
    pub fn insert_optimistic(&self, draft: PostDraft) -> PostId {
        let id = PostId(self.inner.next_provisional.fetch_sub(1, Ordering::SeqCst));
        self.inner.posts.write().push(draft.into_post(id));
        debug!(%id, "Inserted provisional post");
        id
    }

    /// Swap a provisional post for the one the server created.
    ///
    /// If a reload already brought the created post in, the provisional entry is just dropped.
    /// Returns `false` when the provisional entry is gone (the feed was cleared meanwhile).
    pub fn confirm(&self, provisional: PostId, post: Post) -> bool {
        let mut posts = self.inner.posts.write();
        let Some(index) = posts.iter().position(|p| p.id == provisional) else {
            return false;
        };
        if posts.iter().any(|p| p.id == post.id) {
            posts.remove(index);
        } else {
            debug!(%provisional, id = %post.id, "Confirmed provisional post");
            posts[index] = post;
        }
        true
    }

    /// Drop a provisional post whose create failed.
    pub fn discard(&self, provisional: PostId) -> bool {
        let mut posts = self.inner.posts.write();
        let before = posts.len();
        posts.retain(|p| p.id != provisional);
        before != posts.len()
    }

    /// Remove a post ahead of its delete request.
    ///
    /// The returned [`RemovalUndo`] puts it back where it was if the request fails.
    pub fn remove_optimistic(&self, id: PostId) -> Option<RemovalUndo> {
        let mut posts = self.inner.posts.write();
        let index = posts.iter().position(|p| p.id == id)?;
        let post = posts.remove(index);
        debug!(%id, index, "Removed post optimistically");
        Some(RemovalUndo { store: self.clone(), index, post })
    }

    /// Mutate one post in place. Does nothing (and returns `None`) when the post is absent.
    ///
    /// The mutator runs under the feed lock and must not block.
    pub fn update_one<R>(&self, id: PostId, mutator: impl FnOnce(&mut Post) -> R) -> Option<R> {
        let mut posts = self.inner.posts.write();
        posts.iter_mut().find(|p| p.id == id).map(mutator)
    }

    /// Start a reload; pass the ticket to [`PostFeedStore::finish_refresh`] with the result.
    pub fn begin_refresh(&self) -> RefreshTicket {
        let generation = self.inner.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;
        RefreshTicket { generation }
    }

    /// Apply a reload result unless a newer reload (or [`PostFeedStore::replace_all`]) started
    /// after `ticket` was issued.
    ///
    /// Provisional posts survive the reload since their creates are still in flight. Posts with a
    /// toggle in flight, or reconciled after `ticket` was issued, keep their local reactions.
    pub fn finish_refresh(&self, ticket: RefreshTicket, mut fetched: Vec<Post>) -> bool {
        let mut posts = self.inner.posts.write();
        if self.inner.refresh_generation.load(Ordering::SeqCst) != ticket.generation {
            warn!(generation = ticket.generation, "Discarding stale feed reload");
            return false;
        }

        let mut holds = self.inner.reaction_holds.lock();
        holds.retain(|_, hold| match hold {
            ReactionHold::Pending => true,
            ReactionHold::ConfirmedAt(generation) => *generation >= ticket.generation,
        });
        for post in &mut fetched {
            if !holds.contains_key(&post.id) {
                continue;
            }
            if let Some(local) = posts.iter().find(|p| p.id == post.id) {
                debug!(id = %post.id, "Keeping newer local reactions over reload");
                post.reactions = local.reactions;
            }
        }
        drop(holds);

        fetched.extend(posts.iter().filter(|p| p.id.is_provisional()).cloned());
        debug!(count = fetched.len(), "Feed reloaded");
        *posts = fetched;
        true
    }

    /// Mark a post's reactions as predicted locally until [`PostFeedStore::settle_reaction`].
    ///
    /// Takes only the hold lock, so it may be called from inside [`PostFeedStore::update_one`].
    pub(crate) fn hold_reaction(&self, id: PostId) {
        self.inner.reaction_holds.lock().insert(id, ReactionHold::Pending);
    }

    /// End the hold placed by [`PostFeedStore::hold_reaction`].
    ///
    /// With `confirmed`, the counters came from the server just now and outrank any reload
    /// already in flight. Otherwise the next reload wins.
    pub(crate) fn settle_reaction(&self, id: PostId, confirmed: bool) {
        let mut holds = self.inner.reaction_holds.lock();
        if confirmed {
            let generation = self.inner.refresh_generation.load(Ordering::SeqCst);
            holds.insert(id, ReactionHold::ConfirmedAt(generation));
        } else {
            holds.remove(&id);
        }
    }

    /// Fetch `posts/` and apply it. Returns whether the result was applied.
    pub async fn reload(&self, gateway: &RequestGateway) -> Result<bool, ApiError> {
        let ticket = self.begin_refresh();
        let posts = api::posts::list(gateway).await?;
        Ok(self.finish_refresh(ticket, posts))
    }
}

/// A removed post and where it was.
#[derive(Debug)]
#[must_use = "dropping the undo makes the removal permanent"]
pub struct RemovalUndo {
    store: PostFeedStore,
    index: usize,
    post: Post,
}

impl RemovalUndo {
    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Put the post back at its prior position, or at the end if the feed shrank.
    ///
    /// A reload that already brought the post back wins; nothing is inserted then.
    pub fn undo(self) -> bool {
        let mut posts = self.store.inner.posts.write();
        if posts.iter().any(|p| p.id == self.post.id) {
            return false;
        }
        let index = self.index.min(posts.len());
        debug!(id = %self.post.id, index, "Restoring removed post");
        posts.insert(index, self.post);
        true
    }
}
