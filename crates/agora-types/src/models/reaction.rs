//! Like/dislike state machine.
//!
//! A post carries the viewer's own reaction as one of three states. The pair of wire flags
//! `(user_liked, user_disliked)` maps onto these states; `(true, true)` has no state and is
//! rejected when decoding.
//!
//! ```text
//!             like                      dislike
//!   Neutral ────────▶ Liked    Neutral ────────▶ Disliked
//!   Liked   ────────▶ Neutral  Liked   ────────▶ Disliked
//!   Disliked ───────▶ Liked    Disliked ───────▶ Neutral
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which reaction button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    /// Thumbs up
    Like,
    /// Thumbs down
    Dislike,
}

impl ReactionKind {
    /// Path segment of the toggle endpoint (`posts/{id}/<segment>/`).
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// The viewer's reaction to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReactionState {
    /// Neither liked nor disliked
    #[default]
    Neutral,
    /// Liked
    Liked,
    /// Disliked
    Disliked,
}

impl ReactionState {
    /// Build a state from the wire flags. Returns `None` for `(true, true)`.
    pub const fn from_flags(user_liked: bool, user_disliked: bool) -> Option<Self> {
        match (user_liked, user_disliked) {
            (false, false) => Some(Self::Neutral),
            (true, false) => Some(Self::Liked),
            (false, true) => Some(Self::Disliked),
            (true, true) => None,
        }
    }

    pub const fn user_liked(self) -> bool {
        matches!(self, Self::Liked)
    }

    pub const fn user_disliked(self) -> bool {
        matches!(self, Self::Disliked)
    }

    /// State after pressing `kind`.
    pub const fn toggled(self, kind: ReactionKind) -> Self {
        match (self, kind) {
            (Self::Liked, ReactionKind::Like) | (Self::Disliked, ReactionKind::Dislike) => {
                Self::Neutral
            }
            (Self::Neutral | Self::Disliked, ReactionKind::Like) => Self::Liked,
            (Self::Neutral | Self::Liked, ReactionKind::Dislike) => Self::Disliked,
        }
    }
}

/// Returned when a payload claims the viewer both liked and disliked a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reaction payload has both user_liked and user_disliked set")]
pub struct ConflictingReaction;

/// Reaction counters of a post together with the viewer's own reaction.
///
/// This is also the body returned by `POST posts/{id}/like/` and `POST posts/{id}/dislike/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ReactionWire", into = "ReactionWire")]
pub struct ReactionSnapshot {
    /// Number of likes
    pub likes: u32,
    /// Number of dislikes
    pub dislikes: u32,
    /// The viewer's reaction
    pub state: ReactionState,
}

impl ReactionSnapshot {
    pub const fn new(likes: u32, dislikes: u32, state: ReactionState) -> Self {
        Self { likes, dislikes, state }
    }

    /// Build a snapshot from wire fields.
    pub const fn from_parts(
        likes: u32,
        dislikes: u32,
        user_liked: bool,
        user_disliked: bool,
    ) -> Result<Self, ConflictingReaction> {
        match ReactionState::from_flags(user_liked, user_disliked) {
            Some(state) => Ok(Self { likes, dislikes, state }),
            None => Err(ConflictingReaction),
        }
    }

    pub const fn user_liked(&self) -> bool {
        self.state.user_liked()
    }

    pub const fn user_disliked(&self) -> bool {
        self.state.user_disliked()
    }

    /// Predicted snapshot after the viewer presses `kind`.
    ///
    /// The count for the reaction being left is decremented (floored at zero) and the count
    /// for the reaction being entered is incremented.
    #[must_use]
    pub const fn toggled(self, kind: ReactionKind) -> Self {
        let next = self.state.toggled(kind);
        let mut likes = self.likes;
        let mut dislikes = self.dislikes;

        match self.state {
            ReactionState::Liked => likes = likes.saturating_sub(1),
            ReactionState::Disliked => dislikes = dislikes.saturating_sub(1),
            ReactionState::Neutral => {}
        }
        match next {
            ReactionState::Liked => likes = likes.saturating_add(1),
            ReactionState::Disliked => dislikes = dislikes.saturating_add(1),
            ReactionState::Neutral => {}
        }

        Self { likes, dislikes, state: next }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ReactionWire {
    #[serde(default)]
    likes: u32,
    #[serde(default)]
    dislikes: u32,
    #[serde(default)]
    user_liked: bool,
    #[serde(default)]
    user_disliked: bool,
}

impl TryFrom<ReactionWire> for ReactionSnapshot {
    type Error = ConflictingReaction;

    fn try_from(wire: ReactionWire) -> Result<Self, Self::Error> {
        Self::from_parts(wire.likes, wire.dislikes, wire.user_liked, wire.user_disliked)
    }
}

impl From<ReactionSnapshot> for ReactionWire {
    fn from(snapshot: ReactionSnapshot) -> Self {
        Self {
            likes: snapshot.likes,
            dislikes: snapshot.dislikes,
            user_liked: snapshot.user_liked(),
            user_disliked: snapshot.user_disliked(),
        }
    }
}
