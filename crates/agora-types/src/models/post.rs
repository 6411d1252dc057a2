//! Post model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::{Profile, UserId};
use super::reaction::{ConflictingReaction, ReactionSnapshot};

/// Post identifier.
///
/// Server-assigned ids are positive. Negative ids are provisional: they are handed out to
/// optimistically inserted posts and never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl PostId {
    /// Whether this id was assigned locally and has no server counterpart yet.
    pub const fn is_provisional(self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A post as shown in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PostRecord", into = "PostRecord")]
pub struct Post {
    pub id: PostId,
    pub description: String,
    /// Media reference, relative to the service origin or absolute
    pub image: Option<String>,
    pub author_id: UserId,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Counters and the viewer's own reaction
    pub reactions: ReactionSnapshot,
}

impl Post {
    pub const fn likes(&self) -> u32 {
        self.reactions.likes
    }

    pub const fn dislikes(&self) -> u32 {
        self.reactions.dislikes
    }

    pub const fn user_liked(&self) -> bool {
        self.reactions.user_liked()
    }

    pub const fn user_disliked(&self) -> bool {
        self.reactions.user_disliked()
    }

    /// Whether `profile` wrote this post (and may therefore delete it).
    pub fn is_authored_by(&self, profile: &Profile) -> bool {
        self.author_id == profile.id
    }
}

/// Client-side prediction of a post that is being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub description: String,
    pub image: Option<String>,
    pub author_id: UserId,
    pub author_name: String,
    pub author_avatar: Option<String>,
}

impl PostDraft {
    /// Materialize the draft under a provisional id with zeroed counters.
    pub fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            description: self.description,
            image: self.image,
            author_id: self.author_id,
            author_name: self.author_name,
            author_avatar: self.author_avatar,
            created_at: Utc::now(),
            reactions: ReactionSnapshot::default(),
        }
    }
}

/// Wire shape of a post as returned by `GET posts/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostRecord {
    id: PostId,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
    user: UserId,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    user_pic: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    likes: u32,
    #[serde(default)]
    dislikes: u32,
    #[serde(default)]
    user_liked: bool,
    #[serde(default)]
    user_disliked: bool,
}

impl TryFrom<PostRecord> for Post {
    type Error = ConflictingReaction;

    fn try_from(record: PostRecord) -> Result<Self, Self::Error> {
        let reactions = ReactionSnapshot::from_parts(
            record.likes,
            record.dislikes,
            record.user_liked,
            record.user_disliked,
        )?;
        Ok(Self {
            id: record.id,
            description: record.description.unwrap_or_default(),
            image: record.image.filter(|s| !s.is_empty()),
            author_id: record.user,
            author_name: record.user_name.unwrap_or_default(),
            author_avatar: record.user_pic.filter(|s| !s.is_empty()),
            created_at: record.created_at,
            reactions,
        })
    }
}

impl From<Post> for PostRecord {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            description: Some(post.description),
            image: post.image,
            user: post.author_id,
            user_name: Some(post.author_name),
            user_pic: post.author_avatar,
            created_at: post.created_at,
            likes: post.reactions.likes,
            dislikes: post.reactions.dislikes,
            user_liked: post.reactions.user_liked(),
            user_disliked: post.reactions.user_disliked(),
        }
    }
}
