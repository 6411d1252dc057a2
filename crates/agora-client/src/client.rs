use std::sync::Arc;

use agora_types::{
    ApiError, FormRules, LoginForm, NewPost, Post, PostDraft, PostId, Profile, ProfileUpdate,
    ServerMessage, SignupForm,
};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::api;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::feed::PostFeedStore;
use crate::gateway::{HttpTransport, RequestGateway, Transport};
use crate::reaction::{ReactionEngine, ReactionOutcome};
use crate::session::{AuthSession, NavigationPort, SessionStore};

/// Facade over the session, the feed and the reaction engine.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct AgoraClient {
    config: ClientConfig,
    session: Arc<AuthSession>,
    gateway: Arc<RequestGateway>,
    feed: PostFeedStore,
    reactions: ReactionEngine,
    profile: RwLock<Option<Profile>>,
}

impl AgoraClient {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
        navigation: Arc<dyn NavigationPort>,
    ) -> Result<Self, ClientError> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Self::with_transport(config, transport, store, navigation)
    }

    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        navigation: Arc<dyn NavigationPort>,
    ) -> Result<Self, ClientError> {
        let api_root = config.api_root()?;
        let session = Arc::new(AuthSession::init(store, navigation));
        let gateway = Arc::new(RequestGateway::new(api_root, transport, session.clone()));
        let feed = PostFeedStore::new();
        let reactions = ReactionEngine::new(gateway.clone(), feed.clone());
        Ok(Self { config, session, gateway, feed, reactions, profile: RwLock::new(None) })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    pub fn gateway(&self) -> &Arc<RequestGateway> {
        &self.gateway
    }

    pub fn feed(&self) -> &PostFeedStore {
        &self.feed
    }

    pub fn reactions(&self) -> &ReactionEngine {
        &self.reactions
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// The signed-in user's profile, once loaded.
    pub fn profile(&self) -> Option<Profile> {
        if !self.session.is_authenticated() {
            return None;
        }
        self.profile.read().clone()
    }

    /// Whether the delete affordance should be offered for `post`.
    pub fn can_delete(&self, post: &Post) -> bool {
        !post.id.is_provisional() && self.profile().is_some_and(|profile| post.is_authored_by(&profile))
    }

    pub fn media_url(&self, reference: Option<&str>) -> Option<String> {
        self.config.resolve_media_url(reference)
    }

    /// Exchange credentials for a token, then load the profile.
    pub async fn login(&self, form: LoginForm) -> Result<Profile, ClientError> {
        form.check()?;
        let response = self.api(api::auth::login(&self.gateway, &form).await)?;
        self.session.set_token(response.access);
        info!(email = %form.email, "Logged in");
        self.load_profile().await
    }

    /// Register an account. The session starts right away if the server hands out a token.
    pub async fn signup(&self, form: SignupForm) -> Result<ServerMessage, ClientError> {
        form.check()?;
        let ack = self.api(api::auth::signup(&self.gateway, &form).await)?;
        if let Some(token) = ack.access.clone() {
            self.session.set_token(token);
        }
        info!(email = %form.email, signed_in = ack.access.is_some(), "Account created");
        Ok(ack)
    }

    pub fn logout(&self) {
        self.session.logout();
        self.drop_session_state();
    }

    pub async fn load_profile(&self) -> Result<Profile, ClientError> {
        let profile = self.api(api::profile::fetch(&self.gateway).await)?;
        *self.profile.write() = Some(profile.clone());
        Ok(profile)
    }

    /// Save profile edits and return the profile as the server now has it.
    pub async fn update_profile(&self, form: ProfileUpdate) -> Result<Profile, ClientError> {
        form.check()?;
        let ack = self.api(api::profile::update(&self.gateway, &form).await)?;
        debug!(message = ?ack.message, "Profile updated");
        self.load_profile().await
    }

    pub async fn refresh_feed(&self) -> Result<Vec<Post>, ClientError> {
        self.api(self.feed.reload(&self.gateway).await)?;
        Ok(self.feed.snapshot())
    }

    /// Publish a post. It shows up in the feed under a provisional id until the server answers.
    pub async fn create_post(&self, form: NewPost) -> Result<Post, ClientError> {
        form.check()?;
        let author = match self.profile() {
            Some(profile) => profile,
            None => self.load_profile().await?,
        };
        let provisional = self.feed.insert_optimistic(PostDraft {
            description: form.description.clone(),
            image: None,
            author_id: author.id,
            author_name: author.full_name,
            author_avatar: author.avatar,
        });

        match api::posts::create(&self.gateway, &form).await {
            Ok(post) => {
                self.feed.confirm(provisional, post.clone());
                info!(id = %post.id, "Post published");
                Ok(post)
            }
            Err(error) => {
                self.feed.discard(provisional);
                // The post may exist server-side when the answer was lost or garbled.
                if matches!(
                    error,
                    ApiError::Transport { .. } | ApiError::Server { .. } | ApiError::Decode { .. }
                ) {
                    self.resync().await;
                }
                Err(self.api_error(error))
            }
        }
    }

    /// Delete a post. It disappears at once and comes back in place if the server refuses.
    pub async fn delete_post(&self, id: PostId) -> Result<ServerMessage, ClientError> {
        if id.is_provisional() {
            return Err(ClientError::Unpublished(id));
        }
        let undo = self.feed.remove_optimistic(id);
        match api::posts::delete(&self.gateway, id).await {
            Ok(ack) => {
                if let Some(undo) = undo {
                    debug!(id = %undo.post().id, "Post deleted");
                }
                Ok(ack)
            }
            Err(error) => {
                if let Some(undo) = undo {
                    undo.undo();
                }
                Err(self.api_error(error))
            }
        }
    }

    pub async fn toggle_like(&self, id: PostId) -> ReactionOutcome {
        let outcome = self.reactions.toggle_like(id).await;
        self.observe_reaction(&outcome);
        outcome
    }

    pub async fn toggle_dislike(&self, id: PostId) -> ReactionOutcome {
        let outcome = self.reactions.toggle_dislike(id).await;
        self.observe_reaction(&outcome);
        outcome
    }

    fn observe_reaction(&self, outcome: &ReactionOutcome) {
        if let ReactionOutcome::Failed { error, .. } = outcome {
            // The resync reload can hit the 401 even when the toggle itself failed otherwise.
            if error.is_unauthorized() || !self.session.is_authenticated() {
                self.drop_session_state();
            }
        }
    }

    async fn resync(&self) {
        if let Err(e) = self.feed.reload(&self.gateway).await {
            warn!("Feed resync failed: {}", e);
            if e.is_unauthorized() {
                self.drop_session_state();
            }
        }
    }

    fn api<T>(&self, result: Result<T, ApiError>) -> Result<T, ClientError> {
        result.map_err(|error| self.api_error(error))
    }

    /// Drops cached user data when the error tore the session down.
    fn api_error(&self, error: ApiError) -> ClientError {
        if error.is_unauthorized() {
            self.drop_session_state();
        }
        ClientError::Api(error)
    }

    fn drop_session_state(&self) {
        self.profile.write().take();
        self.feed.clear();
    }
}
