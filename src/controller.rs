//! Async driver of the game
//!
//! The controller turns player actions into server requests. For every
//! action it asks the [`Game`] for a ticket, performs the request without
//! holding the game lock, and hands the reply back to the game. It also
//! starts the scoreboard poll when a round begins and stops it when the
//! game leaves the playing screen.

use std::sync::Arc;

use derive_where::derive_where;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::{
    api::GameApi,
    config::ClientConfig,
    game::{Game, LoadTicket, RoundOutcome, Ticket, Trigger},
    poller::{Poller, Step},
    session,
    view::{ScreenKind, View},
};

struct Inner<A, V> {
    api: A,
    view: V,
    game: Mutex<Game>,
    poller: Mutex<Option<Poller>>,
    config: ClientConfig,
}

/// Connects the game state machine to the server and the view
///
/// Cloning is cheap; clones drive the same game.
#[derive_where(Clone)]
pub struct Controller<A, V> {
    inner: Arc<Inner<A, V>>,
}

impl<A, V> Controller<A, V>
where
    A: GameApi + 'static,
    V: View + 'static,
{
    /// Creates a controller on the setup screen
    ///
    /// # Arguments
    ///
    /// * `api` - Server to talk to
    /// * `view` - Where display updates go
    /// * `config` - Client timings
    pub fn new(api: A, view: V, config: ClientConfig) -> Self {
        let game = Game::new(config.notice_duration);
        Self {
            inner: Arc::new(Inner {
                api,
                view,
                game: Mutex::new(game),
                poller: Mutex::new(None),
                config,
            }),
        }
    }

    /// The view updates are sent to
    pub fn view(&self) -> &V {
        &self.inner.view
    }

    /// Runs `f` with read access to the game
    pub fn with_game<R>(&self, f: impl FnOnce(&Game) -> R) -> R {
        f(&self.inner.game.lock())
    }

    /// Whether the scoreboard poll is running
    pub fn is_polling(&self) -> bool {
        self.inner
            .poller
            .lock()
            .as_ref()
            .is_some_and(Poller::is_running)
    }

    /// Resends the whole visible state to the view
    pub fn sync(&self) {
        self.inner.game.lock().sync(&self.inner.view);
    }

    /// Adds an empty player slot
    ///
    /// # Errors
    ///
    /// Returns `session::Error::TooManyPlayers` if the roster is full.
    pub fn add_player(&self) -> Result<(), session::Error> {
        self.inner.game.lock().add_player_slot(&self.inner.view)
    }

    /// Removes a player slot, keeping at least one
    pub fn remove_player(&self, index: usize) -> bool {
        self.inner
            .game
            .lock()
            .remove_player_slot(index, &self.inner.view)
    }

    /// Changes the name in a player slot
    ///
    /// # Errors
    ///
    /// Returns `session::Error::NameTooLong` if the name is over the limit.
    pub fn set_player_name(&self, index: usize, name: &str) -> Result<(), session::Error> {
        self.inner
            .game
            .lock()
            .set_player_name(index, name, &self.inner.view)
    }

    /// Creates a session from the roster and starts the game
    pub async fn create_session(&self) {
        let admitted = self.inner.game.lock().begin_create_session(&self.inner.view);
        let Some((ticket, request)) = admitted else {
            return;
        };
        info!(players = request.players.len(), "creating session");

        let reply = self.inner.api.create_session(&request).await;
        let start = self
            .inner
            .game
            .lock()
            .finish_create_session(ticket, reply, &self.inner.view);
        if let Some(start) = start {
            self.run_start(start).await;
        }
    }

    /// Starts the game for a session that already exists
    pub async fn start(&self) {
        let admitted = self.inner.game.lock().begin_start(&self.inner.view);
        if let Some(ticket) = admitted {
            self.run_start(ticket).await;
        }
    }

    async fn run_start(&self, ticket: Ticket) {
        let reply = self.inner.api.start_game().await;
        let outcome = self
            .inner
            .game
            .lock()
            .finish_start(ticket, reply, &self.inner.view);
        self.after_round(outcome).await;
    }

    /// Unlocks another photo of the current round
    pub async fn unlock(&self) {
        let admitted = self.inner.game.lock().begin_unlock(&self.inner.view);
        let Some(ticket) = admitted else {
            return;
        };
        let reply = self.inner.api.unlock_photo().await;
        self.inner
            .game
            .lock()
            .finish_unlock(ticket, reply, &self.inner.view);
    }

    /// Reveals the answer of the current round
    pub async fn reveal(&self) {
        let admitted = self.inner.game.lock().begin_reveal(&self.inner.view);
        let Some(ticket) = admitted else {
            return;
        };
        let reply = self.inner.api.reveal_answer().await;
        self.inner
            .game
            .lock()
            .finish_reveal(ticket, reply, &self.inner.view);
    }

    /// Moves on to the next round
    pub async fn next_round(&self) {
        let admitted = self
            .inner
            .game
            .lock()
            .begin_advance(Trigger::User, &self.inner.view);
        if let Some(ticket) = admitted {
            self.run_advance(ticket).await;
        }
    }

    async fn run_advance(&self, ticket: Ticket) {
        let reply = self.inner.api.advance_round().await;
        let outcome = self
            .inner
            .game
            .lock()
            .finish_advance(ticket, reply, &self.inner.view);
        self.after_round(outcome).await;
    }

    /// Shows the photo at `index` among those unlocked
    pub fn seek(&self, index: usize) -> bool {
        self.inner.game.lock().seek(index, &self.inner.view)
    }

    /// Shows the following unlocked photo
    pub fn next_photo(&self) -> bool {
        self.inner.game.lock().next_photo(&self.inner.view)
    }

    /// Shows the preceding photo
    pub fn prev_photo(&self) -> bool {
        self.inner.game.lock().prev_photo(&self.inner.view)
    }

    /// Reports that the view finished loading a photo
    ///
    /// # Arguments
    ///
    /// * `ticket` - The ticket received with `UpdateMessage::ShowPhoto`
    /// * `loaded` - Whether the image loaded successfully
    pub fn image_loaded(&self, ticket: LoadTicket, loaded: bool) {
        self.inner
            .game
            .lock()
            .image_loaded(ticket, loaded, &self.inner.view);
    }

    /// Leaves the final screen for a new setup
    pub fn new_game(&self) -> bool {
        let changed = self.inner.game.lock().new_game(&self.inner.view);
        if changed {
            self.sync_poller();
        }
        changed
    }

    /// Fetches and shows how many rounds remain
    pub async fn refresh_stats(&self) {
        let reply = self.inner.api.stats().await;
        self.inner.game.lock().apply_stats(reply, &self.inner.view);
    }

    async fn after_round(&self, outcome: RoundOutcome) {
        if outcome == RoundOutcome::Unchanged {
            return;
        }
        self.sync_poller();
        self.refresh_stats().await;
    }

    /// Runs the poll while playing and stops it otherwise
    fn sync_poller(&self) {
        let playing = self.inner.game.lock().screen_kind() == ScreenKind::Playing;
        let mut poller = self.inner.poller.lock();
        if !playing {
            if let Some(poller) = poller.take() {
                poller.stop();
                debug!("poller stopped by screen change");
            }
            return;
        }
        if poller.as_ref().is_some_and(Poller::is_running) {
            return;
        }
        let controller = self.clone();
        *poller = Some(Poller::spawn(self.inner.config.poll_interval, move || {
            let controller = controller.clone();
            async move { controller.poll_once().await }
        }));
    }

    /// One scoreboard poll, possibly followed by the advance it triggers
    async fn poll_once(&self) -> Step {
        let admitted = self.inner.game.lock().begin_poll();
        let Some(ticket) = admitted else {
            return Step::Stop;
        };
        let reply = self.inner.api.scoreboard().await;
        let advance = self
            .inner
            .game
            .lock()
            .observe_scoreboard(ticket, reply, &self.inner.view);
        if let Some(advance) = advance {
            self.run_advance(advance).await;
        }
        Step::Continue
    }
}
