//! Round and game state machine
//!
//! This module owns everything the client knows about the game: which screen
//! is shown, the round being played, its photo carousel and the standings.
//! It performs no I/O. Every server-bound action is split in two steps: a
//! `begin_*` call checks the guards and hands out a [`Ticket`], and the
//! matching `finish_*` call applies the server reply carried with that ticket.
//! Only one ticket is outstanding at a time, which serializes user actions
//! with the advance triggered by the scoreboard poll.

use serde::Serialize;
use tracing::{debug, info, warn};
use web_time::Duration;

use super::{
    UpdateMessage,
    api::{AnswerReply, PhotoReply, RoundReply, RoundStart, ScoreboardReply, SessionReply, Stats},
    carousel::Carousel,
    error,
    round::Round,
    scoreboard::{ScoreEntry, Scoreboard},
    session::{self, CreateSession, Roster},
    view::{Notice, ScreenKind, View},
};

/// Texts of the notices raised by the state machine
mod text {
    pub const CONNECTION_ERROR: &str = "Server connection error";
    pub const PHOTO_LOAD_FAILED: &str = "Photo failed to load";
    pub const ALL_UNLOCKED: &str = "All photos are already unlocked";
    pub const NO_MORE_PHOTOS: &str = "No more photos";
    pub const SESSION_FAILED: &str = "Could not create the session";
    pub const START_FAILED: &str = "Could not start the game";
    pub const FAILED: &str = "Something went wrong";
}

/// What caused a round advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trigger {
    /// The player asked for the next round
    User,
    /// The scoreboard poll saw the server move on
    Poll,
}

/// Server-bound operations that require exclusive access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operation {
    /// Registering the players
    CreateSession,
    /// Starting the first round
    Start,
    /// Unlocking another photo
    Unlock,
    /// Revealing the answer
    Reveal,
    /// Moving to the next round
    Advance(Trigger),
}

/// Proof that an operation was admitted
///
/// A reply is only applied when handed back with the ticket that is
/// currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    operation: Operation,
    seq: u64,
    epoch: u64,
}

impl Ticket {
    /// The operation this ticket admits
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

/// Identifies one request to display a photo
///
/// Only the acknowledgement of the most recent request is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadTicket(u64);

/// Snapshot of the round identity taken before a scoreboard poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket {
    epoch: u64,
}

/// State of the playing screen
#[derive(Debug, Clone, PartialEq)]
pub struct Playing {
    /// The round being played
    pub round: Round,
    /// Photos unlocked this round
    pub carousel: Carousel,
    /// Latest standings
    pub scoreboard: Scoreboard,
    /// Highest round counter observed from the server
    pub last_round: u32,
}

/// The visible screen and the state that belongs to it
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Entering players
    Setup(Roster),
    /// Playing rounds
    Playing(Box<Playing>),
    /// Showing the final standings
    GameOver(Scoreboard),
}

impl Screen {
    /// Which screen this is
    pub fn kind(&self) -> ScreenKind {
        match self {
            Self::Setup(_) => ScreenKind::Setup,
            Self::Playing(_) => ScreenKind::Playing,
            Self::GameOver(_) => ScreenKind::GameOver,
        }
    }
}

/// Effect of a start or advance reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// A new round is being played
    Started,
    /// The game is over
    Finished,
    /// Nothing changed
    Unchanged,
}

/// Uppercases the first letter of an error message for display
fn sentence(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The client-side game
#[derive(Debug)]
pub struct Game {
    /// Current screen
    screen: Screen,
    /// Operation awaiting its reply
    in_flight: Option<Ticket>,
    /// Sequence number of the last ticket issued
    seq: u64,
    /// Bumped whenever a round or session is replaced
    epoch: u64,
    /// Photo display awaiting its load acknowledgement
    pending_load: Option<LoadTicket>,
    /// Sequence number of the last load ticket issued
    load_seq: u64,
    /// Last busy state announced
    busy: bool,
    /// How long notices stay visible
    notice_duration: Duration,
}

impl Game {
    /// Creates a game on the setup screen with an empty roster
    ///
    /// # Arguments
    ///
    /// * `notice_duration` - How long transient notices stay visible
    pub fn new(notice_duration: Duration) -> Self {
        Self {
            screen: Screen::Setup(Roster::default()),
            in_flight: None,
            seq: 0,
            epoch: 0,
            pending_load: None,
            load_seq: 0,
            busy: false,
            notice_duration,
        }
    }

    /// The current screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Which screen is shown
    pub fn screen_kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    /// State of the playing screen, if shown
    pub fn playing(&self) -> Option<&Playing> {
        match &self.screen {
            Screen::Playing(playing) => Some(playing),
            _ => None,
        }
    }

    /// The operation awaiting its reply, if any
    pub fn in_flight(&self) -> Option<Operation> {
        self.in_flight.map(|ticket| ticket.operation)
    }

    /// Whether an operation or a photo load is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || self.pending_load.is_some()
    }

    /// Current round identity
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Sends the complete state of the current screen to the view
    ///
    /// # Arguments
    ///
    /// * `view` - Where to send the updates
    pub fn sync<V: View + ?Sized>(&self, view: &V) {
        view.send(&UpdateMessage::Screen(self.screen_kind()));
        view.send(&UpdateMessage::Busy(self.is_busy()));
        match &self.screen {
            Screen::Setup(roster) => view.send(&roster.message().into()),
            Screen::Playing(playing) => {
                view.send(&playing.carousel.message().into());
                if let Some(photo) = playing.carousel.current() {
                    view.send(&UpdateMessage::ShowPhoto {
                        url: photo.url.clone(),
                        ticket: self.pending_load.unwrap_or(LoadTicket(self.load_seq)),
                    });
                }
                view.send(&UpdateMessage::CurrentPlayer(
                    playing.round.current_player.clone(),
                ));
                view.send(&UpdateMessage::Answer(
                    playing.round.answer.text().map(str::to_owned),
                ));
                view.send(&UpdateMessage::AnswerWaiting(
                    playing.round.answer.is_revealed(),
                ));
                view.send(&UpdateMessage::Scoreboard(playing.scoreboard.standings()));
            }
            Screen::GameOver(scoreboard) => {
                view.send(&UpdateMessage::FinalScoreboard(scoreboard.final_standings()));
            }
        }
    }
}

impl Game {
    /// Admits an operation and marks it in flight
    fn issue(&mut self, operation: Operation) -> Ticket {
        self.seq += 1;
        let ticket = Ticket {
            operation,
            seq: self.seq,
            epoch: self.epoch,
        };
        self.in_flight = Some(ticket);
        ticket
    }

    /// Clears the in-flight marker if `ticket` is the one outstanding
    ///
    /// # Returns
    ///
    /// `false` if the reply is stale and must be dropped
    fn settle(&mut self, ticket: Ticket) -> bool {
        if self.in_flight == Some(ticket) && ticket.epoch == self.epoch {
            self.in_flight = None;
            true
        } else {
            debug!(operation = ?ticket.operation, seq = ticket.seq, "ignoring stale reply");
            false
        }
    }

    /// Whether the guards of a new operation allow it to start
    fn idle(&self, operation: Operation) -> bool {
        match self.in_flight {
            Some(ticket) => {
                debug!(
                    requested = ?operation,
                    running = ?ticket.operation,
                    "operation already in flight"
                );
                false
            }
            None => true,
        }
    }

    fn update_busy<V: View + ?Sized>(&mut self, view: &V) {
        let busy = self.is_busy();
        if busy != self.busy {
            self.busy = busy;
            view.send(&UpdateMessage::Busy(busy));
        }
    }

    fn info<V: View + ?Sized>(&self, view: &V, text: impl Into<String>) {
        view.send(&Notice::info(text, self.notice_duration).into());
    }

    fn warning<V: View + ?Sized>(&self, view: &V, text: impl Into<String>) {
        view.send(&Notice::warning(text, self.notice_duration).into());
    }

    fn fail<V: View + ?Sized>(&self, view: &V, operation: Operation, error: &error::Error) {
        warn!(?operation, %error, "request failed");
        self.warning(view, text::CONNECTION_ERROR);
    }

    fn reject<V: View + ?Sized>(
        &self,
        view: &V,
        operation: Operation,
        reason: Option<String>,
        fallback: &str,
    ) {
        info!(?operation, reason = reason.as_deref(), "server refused");
        self.info(view, reason.unwrap_or_else(|| fallback.to_owned()));
    }

    /// Asks the view to display a photo, superseding any earlier request
    fn show_photo<V: View + ?Sized>(&mut self, view: &V, url: String) {
        self.load_seq += 1;
        let ticket = LoadTicket(self.load_seq);
        self.pending_load = Some(ticket);
        view.send(&UpdateMessage::ShowPhoto { url, ticket });
    }

    fn playing_mut(&mut self) -> Option<&mut Playing> {
        match &mut self.screen {
            Screen::Playing(playing) => Some(playing),
            _ => None,
        }
    }
}

impl Game {
    /// Adds an empty player slot on the setup screen
    ///
    /// # Errors
    ///
    /// Returns `session::Error::TooManyPlayers` if the roster is full; the
    /// error is also shown as a notice.
    pub fn add_player_slot<V: View + ?Sized>(&mut self, view: &V) -> Result<(), session::Error> {
        let Screen::Setup(roster) = &mut self.screen else {
            debug!("roster edit outside of setup");
            return Ok(());
        };
        match roster.add_slot() {
            Ok(_) => {
                view.send(&roster.message().into());
                Ok(())
            }
            Err(e) => {
                self.info(view, sentence(&e.to_string()));
                Err(e)
            }
        }
    }

    /// Removes a player slot on the setup screen
    ///
    /// # Returns
    ///
    /// `true` if a slot was removed
    pub fn remove_player_slot<V: View + ?Sized>(&mut self, index: usize, view: &V) -> bool {
        let Screen::Setup(roster) = &mut self.screen else {
            return false;
        };
        let removed = roster.remove_slot(index);
        if removed {
            view.send(&roster.message().into());
        }
        removed
    }

    /// Changes the name in a player slot on the setup screen
    ///
    /// # Errors
    ///
    /// Returns `session::Error::NameTooLong` if the name is over the limit.
    pub fn set_player_name<V: View + ?Sized>(
        &mut self,
        index: usize,
        name: &str,
        view: &V,
    ) -> Result<(), session::Error> {
        let Screen::Setup(roster) = &mut self.screen else {
            return Ok(());
        };
        roster.set_name(index, name)?;
        view.send(&roster.message().into());
        Ok(())
    }

    /// Starts creating a session from the roster
    ///
    /// # Returns
    ///
    /// The ticket and the request to send, or `None` if the game is not on
    /// the setup screen, is busy, or the roster is unusable (which is shown
    /// as a notice)
    pub fn begin_create_session<V: View + ?Sized>(
        &mut self,
        view: &V,
    ) -> Option<(Ticket, CreateSession)> {
        let Screen::Setup(roster) = &self.screen else {
            debug!("session creation outside of setup");
            return None;
        };
        if !self.idle(Operation::CreateSession) {
            return None;
        }
        match roster.to_request() {
            Ok(request) => {
                let ticket = self.issue(Operation::CreateSession);
                self.update_busy(view);
                Some((ticket, request))
            }
            Err(e) => {
                self.info(view, sentence(&e.to_string()));
                None
            }
        }
    }

    /// Applies the reply to session creation
    ///
    /// # Returns
    ///
    /// A ticket to start the game if the session was created
    pub fn finish_create_session<V: View + ?Sized>(
        &mut self,
        ticket: Ticket,
        reply: error::Result<SessionReply>,
        view: &V,
    ) -> Option<Ticket> {
        if !self.settle(ticket) {
            return None;
        }
        let start = match reply {
            Err(e) => {
                self.fail(view, ticket.operation, &e);
                None
            }
            Ok(SessionReply::Rejected(reason)) => {
                self.reject(view, ticket.operation, reason, text::SESSION_FAILED);
                None
            }
            Ok(SessionReply::Created) => {
                info!("session created");
                Some(self.issue(Operation::Start))
            }
        };
        self.update_busy(view);
        start
    }

    /// Starts the game from the setup screen
    ///
    /// # Returns
    ///
    /// A ticket if the game is on the setup screen and idle
    pub fn begin_start<V: View + ?Sized>(&mut self, view: &V) -> Option<Ticket> {
        if !matches!(self.screen, Screen::Setup(_)) || !self.idle(Operation::Start) {
            return None;
        }
        let ticket = self.issue(Operation::Start);
        self.update_busy(view);
        Some(ticket)
    }

    /// Applies the reply to starting the game
    pub fn finish_start<V: View + ?Sized>(
        &mut self,
        ticket: Ticket,
        reply: error::Result<RoundReply>,
        view: &V,
    ) -> RoundOutcome {
        self.finish_round(ticket, reply, text::START_FAILED, view)
    }

    /// Starts unlocking another photo
    ///
    /// If every photo of the round is already unlocked a notice is shown
    /// and no request is made.
    ///
    /// # Returns
    ///
    /// A ticket if an unlock request should be sent
    pub fn begin_unlock<V: View + ?Sized>(&mut self, view: &V) -> Option<Ticket> {
        let can_unlock = self.playing()?.carousel.can_unlock_more();
        if !self.idle(Operation::Unlock) {
            return None;
        }
        if !can_unlock {
            self.info(view, text::ALL_UNLOCKED);
            return None;
        }
        let ticket = self.issue(Operation::Unlock);
        self.update_busy(view);
        Some(ticket)
    }

    /// Applies the reply to unlocking a photo
    pub fn finish_unlock<V: View + ?Sized>(
        &mut self,
        ticket: Ticket,
        reply: error::Result<PhotoReply>,
        view: &V,
    ) {
        if !self.settle(ticket) {
            return;
        }
        match reply {
            Err(e) => self.fail(view, ticket.operation, &e),
            Ok(PhotoReply::Rejected(reason)) => {
                self.reject(view, ticket.operation, reason, text::NO_MORE_PHOTOS);
            }
            Ok(PhotoReply::Unlocked { url, total_photos }) => {
                if let Some(playing) = self.playing_mut() {
                    if let Some(total) = total_photos {
                        playing.carousel.set_total_available(total);
                    }
                    let photo = playing.carousel.unlock(url.clone());
                    info!(position = photo.position, "photo unlocked");
                    view.send(&playing.carousel.message().into());
                    self.show_photo(view, url);
                }
            }
        }
        self.update_busy(view);
    }

    /// Starts revealing the answer
    ///
    /// Refused without a notice if the answer is already revealed or another
    /// operation is in flight.
    ///
    /// # Returns
    ///
    /// A ticket if a reveal request should be sent
    pub fn begin_reveal<V: View + ?Sized>(&mut self, view: &V) -> Option<Ticket> {
        if self.playing()?.round.answer.is_revealed() {
            debug!("answer already revealed");
            return None;
        }
        if !self.idle(Operation::Reveal) {
            return None;
        }
        let ticket = self.issue(Operation::Reveal);
        self.update_busy(view);
        Some(ticket)
    }

    /// Applies the reply to revealing the answer
    pub fn finish_reveal<V: View + ?Sized>(
        &mut self,
        ticket: Ticket,
        reply: error::Result<AnswerReply>,
        view: &V,
    ) {
        if !self.settle(ticket) {
            return;
        }
        match reply {
            Err(e) => self.fail(view, ticket.operation, &e),
            Ok(AnswerReply::Rejected(reason)) => {
                self.reject(view, ticket.operation, reason, text::FAILED);
            }
            Ok(AnswerReply::Revealed(answer)) => {
                if let Some(playing) = self.playing_mut() {
                    if playing.round.reveal(answer.clone()) {
                        info!(round = playing.round.number, "answer revealed");
                        view.send(&UpdateMessage::Answer(Some(answer)));
                        view.send(&UpdateMessage::AnswerWaiting(true));
                    }
                }
            }
        }
        self.update_busy(view);
    }

    /// Starts moving to the next round
    ///
    /// The player may skip a round at any time; the poll only advances once
    /// the answer has been revealed.
    ///
    /// # Returns
    ///
    /// A ticket if an advance request should be sent
    pub fn begin_advance<V: View + ?Sized>(&mut self, trigger: Trigger, view: &V) -> Option<Ticket> {
        let revealed = self.playing()?.round.answer.is_revealed();
        if trigger == Trigger::Poll && !revealed {
            debug!("answer not revealed yet");
            return None;
        }
        let operation = Operation::Advance(trigger);
        if !self.idle(operation) {
            return None;
        }
        let ticket = self.issue(operation);
        self.update_busy(view);
        Some(ticket)
    }

    /// Applies the reply to moving to the next round
    ///
    /// The carousel is only reset when the server actually starts a new
    /// round; any failure leaves the current round as it was.
    pub fn finish_advance<V: View + ?Sized>(
        &mut self,
        ticket: Ticket,
        reply: error::Result<RoundReply>,
        view: &V,
    ) -> RoundOutcome {
        self.finish_round(ticket, reply, text::FAILED, view)
    }

    fn finish_round<V: View + ?Sized>(
        &mut self,
        ticket: Ticket,
        reply: error::Result<RoundReply>,
        fallback: &str,
        view: &V,
    ) -> RoundOutcome {
        if !self.settle(ticket) {
            return RoundOutcome::Unchanged;
        }
        let outcome = match reply {
            Err(e) => {
                self.fail(view, ticket.operation, &e);
                RoundOutcome::Unchanged
            }
            Ok(RoundReply::Rejected(reason)) => {
                self.reject(view, ticket.operation, reason, fallback);
                RoundOutcome::Unchanged
            }
            Ok(RoundReply::Round(start)) => {
                self.enter_round(start, view);
                RoundOutcome::Started
            }
            Ok(RoundReply::GameOver { scoreboard }) => {
                self.enter_game_over(scoreboard, view);
                RoundOutcome::Finished
            }
        };
        self.update_busy(view);
        outcome
    }

    /// Replaces the current round with a fresh one
    fn enter_round<V: View + ?Sized>(&mut self, start: RoundStart, view: &V) {
        self.epoch += 1;
        self.pending_load = None;

        let RoundStart {
            photo_url,
            total_photos,
            current_player,
            scoreboard,
            current_round,
        } = start;
        let scoreboard = Scoreboard::from_entries(scoreboard);

        let entered = match &mut self.screen {
            Screen::Playing(playing) => {
                let number = current_round.unwrap_or(playing.round.number + 1);
                playing.carousel.reset();
                playing.round = Round::new(number, current_player);
                playing.scoreboard = scoreboard;
                if let Some(round) = current_round {
                    playing.last_round = round;
                }
                false
            }
            screen => {
                *screen = Screen::Playing(Box::new(Playing {
                    round: Round::new(current_round.unwrap_or(1), current_player),
                    carousel: Carousel::default(),
                    scoreboard,
                    last_round: current_round.unwrap_or_default(),
                }));
                true
            }
        };
        if entered {
            view.send(&UpdateMessage::Screen(ScreenKind::Playing));
        }

        let Screen::Playing(playing) = &mut self.screen else {
            return;
        };
        playing.carousel.set_total_available(total_photos);
        playing.carousel.unlock(photo_url.clone());
        info!(
            round = playing.round.number,
            photos = playing.carousel.total_available(),
            "round started"
        );

        view.send(&playing.carousel.message().into());
        view.send(&UpdateMessage::CurrentPlayer(
            playing.round.current_player.clone(),
        ));
        view.send(&UpdateMessage::Answer(None));
        view.send(&UpdateMessage::AnswerWaiting(false));
        view.send(&UpdateMessage::Scoreboard(playing.scoreboard.standings()));
        self.show_photo(view, photo_url);
    }

    fn enter_game_over<V: View + ?Sized>(&mut self, entries: Vec<ScoreEntry>, view: &V) {
        self.epoch += 1;
        self.pending_load = None;

        let scoreboard = Scoreboard::from_entries(entries);
        info!(
            winner = scoreboard.leader().map(|entry| entry.name.as_str()),
            "game over"
        );
        view.send(&UpdateMessage::FinalScoreboard(scoreboard.final_standings()));
        self.screen = Screen::GameOver(scoreboard);
        view.send(&UpdateMessage::Screen(ScreenKind::GameOver));
    }
}

impl Game {
    /// Moves the carousel cursor to a given photo
    ///
    /// Out-of-range indices are ignored.
    ///
    /// # Returns
    ///
    /// `true` if another photo is now displayed
    pub fn seek<V: View + ?Sized>(&mut self, index: usize, view: &V) -> bool {
        self.browse(view, |carousel| carousel.seek(index))
    }

    /// Displays the following unlocked photo, if any
    pub fn next_photo<V: View + ?Sized>(&mut self, view: &V) -> bool {
        self.browse(view, Carousel::next)
    }

    /// Displays the preceding photo, if any
    pub fn prev_photo<V: View + ?Sized>(&mut self, view: &V) -> bool {
        self.browse(view, Carousel::prev)
    }

    fn browse<V, F>(&mut self, view: &V, step: F) -> bool
    where
        V: View + ?Sized,
        F: FnOnce(&mut Carousel) -> bool,
    {
        let Some(playing) = self.playing_mut() else {
            return false;
        };
        if !step(&mut playing.carousel) {
            debug!(cursor = playing.carousel.cursor(), "carousel did not move");
            return false;
        }
        view.send(&playing.carousel.message().into());
        let url = playing.carousel.current().map(|photo| photo.url.clone());
        if let Some(url) = url {
            self.show_photo(view, url);
        }
        self.update_busy(view);
        true
    }

    /// Records that the view finished loading a photo
    ///
    /// Acknowledgements of superseded display requests are ignored, so a
    /// slow image can never hide the spinner of a newer one.
    ///
    /// # Arguments
    ///
    /// * `ticket` - The ticket sent with the display request
    /// * `loaded` - Whether the image loaded successfully
    /// * `view` - Where to send the updates
    pub fn image_loaded<V: View + ?Sized>(&mut self, ticket: LoadTicket, loaded: bool, view: &V) {
        if self.pending_load != Some(ticket) {
            debug!(?ticket, "ignoring superseded photo load");
            return;
        }
        self.pending_load = None;
        if !loaded {
            warn!(?ticket, "photo failed to load");
            self.warning(view, text::PHOTO_LOAD_FAILED);
        }
        self.update_busy(view);
    }

    /// Takes a snapshot of the round identity before polling
    ///
    /// # Returns
    ///
    /// `None` unless a round is being played
    pub fn begin_poll(&self) -> Option<PollTicket> {
        self.playing().map(|_| PollTicket { epoch: self.epoch })
    }

    /// Merges a scoreboard poll into the game
    ///
    /// The standings are always replaced. If the server's round counter
    /// moved past the last one seen while the answer is revealed, the round
    /// is over on the server and an advance is admitted in the same step.
    /// When another operation is in flight the counter is left untouched so
    /// the next poll tries again.
    ///
    /// # Returns
    ///
    /// A ticket for the advance the poll triggered, if any
    pub fn observe_scoreboard<V: View + ?Sized>(
        &mut self,
        ticket: PollTicket,
        reply: error::Result<ScoreboardReply>,
        view: &V,
    ) -> Option<Ticket> {
        if ticket.epoch != self.epoch {
            debug!(epoch = ticket.epoch, "ignoring stale scoreboard");
            return None;
        }
        let snapshot = match reply {
            Ok(ScoreboardReply::Snapshot(snapshot)) => snapshot,
            Ok(ScoreboardReply::Rejected(reason)) => {
                debug!(reason = reason.as_deref(), "scoreboard refused");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "scoreboard poll failed");
                return None;
            }
        };

        let busy = self.in_flight.is_some();
        let playing = self.playing_mut()?;
        playing.scoreboard = Scoreboard::from_entries(snapshot.entries);
        view.send(&UpdateMessage::Scoreboard(playing.scoreboard.standings()));

        let round = snapshot.current_round?;
        let advanced = round > playing.last_round && playing.round.answer.is_revealed();
        if advanced && busy {
            debug!(round, "round advanced on server, waiting for idle");
            return None;
        }
        playing.last_round = round;
        if !advanced {
            return None;
        }

        info!(round, "round advanced on server");
        let ticket = self.issue(Operation::Advance(Trigger::Poll));
        self.update_busy(view);
        Some(ticket)
    }

    /// Shows how many rounds remain
    ///
    /// Failures are only logged.
    pub fn apply_stats<V: View + ?Sized>(&self, reply: error::Result<Stats>, view: &V) {
        match reply {
            Ok(stats) => {
                debug!(remaining = stats.remaining, "stats received");
                view.send(&UpdateMessage::Remaining(stats.remaining));
            }
            Err(e) => warn!(error = %e, "stats unavailable"),
        }
    }

    /// Leaves the final screen for a fresh setup screen
    ///
    /// Everything about the previous session is discarded and late replies
    /// addressed to it are ignored.
    ///
    /// # Returns
    ///
    /// `false` if the game is not over
    pub fn new_game<V: View + ?Sized>(&mut self, view: &V) -> bool {
        if !matches!(self.screen, Screen::GameOver(_)) {
            debug!("new game requested before the game is over");
            return false;
        }
        self.epoch += 1;
        self.in_flight = None;
        self.pending_load = None;
        let roster = Roster::default();
        let message = roster.message();
        self.screen = Screen::Setup(roster);
        info!("back to setup");

        view.send(&UpdateMessage::Screen(ScreenKind::Setup));
        view.send(&message.into());
        self.update_busy(view);
        true
    }
}
