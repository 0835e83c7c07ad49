//! Media service: use-cases for the music player and broadcast system.

use serde_json::json;

use orchard_domain::error::OrchardError;
use orchard_domain::event::{Event, EventType, Subsystem};
use orchard_domain::media::{Broadcast, Player};

use crate::ports::EventPublisher;

/// Application service for the media page.
pub struct MediaService<P> {
    player: Player,
    broadcast: Broadcast,
    publisher: P,
}

impl<P: EventPublisher> MediaService<P> {
    /// Create a new service over an initial player and broadcast state.
    pub fn new(player: Player, broadcast: Broadcast, publisher: P) -> Self {
        Self {
            player,
            broadcast,
            publisher,
        }
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[must_use]
    pub fn broadcast(&self) -> &Broadcast {
        &self.broadcast
    }

    /// Toggle between playing and paused.
    ///
    /// # Errors
    ///
    /// Returns an error propagated from the publisher.
    #[tracing::instrument(skip(self))]
    pub fn play_pause(&mut self) -> Result<bool, OrchardError> {
        let playing = self.player.play_pause();
        self.playback_changed()?;
        Ok(playing)
    }

    /// Skip to the next track.
    ///
    /// # Errors
    ///
    /// Returns an error propagated from the publisher.
    #[tracing::instrument(skip(self))]
    pub fn next_track(&mut self) -> Result<(), OrchardError> {
        let title = self.player.next_track().title.clone();
        tracing::debug!(%title, "track changed");
        self.playback_changed()
    }

    /// Go back to the previous track.
    ///
    /// # Errors
    ///
    /// Returns an error propagated from the publisher.
    #[tracing::instrument(skip(self))]
    pub fn previous_track(&mut self) -> Result<(), OrchardError> {
        let title = self.player.previous_track().title.clone();
        tracing::debug!(%title, "track changed");
        self.playback_changed()
    }

    /// Set the player volume, clamped to 0–100.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::OutOfRange`] for non-finite input, or a
    /// publisher error.
    #[tracing::instrument(skip(self))]
    pub fn set_volume(&mut self, percent: f64) -> Result<u8, OrchardError> {
        let volume = self.player.set_volume(percent)?;
        self.playback_changed()?;
        Ok(volume)
    }

    /// Move the play head, clamped to the track length.
    ///
    /// # Errors
    ///
    /// Returns an error propagated from the publisher.
    #[tracing::instrument(skip(self))]
    pub fn seek(&mut self, secs: u32) -> Result<u32, OrchardError> {
        let position = self.player.seek(secs);
        self.playback_changed()?;
        Ok(position)
    }

    /// # Errors
    ///
    /// Returns an error propagated from the publisher.
    pub fn toggle_shuffle(&mut self) -> Result<bool, OrchardError> {
        let shuffle = self.player.toggle_shuffle();
        self.playback_changed()?;
        Ok(shuffle)
    }

    /// # Errors
    ///
    /// Returns an error propagated from the publisher.
    pub fn toggle_repeat(&mut self) -> Result<bool, OrchardError> {
        let repeat = self.player.toggle_repeat();
        self.playback_changed()?;
        Ok(repeat)
    }

    /// Switch the broadcast system on or off.
    ///
    /// # Errors
    ///
    /// Returns an error propagated from the publisher.
    #[tracing::instrument(skip(self))]
    pub fn toggle_broadcast(&mut self) -> Result<bool, OrchardError> {
        let enabled = self.broadcast.toggle();
        tracing::info!(enabled, "broadcast toggled");
        self.broadcast_changed()?;
        Ok(enabled)
    }

    /// Set the broadcast volume, clamped to 0–100.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::OutOfRange`] for non-finite input, or a
    /// publisher error.
    #[tracing::instrument(skip(self))]
    pub fn set_broadcast_volume(&mut self, percent: f64) -> Result<u8, OrchardError> {
        let volume = self.broadcast.set_volume(percent)?;
        self.broadcast_changed()?;
        Ok(volume)
    }

    fn playback_changed(&self) -> Result<(), OrchardError> {
        let player = &self.player;
        self.publish(
            EventType::PlaybackChanged,
            json!({
                "track": player.current_track().title,
                "playing": player.playing,
                "volume": player.volume,
                "position_secs": player.position_secs(),
                "shuffle": player.shuffle,
                "repeat": player.repeat,
            }),
        )
    }

    fn broadcast_changed(&self) -> Result<(), OrchardError> {
        self.publish(
            EventType::BroadcastChanged,
            json!({ "enabled": self.broadcast.enabled, "volume": self.broadcast.volume }),
        )
    }

    fn publish(&self, event_type: EventType, data: serde_json::Value) -> Result<(), OrchardError> {
        self.publisher
            .publish(Event::new(Subsystem::Media, event_type, data))
    }
}
