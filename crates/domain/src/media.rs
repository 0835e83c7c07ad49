//! Media: background music player and the public-address broadcast system.

use std::collections::HashSet;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::bounds::PERCENT;
use crate::error::{NotFoundError, OrchardError, OutOfRangeError, ValidationError};
use crate::id::TrackId;
use crate::time::Timestamp;

/// One playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub duration_secs: u32,
    pub category: String,
}

impl Track {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_secs: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::new(),
            title: title.into(),
            artist: artist.into(),
            duration_secs,
            category: category.into(),
        }
    }
}

/// Music player over a fixed, non-empty playlist.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    playlist: Vec<Track>,
    current: usize,
    pub playing: bool,
    pub volume: u8,
    pub shuffle: bool,
    pub repeat: bool,
    position_secs: u32,
}

impl Player {
    /// Create a stopped player positioned on the first track.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyPlaylist`] for an empty playlist and
    /// [`ValidationError::DuplicateId`] when two tracks share an id.
    pub fn new(playlist: Vec<Track>) -> Result<Self, OrchardError> {
        if playlist.is_empty() {
            return Err(ValidationError::EmptyPlaylist.into());
        }
        let mut seen = HashSet::with_capacity(playlist.len());
        for track in &playlist {
            if !seen.insert(track.id) {
                return Err(ValidationError::DuplicateId(track.id.to_string()).into());
            }
        }
        Ok(Self {
            playlist,
            current: 0,
            playing: false,
            volume: 70,
            shuffle: false,
            repeat: false,
            position_secs: 0,
        })
    }

    #[must_use]
    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    #[must_use]
    pub fn current_track(&self) -> &Track {
        &self.playlist[self.current]
    }

    #[must_use]
    pub fn position_secs(&self) -> u32 {
        self.position_secs
    }

    /// Flip between playing and paused. Returns the new `playing` value.
    pub fn play_pause(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Advance to the next track, wrapping to the first.
    pub fn next_track(&mut self) -> &Track {
        self.current = (self.current + 1) % self.playlist.len();
        self.position_secs = 0;
        self.current_track()
    }

    /// Go back to the previous track, wrapping to the last.
    pub fn previous_track(&mut self) -> &Track {
        let len = self.playlist.len();
        self.current = (self.current + len - 1) % len;
        self.position_secs = 0;
        self.current_track()
    }

    /// Jump to a specific track.
    ///
    /// # Errors
    ///
    /// Returns [`OrchardError::NotFound`] when the track is not in the playlist.
    pub fn select_track(&mut self, id: TrackId) -> Result<&Track, OrchardError> {
        self.current = self
            .playlist
            .iter()
            .position(|track| track.id == id)
            .ok_or_else(|| NotFoundError {
                entity: "Track",
                id: id.to_string(),
            })?;
        self.position_secs = 0;
        Ok(self.current_track())
    }

    /// Set the volume, clamped to 0–100. Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] when `percent` is not finite.
    pub fn set_volume(&mut self, percent: f64) -> Result<u8, OutOfRangeError> {
        self.volume = percent_to_u8(percent)?;
        Ok(self.volume)
    }

    /// Move the play head, clamped to the current track's length.
    pub fn seek(&mut self, secs: u32) -> u32 {
        self.position_secs = secs.min(self.current_track().duration_secs);
        self.position_secs
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }
}

/// Days on which a scheduled broadcast plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastDays {
    Daily,
    Weekdays,
}

impl BroadcastDays {
    #[must_use]
    pub fn includes(self, day: Weekday) -> bool {
        match self {
            Self::Daily => true,
            Self::Weekdays => !matches!(day, Weekday::Sat | Weekday::Sun),
        }
    }
}

/// A recurring announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledBroadcast {
    pub time: NaiveTime,
    pub message: String,
    pub days: BroadcastDays,
}

/// Public-address system state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broadcast {
    pub enabled: bool,
    pub volume: u8,
    pub last_broadcast: Option<Timestamp>,
    pub schedule: Vec<ScheduledBroadcast>,
}

impl Default for Broadcast {
    fn default() -> Self {
        Self {
            enabled: false,
            volume: 85,
            last_broadcast: None,
            schedule: Vec::new(),
        }
    }
}

impl Broadcast {
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Set the volume, clamped to 0–100. Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] when `percent` is not finite.
    pub fn set_volume(&mut self, percent: f64) -> Result<u8, OutOfRangeError> {
        self.volume = percent_to_u8(percent)?;
        Ok(self.volume)
    }

    /// Broadcasts scheduled for `day`, in time order.
    #[must_use]
    pub fn due_on(&self, day: Weekday) -> Vec<&ScheduledBroadcast> {
        let mut due: Vec<_> = self
            .schedule
            .iter()
            .filter(|entry| entry.days.includes(day))
            .collect();
        due.sort_by_key(|entry| entry.time);
        due
    }
}

/// Format seconds as `m:ss`.
#[must_use]
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent_to_u8(percent: f64) -> Result<u8, OutOfRangeError> {
    // clamped to 0..=100 before the cast
    Ok(PERCENT.clamp(percent)?.round() as u8)
}
