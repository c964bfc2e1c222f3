//! Audio triggering
//!
//! The simulation only queues [`SoundEffect`]s; playback happens behind an
//! [`AudioSink`] owned by the frontend. Nothing is reported back to the sim.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player swings the sword
    Sword,
    /// An enemy takes damage
    HitEnemy,
    /// The player takes damage
    HitPlayer,
    /// A thrown pot shatters
    Shatter,
    /// A pickup was consumed
    Pickup,
    /// Doors open or close
    Door,
    /// Player dies
    Death,
}

impl SoundEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Sword => "sword",
            SoundEffect::HitEnemy => "hit-enemy",
            SoundEffect::HitPlayer => "hit-player",
            SoundEffect::Shatter => "shatter",
            SoundEffect::Pickup => "pickup",
            SoundEffect::Door => "door",
            SoundEffect::Death => "death",
        }
    }
}

/// Fire-and-forget sound playback
pub trait AudioSink {
    fn play(&mut self, sound: SoundEffect);

    /// Play every queued sound in order
    fn play_all(&mut self, sounds: impl IntoIterator<Item = SoundEffect>)
    where
        Self: Sized,
    {
        for sound in sounds {
            self.play(sound);
        }
    }
}

/// Records sounds instead of playing them
impl AudioSink for Vec<SoundEffect> {
    fn play(&mut self, sound: SoundEffect) {
        self.push(sound);
    }
}

/// Audio sink for headless runs: logs each sound
#[derive(Debug, Default)]
pub struct LogAudio {
    muted: bool,
    played: u64,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Number of sounds that reached the sink while unmuted
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, sound: SoundEffect) {
        if self.muted {
            return;
        }
        self.played += 1;
        log::debug!("play sound: {}", sound.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_records_in_order() {
        let mut sink: Vec<SoundEffect> = Vec::new();
        sink.play_all([SoundEffect::Sword, SoundEffect::HitEnemy]);
        assert_eq!(sink, vec![SoundEffect::Sword, SoundEffect::HitEnemy]);
    }

    #[test]
    fn test_muted_log_audio_counts_nothing() {
        let mut audio = LogAudio::new();
        audio.play(SoundEffect::Door);
        audio.set_muted(true);
        audio.play(SoundEffect::Door);
        assert_eq!(audio.played(), 1);
    }
}
