use kira::sound::static_sound::StaticSoundData;
use kira::{AudioManager, AudioManagerSettings, DefaultBackend};
use log::warn;
use std::path::Path;

/// Short feedback cues for session events. Everything here is best-effort:
/// a missing audio device or sound file downgrades the cue to a no-op.
pub struct AudioCues {
    audio_manager: Option<AudioManager<DefaultBackend>>,
    bump_data: Option<StaticSoundData>,
}

impl AudioCues {
    pub fn new(bump_path: &Path) -> Self {
        let audio_manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
        {
            Ok(manager) => Some(manager),
            Err(err) => {
                warn!("audio device unavailable, cues disabled: {err}");
                None
            }
        };

        let bump_data = if audio_manager.is_some() {
            match StaticSoundData::from_file(bump_path) {
                Ok(data) => Some(data),
                Err(err) => {
                    warn!("failed to load bump cue {}: {err}", bump_path.display());
                    None
                }
            }
        } else {
            None
        };

        AudioCues {
            audio_manager,
            bump_data,
        }
    }

    /// Plays the wall-collision bump, if a device and the sound are present.
    pub fn play_bump(&mut self) {
        if let (Some(manager), Some(data)) = (self.audio_manager.as_mut(), self.bump_data.as_ref())
        {
            if let Err(err) = manager.play(data.clone()) {
                warn!("failed to play bump cue: {err}");
            }
        }
    }

    /// Whether cues can actually be heard.
    pub fn is_available(&self) -> bool {
        self.audio_manager.is_some() && self.bump_data.is_some()
    }
}
