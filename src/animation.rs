//! Sprite-frame timelines.
//!
//! An [`AnimationPlayer`] owns a registry of named frame strips and a cursor
//! into the one currently playing. It never touches anything outside itself;
//! entities read [`AnimationPlayer::current_frame`] when they render.

use std::collections::HashMap;

use smallvec::SmallVec;
use tracing::warn;

use crate::constants::animations;

/// One source rectangle on a sprite sheet and how long it stays on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Display time in milliseconds
    pub duration: f32,
}

impl Frame {
    pub const fn new(x: u16, y: u16, width: u16, height: u16, duration: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub frames: SmallVec<[Frame; 5]>,
    pub looping: bool,
    /// Playback speed multiplier
    pub speed: f32,
}

/// Layout of a run of equally sized frames on a sprite sheet, read row-major.
#[derive(Debug, Clone, Copy)]
pub struct SpriteStrip {
    pub start_x: u16,
    pub start_y: u16,
    pub frame_width: u16,
    pub frame_height: u16,
    pub frame_count: u16,
    pub frames_per_row: u16,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationPlayer {
    animations: HashMap<String, Animation>,
    current: Option<String>,
    frame_index: usize,
    elapsed: f32,
    playing: bool,
}

impl AnimationPlayer {
    /// Creates a player with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a player preloaded with the player, enemy and effect strips.
    pub fn with_defaults() -> Self {
        let mut player = Self::new();
        player.register_defaults();
        player
    }

    fn register_defaults(&mut self) {
        let row = |y: u16, x0: u16, count: u16, duration: f32| -> SmallVec<[Frame; 5]> {
            (0..count).map(|i| Frame::new(x0 + i * 32, y, 32, 48, duration)).collect()
        };

        self.add(animations::PLAYER_IDLE, row(0, 0, 2, 500.0), true);
        self.add(animations::PLAYER_WALK, row(48, 0, 4, 200.0), true);
        self.add(animations::PLAYER_ATTACK, row(96, 0, 3, 100.0), false);
        self.add(animations::PLAYER_DEATH, row(192, 0, 4, 150.0), false);

        self.add(animations::ENEMY_IDLE, row(0, 128, 2, 600.0), true);
        self.add(animations::ENEMY_WALK, row(48, 128, 4, 250.0), true);
        self.add(animations::ENEMY_ATTACK, row(96, 128, 3, 120.0), false);
        self.add(animations::ENEMY_DEATH, row(192, 128, 4, 150.0), false);

        self.sprite_strip(
            animations::EXPLOSION,
            SpriteStrip {
                start_x: 0,
                start_y: 144,
                frame_width: 64,
                frame_height: 64,
                frame_count: 5,
                frames_per_row: 5,
            },
            80.0,
            false,
            1.0,
        );
    }

    fn add(&mut self, name: &str, frames: SmallVec<[Frame; 5]>, looping: bool) {
        self.insert(
            name,
            Animation {
                frames,
                looping,
                speed: 1.0,
            },
        );
    }

    /// Registers (or replaces) an animation. Empty strips are ignored.
    ///
    /// Replacing the animation that is currently playing restarts it from the first frame.
    pub fn insert(&mut self, name: &str, animation: Animation) {
        if animation.frames.is_empty() {
            warn!(animation = name, "Ignoring animation without frames");
            return;
        }
        self.animations.insert(name.to_string(), animation);

        if self.current.as_deref() == Some(name) {
            self.frame_index = 0;
            self.elapsed = 0.0;
        }
    }

    /// Generates a strip of equally sized frames from a sprite sheet and registers it.
    pub fn sprite_strip(&mut self, name: &str, strip: SpriteStrip, frame_duration: f32, looping: bool, speed: f32) {
        let per_row = strip.frames_per_row.max(1);
        let frames = (0..strip.frame_count)
            .map(|i| {
                let row = i / per_row;
                let col = i % per_row;
                Frame::new(
                    strip.start_x + col * strip.frame_width,
                    strip.start_y + row * strip.frame_height,
                    strip.frame_width,
                    strip.frame_height,
                    frame_duration,
                )
            })
            .collect();

        self.insert(name, Animation { frames, looping, speed });
    }

    pub fn has(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }

    /// Switches playback to `name`, restarting it from the first frame.
    ///
    /// Asking for the animation that is already playing is a no-op unless
    /// `force` is set. Returns `false` when `name` is not registered.
    pub fn play(&mut self, name: &str, force: bool) -> bool {
        if !self.animations.contains_key(name) {
            warn!(animation = name, "Animation not found");
            return false;
        }

        if self.playing && self.current.as_deref() == Some(name) && !force {
            return true;
        }

        self.current = Some(name.to_string());
        self.frame_index = 0;
        self.elapsed = 0.0;
        self.playing = true;
        true
    }

    /// Stops playback and forgets the current animation.
    pub fn stop(&mut self) {
        self.playing = false;
        self.current = None;
        self.frame_index = 0;
        self.elapsed = 0.0;
    }

    /// Advances the cursor by `dt` milliseconds, scaled by the animation's speed.
    ///
    /// At most one frame is advanced per call. A non-looping animation that
    /// runs past its last frame stops and holds that frame.
    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        let Some(animation) = self.current.as_deref().and_then(|name| self.animations.get(name)) else {
            return;
        };

        let Some(frame) = animation.frames.get(self.frame_index) else {
            return;
        };

        self.elapsed += dt * animation.speed;
        if self.elapsed >= frame.duration {
            self.elapsed = 0.0;
            self.frame_index += 1;

            if self.frame_index >= animation.frames.len() {
                if animation.looping {
                    self.frame_index = 0;
                } else {
                    self.playing = false;
                    self.frame_index = animation.frames.len() - 1;
                }
            }
        }
    }

    /// The frame to draw, if any animation has been started.
    ///
    /// A finished non-looping animation keeps returning its last frame.
    pub fn current_frame(&self) -> Option<Frame> {
        let animation = self.animations.get(self.current.as_deref()?)?;
        animation.frames.get(self.frame_index).copied()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Whether anything is playing, or when `name` is given, whether that animation is.
    pub fn is_playing(&self, name: Option<&str>) -> bool {
        match name {
            Some(name) => self.playing && self.current.as_deref() == Some(name),
            None => self.playing,
        }
    }

    /// Fraction of the current animation already shown, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if !self.playing {
            return 0.0;
        }
        let Some(animation) = self.current.as_deref().and_then(|name| self.animations.get(name)) else {
            return 0.0;
        };
        let Some(frame) = animation.frames.get(self.frame_index) else {
            return 0.0;
        };
        let within = if frame.duration > 0.0 {
            (self.elapsed / frame.duration).min(1.0)
        } else {
            1.0
        };
        (self.frame_index as f32 + within) / animation.frames.len() as f32
    }

    /// Changes the speed of the current animation. Non-positive speeds are rejected.
    pub fn set_speed(&mut self, speed: f32) -> bool {
        if !(speed > 0.0) {
            warn!(speed, "Animation speed must be greater than 0");
            return false;
        }
        match self.current.as_deref().and_then(|name| self.animations.get_mut(name)) {
            Some(animation) => {
                animation.speed = speed;
                true
            }
            None => false,
        }
    }
}

pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

pub fn ease_in(t: f32) -> f32 {
    t * t
}

pub fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(2)
}

pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}
