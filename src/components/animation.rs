//! Speed-driven locomotion blending.
//!
//! [`BlendController`] picks two clips and a lerp factor from the character's
//! horizontal speed and keeps a single normalized playback time shared by
//! both clips, so clips of different native lengths stay in phase:
//!
//! - below `walk_threshold`: Idle ↔ Walk with `sqrt(magnitude / threshold)`,
//!   skewed toward walking so the midpoint never looks mushy
//! - otherwise: Run ↔ Run with `(magnitude - threshold) / (1 - threshold)`
//!
//! Each render tick the controller emits a [`BlendStack`] of
//! `push A, push B, blend` for the animation engine to flatten into one pose.
//!
//! Evaluators are acquired by [`BlendController::start`] into a
//! [`BlendEvaluators`] component and released when that component goes away,
//! see [`crate::systems::animation`].

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Component;
use log::trace;

use crate::error::ConfigurationError;
use crate::resources::blender::{AnimationBlender, EvaluatorHandle};
use crate::resources::clipstore::{AnimationClip, ClipStore};
use crate::resources::drawtime::Ticks;
use crate::resources::gameconfig::GameConfig;

/// Clip roles known to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipSlot {
    Idle,
    Walk,
    Run,
    Jump,
}

/// Clip store keys for each role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipKeys {
    pub idle: String,
    pub walk: String,
    pub run: String,
    pub jump: String,
}

/// Current blend selection and playback position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationBlendState {
    pub lerp_pair: (ClipSlot, ClipSlot),
    /// Weight of the second clip, in `[0, 1]`.
    pub lerp_factor: f32,
    /// Playback position in render ticks, within `[0, loop_length)`.
    pub playback: Ticks,
    /// Blended loop length `playback` was last advanced against.
    pub loop_length: Ticks,
    /// `playback / loop_length`, in `[0, 1)`.
    pub normalized_time: f64,
}

impl Default for AnimationBlendState {
    fn default() -> Self {
        Self {
            lerp_pair: (ClipSlot::Idle, ClipSlot::Walk),
            lerp_factor: 0.0,
            playback: 0,
            loop_length: 0,
            normalized_time: 0.0,
        }
    }
}

/// An acquired evaluator and the clip it samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipBinding {
    pub evaluator: EvaluatorHandle,
    pub clip: AnimationClip,
}

/// Evaluators held by a started blend controller.
///
/// Removing this component (or despawning its entity) releases every handle.
#[derive(Component, Debug)]
pub struct BlendEvaluators {
    pub idle: ClipBinding,
    pub walk: ClipBinding,
    pub run: ClipBinding,
    pub jump: ClipBinding,
}

impl BlendEvaluators {
    pub fn get(&self, slot: ClipSlot) -> ClipBinding {
        match slot {
            ClipSlot::Idle => self.idle,
            ClipSlot::Walk => self.walk,
            ClipSlot::Run => self.run,
            ClipSlot::Jump => self.jump,
        }
    }

    pub fn handles(&self) -> [EvaluatorHandle; 4] {
        [
            self.idle.evaluator,
            self.walk.evaluator,
            self.run.evaluator,
            self.jump.evaluator,
        ]
    }

    /// Hand every evaluator back to the blender.
    pub fn release(&self, blender: &mut AnimationBlender) {
        for handle in self.handles() {
            blender.release_evaluator(handle);
        }
    }
}

/// One entry of the blend stack consumed by the animation engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendOp {
    /// Sample `evaluator` at `time` and push the pose.
    Push { evaluator: EvaluatorHandle, time: Ticks },
    /// Pop two poses and push their blend, `factor` weighting the top one.
    Blend { factor: f32 },
}

/// Ordered blend operations for the current tick.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct BlendStack {
    pub ops: ArrayVec<BlendOp, 4>,
}

/// Strategy invoked once per tick to describe the pose to the engine.
pub trait BlendTreeBuilder {
    fn build_blend_tree(&self, evaluators: &BlendEvaluators, stack: &mut BlendStack);
}

/// Locomotion blend controller.
#[derive(Component, Debug, Clone)]
pub struct BlendController {
    /// Magnitude below which idle and walk are blended.
    pub walk_threshold: f32,
    /// Playback speed multiplier.
    pub time_scale: f64,
    /// Speed mapped to magnitude 1.0.
    pub reference_speed: f32,
    pub clips: ClipKeys,
    pub state: AnimationBlendState,
    /// Last received horizontal speed.
    pub speed: f32,
}

impl Default for BlendController {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl BlendController {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            walk_threshold: config.walk_threshold,
            time_scale: config.time_scale,
            reference_speed: config.reference_speed,
            clips: ClipKeys {
                idle: config.idle_clip.clone(),
                walk: config.walk_clip.clone(),
                run: config.run_clip.clone(),
                jump: config.jump_clip.clone(),
            },
            state: AnimationBlendState::default(),
            speed: 0.0,
        }
    }

    /// Resolve every clip, then acquire one evaluator per clip.
    ///
    /// Nothing is acquired unless all clips resolve, so a failed start never
    /// leaves handles behind.
    pub fn start(
        &self,
        clips: &ClipStore,
        blender: &mut AnimationBlender,
    ) -> Result<BlendEvaluators, ConfigurationError> {
        let idle = clips.resolve(&self.clips.idle)?;
        let walk = clips.resolve(&self.clips.walk)?;
        let run = clips.resolve(&self.clips.run)?;
        let jump = clips.resolve(&self.clips.jump)?;

        let mut bind = |clip: AnimationClip| ClipBinding {
            evaluator: blender.create_evaluator(clip),
            clip,
        };
        Ok(BlendEvaluators {
            idle: bind(idle),
            walk: bind(walk),
            run: bind(run),
            jump: bind(jump),
        })
    }

    /// Blend magnitude for the last received speed.
    pub fn magnitude(&self) -> f32 {
        let reference = if self.reference_speed > 0.0 {
            self.reference_speed
        } else {
            1.0
        };
        self.speed.abs() / reference
    }

    /// Reselect clips and advance playback by `elapsed` render ticks.
    pub fn update(&mut self, evaluators: &BlendEvaluators, elapsed: Ticks) {
        let (pair, factor) = select_lerp(self.magnitude(), self.walk_threshold);
        let blended = blended_duration(
            evaluators.get(pair.0).clip.duration,
            evaluators.get(pair.1).clip.duration,
            factor,
        );
        if blended <= 0 {
            trace!("Blended clip duration is {blended}, resetting playback");
        }
        self.state.lerp_pair = pair;
        self.state.lerp_factor = factor;
        self.state.playback = advance_playback(
            self.state.playback,
            self.state.loop_length,
            blended,
            elapsed,
            self.time_scale,
        );
        self.state.loop_length = blended.max(0);
        self.state.normalized_time = if blended > 0 {
            self.state.playback as f64 / blended as f64
        } else {
            0.0
        };
    }
}

impl BlendTreeBuilder for BlendController {
    fn build_blend_tree(&self, evaluators: &BlendEvaluators, stack: &mut BlendStack) {
        let (a, b) = self.state.lerp_pair;
        let a = evaluators.get(a);
        let b = evaluators.get(b);
        stack.ops.clear();
        stack.ops.push(BlendOp::Push {
            evaluator: a.evaluator,
            time: sample_time(self.state.normalized_time, a.clip.duration),
        });
        stack.ops.push(BlendOp::Push {
            evaluator: b.evaluator,
            time: sample_time(self.state.normalized_time, b.clip.duration),
        });
        stack.ops.push(BlendOp::Blend {
            factor: self.state.lerp_factor,
        });
    }
}

/// Pick the clip pair and lerp factor for a speed magnitude.
///
/// The factor is always within `[0, 1]`.
pub fn select_lerp(magnitude: f32, walk_threshold: f32) -> ((ClipSlot, ClipSlot), f32) {
    let magnitude = if magnitude.is_finite() { magnitude.abs() } else { 0.0 };
    if magnitude < walk_threshold {
        let factor = (magnitude / walk_threshold).sqrt();
        ((ClipSlot::Idle, ClipSlot::Walk), unit(factor))
    } else {
        let span = 1.0 - walk_threshold;
        let factor = if span > 0.0 {
            (magnitude - walk_threshold) / span
        } else {
            1.0
        };
        ((ClipSlot::Run, ClipSlot::Run), unit(factor))
    }
}

fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Linear interpolation between two clip durations.
pub fn blended_duration(a: Ticks, b: Ticks, factor: f32) -> Ticks {
    let f = factor as f64;
    (a as f64 + (b as f64 - a as f64) * f) as Ticks
}

/// Advance a playback position by `elapsed * time_scale` ticks within a loop
/// of `blended_max` ticks.
///
/// `playback` was measured against a loop of `loop_length` ticks; when the
/// blend changed the loop length it is rescaled first so the phase carries
/// over. A zero-length loop resets to 0.
pub fn advance_playback(
    playback: Ticks,
    loop_length: Ticks,
    blended_max: Ticks,
    elapsed: Ticks,
    time_scale: f64,
) -> Ticks {
    if blended_max <= 0 {
        return 0;
    }
    let current = if loop_length == blended_max {
        playback as i128
    } else if loop_length > 0 {
        playback as i128 * blended_max as i128 / loop_length as i128
    } else {
        0
    };
    let advance = if time_scale == 1.0 {
        elapsed as i128
    } else {
        (elapsed as f64 * time_scale).round() as i128
    };
    (current + advance).rem_euclid(blended_max as i128) as Ticks
}

/// Sample time within a clip for a normalized playback position.
pub fn sample_time(normalized: f64, duration: Ticks) -> Ticks {
    (normalized * duration as f64) as Ticks
}
