//! Evaluator registry standing in for the animation engine's blender.
//!
//! The engine hands out an evaluator per clip on request and expects every
//! evaluator to be released exactly once. [`AnimationBlender`] tracks the live
//! handles so that leaks and double releases are observable.

use bevy_ecs::prelude::Resource;
use log::{trace, warn};
use rustc_hash::FxHashMap;

use crate::resources::clipstore::AnimationClip;

/// Opaque handle to a bound clip sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvaluatorHandle(u32);

/// Registry of live clip evaluators.
#[derive(Resource, Default, Debug)]
pub struct AnimationBlender {
    live: FxHashMap<EvaluatorHandle, AnimationClip>,
    next_id: u32,
    created: u64,
    released: u64,
}

impl AnimationBlender {
    /// Bind a new evaluator to `clip`.
    pub fn create_evaluator(&mut self, clip: AnimationClip) -> EvaluatorHandle {
        let handle = EvaluatorHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.live.insert(handle, clip);
        self.created += 1;
        trace!("Created evaluator {}", handle.0);
        handle
    }

    /// Release an evaluator. Returns false if the handle was not live.
    pub fn release_evaluator(&mut self, handle: EvaluatorHandle) -> bool {
        if self.live.remove(&handle).is_some() {
            self.released += 1;
            trace!("Released evaluator {}", handle.0);
            true
        } else {
            warn!("Release of unknown evaluator {} ignored", handle.0);
            false
        }
    }

    pub fn is_live(&self, handle: EvaluatorHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Number of evaluators currently acquired.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total evaluators ever created.
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Total evaluators released.
    pub fn released_count(&self) -> u64 {
        self.released
    }
}
