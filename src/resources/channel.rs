//! Single-slot typed broadcast channels.
//!
//! A [`Channel<T>`] resource exists once per [`Topic`] type and holds only the
//! most recently broadcast value. Readers keep their own
//! [`ChannelReceiver<T>`] (usually as a system `Local`) and see each broadcast
//! at most once:
//!
//! - a poll after a new broadcast returns the value and marks it seen;
//! - a poll with nothing new returns `None`, stale values are never replayed;
//! - two broadcasts before a poll collapse into the last one.
//!
//! Any number of receivers may poll the same channel independently.
//!
//! # Example
//!
//! ```ignore
//! fn reader(
//!     speed: Res<Channel<HorizontalSpeed>>,
//!     mut rx: Local<ChannelReceiver<HorizontalSpeed>>,
//! ) {
//!     if let Some(v) = rx.try_receive(&speed) {
//!         // react to the new speed
//!     }
//! }
//! ```

use std::marker::PhantomData;

use bevy_ecs::prelude::{Resource, World};
use log::debug;

/// A named, typed broadcast topic.
///
/// Topics are zero-sized marker types; the channel resource for a topic is
/// `Channel<TopicType>`.
pub trait Topic: Send + Sync + 'static {
    /// Payload carried by the topic.
    type Value: Clone + Send + Sync + 'static;
    /// Human readable topic name, used in logs.
    const NAME: &'static str;
}

/// Latest-value slot for one topic.
#[derive(Resource)]
pub struct Channel<T: Topic> {
    latest: Option<T::Value>,
    /// Incremented on every broadcast. Receivers compare against it.
    sequence: u64,
    _topic: PhantomData<fn() -> T>,
}

impl<T: Topic> Default for Channel<T> {
    fn default() -> Self {
        Self {
            latest: None,
            sequence: 0,
            _topic: PhantomData,
        }
    }
}

impl<T: Topic> Channel<T> {
    /// Overwrite the slot with `value`.
    pub fn broadcast(&mut self, value: T::Value) {
        self.latest = Some(value);
        self.sequence = self.sequence.wrapping_add(1);
    }

    /// Last broadcast value, regardless of who has seen it.
    pub fn peek(&self) -> Option<&T::Value> {
        self.latest.as_ref()
    }

    /// Number of broadcasts since the channel was created.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Per-reader cursor into a [`Channel`].
///
/// A default receiver has seen nothing, so its first poll returns whatever is
/// currently in the slot.
pub struct ChannelReceiver<T: Topic> {
    seen: u64,
    _topic: PhantomData<fn() -> T>,
}

impl<T: Topic> Default for ChannelReceiver<T> {
    fn default() -> Self {
        Self {
            seen: 0,
            _topic: PhantomData,
        }
    }
}

impl<T: Topic> ChannelReceiver<T> {
    /// Return the latest value if it was broadcast since the previous poll.
    pub fn try_receive(&mut self, channel: &Channel<T>) -> Option<T::Value> {
        if channel.sequence == self.seen {
            return None;
        }
        self.seen = channel.sequence;
        channel.latest.clone()
    }
}

/// Insert an empty channel for `T` unless one already exists.
pub fn register_topic<T: Topic>(world: &mut World) {
    if !world.contains_resource::<Channel<T>>() {
        debug!("Registering channel topic '{}'", T::NAME);
        world.init_resource::<Channel<T>>();
    }
}
