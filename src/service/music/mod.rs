//! Music playback on top of a Lavalink node.

pub mod autoplay;
pub mod events;
pub mod player;
pub mod queue;
