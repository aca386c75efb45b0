//! Host media player transport (MPRIS over D-Bus).
//!
//! The engine never talks to the player directly; this module pushes track
//! change / seek / playback events over a channel and answers position and
//! status queries.

pub mod connection;
pub mod events;
pub mod metadata;
pub mod playback;

pub use connection::{PlayerError, find_player_service, is_blocked};
pub use events::{PlayerEvent, watch_player};
pub use metadata::TrackMetadata;
pub use playback::{get_playback_status, get_position_ms};
