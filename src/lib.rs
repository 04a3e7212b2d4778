//! Trending words on the Fediverse
//!
//! Streams public posts, counts normalized words over a fixed window and
//! publishes the top words when each window closes.

pub mod pipeline;
pub mod streamer_core;
