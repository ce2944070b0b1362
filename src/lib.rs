//! chainviz
//!
//! Terminal visualizer for a beacon chain world-state diff stream.
//!
//! The pure core folds ordered diffs into a [`world::WorldState`], lays the block
//! tree out as a slot-by-order DAG ([`layout`]) and draws typed relations onto a
//! [`render::RenderSurface`]. [`session::Session`] keeps the three in step. The
//! impure shell reads the stream ([`source`]) and paints it with ratatui ([`view`]).

pub mod config;
pub mod layout;
pub mod logging;
pub mod model;
pub mod parser;
pub mod render;
pub mod session;
pub mod source;
pub mod view;
pub mod world;

// Re-export main loop integration
pub mod integration;
