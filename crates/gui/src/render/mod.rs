pub mod map_tiles;

pub use map_tiles::{WalkersEngine, WalkersViewport};
