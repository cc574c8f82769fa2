mod build;
mod duration;
mod location;

pub use build::{PubDateLadder, build_episode};
pub use duration::format_duration;
pub use location::PublicLocation;
