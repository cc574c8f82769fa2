mod model;
mod render;

pub use model::{Episode, Podcast};
pub use render::{ITUNES_NAMESPACE, format_rss_date, render_feed, render_feed_at};
