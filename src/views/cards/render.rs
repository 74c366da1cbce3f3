// Render facade for cards: re-export the implementation from views::cards::items
// so external code keeps a single import path.

pub use crate::views::cards::items::post_card;
