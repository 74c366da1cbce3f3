// Facade module for card building blocks.
pub mod card;
mod meta_row;
mod photo;
pub use card::post_card;
