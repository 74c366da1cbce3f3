// Cards view: external code imports via views::cards::{post_card, CardAction}.

mod items;
mod render;

pub use render::post_card;
