pub mod mint;

pub use mint::{handle_mint, mint_page};
