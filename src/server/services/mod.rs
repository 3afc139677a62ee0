pub mod minter;

pub use minter::{MintError, MintRequest, MintService, MinterConfig};
