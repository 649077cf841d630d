pub mod codec;
pub mod timing;
pub mod tokens;

pub use codec::{decode, encode};
pub use timing::{MorseSymbol, Speed};
pub use tokens::tokenize;
