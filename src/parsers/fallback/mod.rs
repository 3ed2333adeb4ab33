mod dto;
mod parser;

pub mod prelude {
    pub use super::dto::{FallbackTransaction, UNKNOWN_BANK};
    pub use super::parser::{DESCRIPTION_LIMIT, FallbackParser};
}
