mod dto;
mod parser;

pub mod prelude {
    pub use super::dto::{BOI_BANK, BoiTransaction};
    pub use super::parser::BoiParser;
}
