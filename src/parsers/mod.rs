pub mod boi;
pub mod date;
pub mod extract;
pub mod fallback;
pub mod traits;

pub mod prelude {
    pub use super::boi::prelude::*;
    pub use super::date::SmsDate;
    pub use super::fallback::prelude::*;
    pub use super::traits::Parser;
}
