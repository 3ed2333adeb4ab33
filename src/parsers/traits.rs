use crate::clock::Clock;

/// One SMS vocabulary.
///
/// `parse` returns `None` when the text is not in this vocabulary; that is the
/// common outcome for arbitrary SMS traffic and not an error.
pub trait Parser {
    type Output;

    fn parse(content: &str, clock: &dyn Clock) -> Option<Self::Output>;

    fn is_supported(sender: Option<&str>, content: &str) -> bool;
}
