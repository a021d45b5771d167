mod advance;
mod frontier;
mod scan;
mod stream;
mod thread;

pub use scan::{MatchLocation, scan_sentences};
pub use stream::StreamMatcher;
pub use thread::{NegationAttempt, RepeatAttempt, Thread};
