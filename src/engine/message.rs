use rtrb::Consumer;

use crate::dsp::filter::FilterOutput;
use crate::routing::router::SplitMode;
use crate::source::Source;

/// Control-thread requests that need the audio thread's own state (anything
/// that is not a plain number in [`super::ScopeParams`]).
pub enum ScopeMessage {
    /// Swap in a new source. The old one comes back on the retire queue.
    SetSource(Box<Source>),
    SelectSplitMode(SplitMode),
    CycleSplitMode,
    SetRouteX(FilterOutput),
    SetRouteY(FilterOutput),
    /// Scrub the source and rebuild one sweep of history.
    Step(i64),
    /// Clear filter state, trigger, history and source position.
    Reset,
}

impl std::fmt::Debug for ScopeMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeMessage::SetSource(source) => write!(f, "SetSource({})", source.name()),
            ScopeMessage::SelectSplitMode(mode) => write!(f, "SelectSplitMode({mode:?})"),
            ScopeMessage::CycleSplitMode => write!(f, "CycleSplitMode"),
            ScopeMessage::SetRouteX(output) => write!(f, "SetRouteX({output:?})"),
            ScopeMessage::SetRouteY(output) => write!(f, "SetRouteY({output:?})"),
            ScopeMessage::Step(samples) => write!(f, "Step({samples})"),
            ScopeMessage::Reset => write!(f, "Reset"),
        }
    }
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ScopeMessage>;
}

impl MessageReceiver for Consumer<ScopeMessage> {
    fn pop(&mut self) -> Option<ScopeMessage> {
        Consumer::pop(self).ok()
    }
}
