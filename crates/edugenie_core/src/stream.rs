//! Incremental delivery of generated text.

use tokio_util::sync::CancellationToken;

/// Receives text fragments as a backend produces them.
///
/// Fragments arrive in generation order and concatenate to the final text.
/// An optional cancellation token lets the caller abandon a stream early.
///
/// # Examples
///
/// ```
/// use edugenie_core::StreamHandler;
///
/// let mut seen = String::new();
/// {
///     let mut handler = StreamHandler::new(|fragment| seen.push_str(fragment));
///     handler.emit("Hel");
///     handler.emit("lo");
/// }
/// assert_eq!(seen, "Hello");
/// ```
pub struct StreamHandler<'a> {
    on_token: Box<dyn FnMut(&str) + Send + 'a>,
    cancel: Option<CancellationToken>,
}

impl<'a> StreamHandler<'a> {
    /// Wraps a fragment callback.
    pub fn new(on_token: impl FnMut(&str) + Send + 'a) -> Self {
        Self {
            on_token: Box::new(on_token),
            cancel: None,
        }
    }

    /// Attaches a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Delivers one fragment. Empty fragments are not forwarded.
    pub fn emit(&mut self, fragment: &str) {
        if !fragment.is_empty() {
            (self.on_token)(fragment);
        }
    }

    /// The attached cancellation token, if any.
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// True once the caller has cancelled the stream.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

impl std::fmt::Debug for StreamHandler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandler")
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fragments_are_dropped() {
        let mut count = 0;
        {
            let mut handler = StreamHandler::new(|_| count += 1);
            handler.emit("");
            handler.emit("a");
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn cancellation_is_observed() {
        let token = CancellationToken::new();
        let handler = StreamHandler::new(|_| {}).with_cancellation(token.clone());
        assert!(!handler.is_cancelled());
        token.cancel();
        assert!(handler.is_cancelled());
    }
}
