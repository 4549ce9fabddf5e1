use std::cell::Cell;
use std::rc::Rc;

/// Owner side of an abort flag. Listeners registered with its
/// [`signal`](Self::signal) are dropped once [`abort`](Self::abort) is
/// called.
#[derive(Debug, Clone, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    /// A controller whose signal is not yet aborted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared signal to pass in [`ListenerOptions`](super::ListenerOptions).
    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort. Idempotent.
    pub fn abort(&self) {
        self.signal.aborted.set(true);
    }
}

/// Observer side of an [`AbortController`].
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    aborted: Rc<Cell<bool>>,
}

impl AbortSignal {
    /// Whether the owning controller aborted.
    #[must_use]
    pub fn aborted(&self) -> bool {
        self.aborted.get()
    }
}
