#![forbid(unsafe_code)]

//! Host lifecycle signal.

/// Whether the control is currently part of the host's visual tree.
///
/// `Mounted` corresponds to "template applied and loaded"; `Unmounted` to
/// "unloaded". A control starts out `Unmounted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifecycle {
    #[default]
    Unmounted,
    Mounted,
}

impl Lifecycle {
    /// Whether this is [`Lifecycle::Mounted`].
    #[inline]
    #[must_use]
    pub const fn is_mounted(self) -> bool {
        matches!(self, Self::Mounted)
    }
}
