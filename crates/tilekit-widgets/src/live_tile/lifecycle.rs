#![forbid(unsafe_code)]

//! Lifecycle controller: turns mount/unmount and source assignments into
//! an ordered plan of scheduler and slot operations.
//!
//! The controller is pure bookkeeping. It never touches the host; the tile
//! applies each [`LifecyclePlan`] in field order: stop, reset index, reset
//! offset, rebind slots, start.
//!
//! | Event | Mounted | Plan |
//! |-------|---------|------|
//! | mount | - | reset index; rebind + start if a source is set |
//! | unmount | - | stop, reset offset, detach in-flight frames |
//! | source attached (`None -> S`) | yes | rebind, start |
//! | source replaced (`S -> S'`) | any | reset index; stop, rebind, start if mounted |
//! | source detached (`S -> None`) | any | stop |

use std::fmt;

use super::source::ItemsSource;

/// How an items-source assignment relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceChange {
    Attached,
    Replaced,
    Detached,
    Unchanged,
}

impl SourceChange {
    /// Classify `old -> new` by collection identity.
    #[must_use]
    pub fn classify<T>(old: Option<&ItemsSource<T>>, new: Option<&ItemsSource<T>>) -> Self {
        match (old, new) {
            (None, None) => Self::Unchanged,
            (None, Some(_)) => Self::Attached,
            (Some(_), None) => Self::Detached,
            (Some(a), Some(b)) if a == b => Self::Unchanged,
            (Some(_), Some(_)) => Self::Replaced,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::Replaced => "replaced",
            Self::Detached => "detached",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for SourceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations to perform, in field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifecyclePlan {
    pub stop: bool,
    pub reset_index: bool,
    pub reset_offset: bool,
    pub detach_frames: bool,
    pub rebind: bool,
    pub start: bool,
}

impl LifecyclePlan {
    /// Plan that does nothing.
    pub const NONE: Self = Self {
        stop: false,
        reset_index: false,
        reset_offset: false,
        detach_frames: false,
        rebind: false,
        start: false,
    };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Mounted flag plus the decision table above.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleController {
    mounted: bool,
}

impl LifecycleController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn on_mount(&mut self, has_source: bool) -> LifecyclePlan {
        self.mounted = true;
        LifecyclePlan {
            reset_index: true,
            rebind: has_source,
            start: has_source,
            ..LifecyclePlan::NONE
        }
    }

    pub fn on_unmount(&mut self) -> LifecyclePlan {
        self.mounted = false;
        LifecyclePlan {
            stop: true,
            reset_offset: true,
            detach_frames: true,
            ..LifecyclePlan::NONE
        }
    }

    #[must_use]
    pub fn on_source_changed(&self, change: SourceChange) -> LifecyclePlan {
        match change {
            SourceChange::Unchanged => LifecyclePlan::NONE,
            SourceChange::Attached if self.mounted => LifecyclePlan {
                rebind: true,
                start: true,
                ..LifecyclePlan::NONE
            },
            SourceChange::Attached => LifecyclePlan::NONE,
            SourceChange::Replaced => LifecyclePlan {
                stop: self.mounted,
                reset_index: true,
                rebind: self.mounted,
                start: self.mounted,
                ..LifecyclePlan::NONE
            },
            SourceChange::Detached => LifecyclePlan {
                stop: true,
                ..LifecyclePlan::NONE
            },
        }
    }
}
