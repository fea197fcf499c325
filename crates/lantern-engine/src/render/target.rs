use std::cell::Cell;

/// Color image that passes recorded right now write to.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ActiveTarget {
    /// The window surface (swapchain image).
    #[default]
    Default,
    /// An [`OffscreenTarget`](super::OffscreenTarget).
    Offscreen,
}

/// Tracks the active render target while a frame is recorded.
///
/// wgpu has no global "bound framebuffer"; a render pass names its
/// attachments. The tracker gives the frame a single answer to "where does
/// drawing go now" so the post pass can assert it composites into the surface.
#[derive(Debug, Default)]
pub struct TargetTracker {
    current: Cell<ActiveTarget>,
}

impl TargetTracker {
    pub fn current(&self) -> ActiveTarget {
        self.current.get()
    }

    /// Makes `target` active until the returned scope is dropped.
    ///
    /// Scopes do not nest: acquiring while a non-default target is active is a
    /// programming error (debug assertion).
    pub fn acquire(&self, target: ActiveTarget) -> TargetScope<'_> {
        let previous = self.current.replace(target);
        debug_assert_eq!(previous, ActiveTarget::Default, "render target scopes do not nest");
        log::trace!("render target {previous:?} -> {target:?}");
        TargetScope { tracker: self, previous }
    }
}

/// Restores the previously active target on drop.
#[must_use = "dropping the scope immediately restores the previous target"]
#[derive(Debug)]
pub struct TargetScope<'a> {
    tracker: &'a TargetTracker,
    previous: ActiveTarget,
}

impl Drop for TargetScope<'_> {
    fn drop(&mut self) {
        log::trace!("render target restored to {:?}", self.previous);
        self.tracker.current.set(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_default() {
        assert_eq!(TargetTracker::default().current(), ActiveTarget::Default);
    }

    #[test]
    fn scope_restores_default_on_drop() {
        let tracker = TargetTracker::default();
        {
            let _scope = tracker.acquire(ActiveTarget::Offscreen);
            assert_eq!(tracker.current(), ActiveTarget::Offscreen);
        }
        assert_eq!(tracker.current(), ActiveTarget::Default);
    }

    #[test]
    fn scope_restores_on_early_return() {
        fn draw_or_bail(tracker: &TargetTracker, fail: bool) -> Result<(), &'static str> {
            let _scope = tracker.acquire(ActiveTarget::Offscreen);
            if fail {
                return Err("mesh missing");
            }
            Ok(())
        }

        let tracker = TargetTracker::default();
        assert!(draw_or_bail(&tracker, true).is_err());
        assert_eq!(tracker.current(), ActiveTarget::Default);
        assert!(draw_or_bail(&tracker, false).is_ok());
        assert_eq!(tracker.current(), ActiveTarget::Default);
    }

    #[test]
    fn sequential_scopes_each_restore() {
        let tracker = TargetTracker::default();
        for _ in 0..3 {
            let scope = tracker.acquire(ActiveTarget::Offscreen);
            assert_eq!(tracker.current(), ActiveTarget::Offscreen);
            drop(scope);
            assert_eq!(tracker.current(), ActiveTarget::Default);
        }
    }
}
