use wgpu::SurfaceError;

/// What the frame loop does after a failed surface acquisition.
///
/// None of these produce a user-visible error. A skipped tick writes no
/// uniforms and submits nothing; drawing resumes on the next tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; this tick is skipped.
    Reconfigured,
    /// Transient error; this tick is skipped.
    SkipFrame,
    /// Out of memory; the runtime shuts down.
    Fatal,
}

impl SurfaceErrorAction {
    /// Classifies `err`. Reconfiguration itself is done by the caller.
    pub fn classify(err: &SurfaceError) -> Self {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
            SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            SurfaceError::Timeout | SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }

    #[inline]
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_and_outdated_reconfigure() {
        assert_eq!(SurfaceErrorAction::classify(&SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(
            SurfaceErrorAction::classify(&SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
    }

    #[test]
    fn timeout_skips_the_tick() {
        let action = SurfaceErrorAction::classify(&SurfaceError::Timeout);
        assert_eq!(action, SurfaceErrorAction::SkipFrame);
        assert!(!action.is_fatal());
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert!(SurfaceErrorAction::classify(&SurfaceError::OutOfMemory).is_fatal());
    }
}
