//! Identity of the code that owns an edge effect.
//!
//! The integration layer knows whether it is attaching the engine to a
//! declarative (Compose) list or to a classic view, and says so up front. The
//! engine only uses this to pick the input divisor applied to pull deltas.

/// UI layer the edge effect is driven from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CallerKind {
    /// Classic view hierarchy
    #[default]
    View,
    /// Declarative UI layer, which reports pull deltas at a larger scale
    Compose,
}

const COMPOSE_FRAME_PREFIX: &str = "androidx.compose";

impl CallerKind {
    /// Classify an already captured list of frame or module names.
    ///
    /// Any frame inside the Compose runtime marks the caller as Compose.
    pub fn from_frames<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if frames
            .into_iter()
            .any(|frame| frame.as_ref().starts_with(COMPOSE_FRAME_PREFIX))
        {
            CallerKind::Compose
        } else {
            CallerKind::View
        }
    }

    #[inline]
    pub fn is_compose(self) -> bool {
        self == CallerKind::Compose
    }
}

/// Who is constructing the edge effect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    /// Application identity used to look up per-app overrides
    pub package: String,
    pub kind: CallerKind,
}

impl CallerContext {
    pub fn new(package: impl Into<String>, kind: CallerKind) -> Self {
        Self {
            package: package.into(),
            kind,
        }
    }

    pub fn view(package: impl Into<String>) -> Self {
        Self::new(package, CallerKind::View)
    }

    pub fn compose(package: impl Into<String>) -> Self {
        Self::new(package, CallerKind::Compose)
    }
}
