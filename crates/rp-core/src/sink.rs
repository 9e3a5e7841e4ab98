//! The rendering seam: a one-way `update(snapshot)` interface.
//!
//! Both the playback driver and the simulation engine push one snapshot per
//! completed tick.  The core has no dependency on how — or whether — the
//! receiver renders it.

/// Receives one fully recomputed snapshot per tick.
///
/// `S` is the snapshot type ([`PlaybackSnapshot`][crate::PlaybackSnapshot] or
/// [`FleetSnapshot`][crate::FleetSnapshot]).  `update` is called only after a
/// tick has completed position, event, and status recomputation.
pub trait RenderSink<S> {
    fn update(&mut self, snapshot: &S);
}

/// A [`RenderSink`] that does nothing.  Use when driving an engine without a
/// map surface attached.
pub struct NoopSink;

impl<S> RenderSink<S> for NoopSink {
    fn update(&mut self, _snapshot: &S) {}
}

/// A [`RenderSink`] that accumulates every snapshot it receives.  Used by
/// tests to assert on emitted frames.
#[derive(Default)]
pub struct VecSink<S> {
    pub frames: Vec<S>,
}

impl<S> VecSink<S> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<S: Clone> RenderSink<S> for VecSink<S> {
    fn update(&mut self, snapshot: &S) {
        self.frames.push(snapshot.clone());
    }
}
