use std::sync::Arc;

use parking_lot::Mutex;
use roverphys_core::Vec3;

/// One force arrow in world coordinates: from the application point to
/// `from + scale * force`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ForceSegment {
    pub from: Vec3,
    pub to: Vec3,
}

/// Immutable set of force arrows published for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForceSnapshot {
    pub tick: u64,
    pub segments: Vec<ForceSegment>,
}

/// Latest-complete handoff between the stepping thread and a renderer.
///
/// `publish` swaps in a freshly built snapshot; `read_snapshot` hands out a
/// shared immutable one. The lock only guards the pointer swap, so a reader
/// sees either the previous tick or the new one, never a mix.
#[derive(Clone, Default)]
pub struct RenderSnapshotBuffer {
    latest: Arc<Mutex<Arc<ForceSnapshot>>>,
}

impl RenderSnapshotBuffer {
    pub fn new() -> Self { Self::default() }

    /// Copies `segments` into a new snapshot and makes it current.
    pub fn publish(&self, tick: u64, segments: &[ForceSegment]) {
        let snap = Arc::new(ForceSnapshot { tick, segments: segments.to_vec() });
        *self.latest.lock() = snap;
    }

    pub fn read_snapshot(&self) -> Arc<ForceSnapshot> {
        self.latest.lock().clone()
    }

    /// Returns the snapshot only if it is newer than `seen_tick`.
    pub fn read_if_newer(&self, seen_tick: u64) -> Option<Arc<ForceSnapshot>> {
        let s = self.read_snapshot();
        (s.tick > seen_tick).then_some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn segs(tick: u64, n: usize) -> Vec<ForceSegment> {
        let t = tick as f64;
        (0..n).map(|_| ForceSegment { from: Vec3::splat(t), to: Vec3::splat(t + 1.0) }).collect()
    }

    #[test]
    fn published_copy_is_independent() {
        let buf = RenderSnapshotBuffer::new();
        let mut src = segs(1, 3);
        buf.publish(1, &src);
        src.clear();
        assert_eq!(buf.read_snapshot().segments.len(), 3);
        assert!(buf.read_if_newer(1).is_none());
        assert!(buf.read_if_newer(0).is_some());
    }

    #[test]
    fn readers_never_see_mixed_ticks() {
        let buf = RenderSnapshotBuffer::new();
        let writer = buf.clone();
        let w = thread::spawn(move || {
            for tick in 1..=2000u64 {
                writer.publish(tick, &segs(tick, 1 + (tick as usize % 7)));
            }
        });
        let readers: Vec<_> = (0..3).map(|_| {
            let r = buf.clone();
            thread::spawn(move || {
                for _ in 0..2000 {
                    let s = r.read_snapshot();
                    let t = s.tick as f64;
                    for seg in &s.segments {
                        assert_eq!(seg.from, Vec3::splat(t));
                        assert_eq!(seg.to, Vec3::splat(t + 1.0));
                    }
                    if s.tick > 0 {
                        assert_eq!(s.segments.len(), 1 + (s.tick as usize % 7));
                    }
                }
            })
        }).collect();
        w.join().unwrap();
        for r in readers { r.join().unwrap(); }
        assert_eq!(buf.read_snapshot().tick, 2000);
    }
}
