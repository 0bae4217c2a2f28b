/*
 * The pedestrian demand latch.
 *
 * A button edge sets the latch from the edge-handling context, the state
 * machine reads it at its decision points and clears it when the crossing
 * starts. One producer sets, one consumer clears, so a single atomic flag is
 * enough. Pressing again while a request is pending changes nothing: exactly
 * one crossing is served.
 *
 * The wait lamps follow the latch, but the edge handler does not drive them.
 * Every change of the latch publishes the desired lamp state, and a renderer
 * elsewhere picks up the latest one.
 */

use core::sync::atomic::{AtomicBool, Ordering};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

pub struct DemandLatch {
    pending: AtomicBool,
    indicator: Signal<CriticalSectionRawMutex, bool>,
}

impl DemandLatch {
    pub const fn new() -> Self {
        DemandLatch {
            pending: AtomicBool::new(false),
            indicator: Signal::new(),
        }
    }

    /// Called from the button edge only.
    pub fn set(&self) {
        self.pending.store(true, Ordering::Release);
        self.indicator.signal(true);
    }

    pub fn is_set(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Consumes a pending demand and turns the wait lamps off. Returns whether
    /// a demand was pending.
    pub fn take_and_clear(&self) -> bool {
        let was_pending = self.pending.swap(false, Ordering::AcqRel);
        self.indicator.signal(false);
        was_pending
    }

    /// Waits for the next wait-lamp change. Only the newest state is kept, so
    /// a slow renderer never replays stale ones.
    pub async fn indicator(&self) -> bool {
        self.indicator.wait().await
    }
}

impl Default for DemandLatch {
    fn default() -> Self {
        Self::new()
    }
}
