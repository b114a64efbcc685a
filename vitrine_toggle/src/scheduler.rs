// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame scheduling.
//!
//! Work deferred "to the next frame" is queued here and runs when the page ticks a frame.
//! A frame runs exactly the callbacks that were queued before it started; anything queued
//! while it runs waits for the following frame.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;

use futures::channel::oneshot;

type FrameCallback = Box<dyn FnOnce()>;

/// Single-threaded frame queue.
#[derive(Default)]
pub struct Scheduler {
    queue: RefCell<VecDeque<FrameCallback>>,
    frames: Cell<u64>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.queue.borrow().len())
            .field("frames", &self.frames.get())
            .finish()
    }
}

impl Scheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` during the next frame.
    pub fn defer_to_next_frame(&self, callback: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(callback));
    }

    /// A future that resolves during the next frame.
    pub fn next_frame(&self) -> impl Future<Output = ()> + 'static {
        let (tx, rx) = oneshot::channel::<()>();
        self.defer_to_next_frame(move || {
            let _ = tx.send(());
        });
        async move {
            let _ = rx.await;
        }
    }

    /// Run one frame. Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let batch: Vec<FrameCallback> = self.queue.borrow_mut().drain(..).collect();
        self.frames.set(self.frames.get() + 1);
        let n = batch.len();
        for callback in batch {
            callback();
        }
        n
    }

    /// Whether any callback waits for a frame.
    pub fn has_pending_frames(&self) -> bool {
        !self.queue.borrow().is_empty()
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::rc::Rc;

    #[test]
    fn callbacks_queued_during_a_frame_wait_for_the_next() {
        let scheduler = Rc::new(Scheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let (s, l) = (scheduler.clone(), log.clone());
        scheduler.defer_to_next_frame(move || {
            l.borrow_mut().push(1);
            let l2 = l.clone();
            s.defer_to_next_frame(move || l2.borrow_mut().push(2));
        });
        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(*log.borrow(), [1]);
        assert!(scheduler.has_pending_frames());
        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(*log.borrow(), [1, 2]);
        assert_eq!(scheduler.frame_count(), 2);
    }

    #[test]
    fn next_frame_resolves_after_a_frame() {
        let scheduler = Scheduler::new();
        let mut fut = scheduler.next_frame().boxed_local();
        assert!((&mut fut).now_or_never().is_none());
        scheduler.run_frame();
        assert!(fut.now_or_never().is_some());
    }
}
