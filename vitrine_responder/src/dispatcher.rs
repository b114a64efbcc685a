// Copyright 2025 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: walk a dispatch sequence and honor stop rules.
//!
//! [`run`] delivers each item in order through a caller-supplied closure:
//!
//! - [`Outcome::Continue`] moves on.
//! - [`Outcome::Stop`] lets the remaining items for the same node and phase run, then ends
//!   propagation.
//! - [`Outcome::StopAndConsume`] ends propagation immediately.
//!
//! Items can be bare [`Dispatch`] steps or anything that exposes one through [`AsRef`], such as
//! the [`Planned`](crate::listeners::Planned) handlers from a listener registry.
//!
//! ```
//! use vitrine_responder::dispatcher;
//! use vitrine_responder::types::{Dispatch, Outcome, Phase};
//!
//! let seq = [
//!     Dispatch::capture(1_u32),
//!     Dispatch::target(2),
//!     Dispatch::bubble(1),
//! ];
//! let mut seen = Vec::new();
//! let stop_at = dispatcher::run(&seq, &mut seen, |d, seen| {
//!     seen.push(d.node);
//!     if d.phase == Phase::Target { Outcome::Stop } else { Outcome::Continue }
//! });
//! assert_eq!(stop_at, Some(1));
//! assert_eq!(seen, [1, 2]);
//! ```

use crate::types::{Dispatch, Outcome};

/// Deliver `seq` in order, returning the index of the item that stopped propagation.
///
/// Returns `None` when every item was delivered with [`Outcome::Continue`].
pub fn run<K, T, S>(
    seq: &[T],
    state: &mut S,
    mut deliver: impl FnMut(&T, &mut S) -> Outcome,
) -> Option<usize>
where
    K: Copy + Eq,
    T: AsRef<Dispatch<K>>,
{
    let mut stopped: Option<usize> = None;
    for (i, item) in seq.iter().enumerate() {
        let d = *item.as_ref();
        if let Some(at) = stopped {
            let origin = *seq[at].as_ref();
            if d.node != origin.node || d.phase != origin.phase {
                return stopped;
            }
        }
        match deliver(item, state) {
            Outcome::Continue => {}
            Outcome::Stop => {
                stopped.get_or_insert(i);
            }
            Outcome::StopAndConsume => return Some(i),
        }
    }
    stopped
}
