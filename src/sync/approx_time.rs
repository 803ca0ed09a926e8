//! Approximate-time pairing of the color and depth streams.
//!
//! The two highest-rate streams are joined by nearest-timestamp match within
//! a tolerance. Lower-rate streams (inertial, odometry, point cloud) bypass
//! this join entirely and are forwarded on arrival.
//!
//! The join is lossy by design: each stream retains a bounded number of
//! unmatched samples, and once the buffer is full the oldest is dropped.
//! Freshness wins over completeness.

use std::collections::VecDeque;

use crate::core::types::{ImageFrame, SyncedFramePair};

/// Approximate-time synchronizer for the color/depth pair.
pub struct ApproxTimeSync {
    queue_size: usize,
    tolerance_us: u64,
    color: VecDeque<ImageFrame>,
    depth: VecDeque<ImageFrame>,
}

impl ApproxTimeSync {
    /// Create a synchronizer.
    ///
    /// `queue_size` is the per-stream retention window; `tolerance_us` is the
    /// maximum stamp difference for a pair.
    pub fn new(queue_size: usize, tolerance_us: u64) -> Self {
        Self {
            queue_size,
            tolerance_us,
            color: VecDeque::new(),
            depth: VecDeque::new(),
        }
    }

    /// Admit a color frame; returns a pair if one completes.
    pub fn push_color(&mut self, frame: ImageFrame) -> Option<SyncedFramePair> {
        match take_closest(&mut self.depth, frame.timestamp_us, self.tolerance_us) {
            Some(depth) => Some(make_pair(frame, depth)),
            None => {
                buffer(&mut self.color, frame, self.queue_size);
                None
            }
        }
    }

    /// Admit a depth frame; returns a pair if one completes.
    pub fn push_depth(&mut self, frame: ImageFrame) -> Option<SyncedFramePair> {
        match take_closest(&mut self.color, frame.timestamp_us, self.tolerance_us) {
            Some(color) => Some(make_pair(color, frame)),
            None => {
                buffer(&mut self.depth, frame, self.queue_size);
                None
            }
        }
    }

    /// Unmatched samples currently buffered as (color, depth).
    pub fn pending(&self) -> (usize, usize) {
        (self.color.len(), self.depth.len())
    }
}

/// Remove and return the buffered frame closest to `stamp_us`, if it is
/// within the tolerance.
fn take_closest(
    buf: &mut VecDeque<ImageFrame>,
    stamp_us: u64,
    tolerance_us: u64,
) -> Option<ImageFrame> {
    let (index, distance) = buf
        .iter()
        .enumerate()
        .map(|(i, f)| (i, f.timestamp_us.abs_diff(stamp_us)))
        .min_by_key(|&(_, d)| d)?;

    if distance <= tolerance_us {
        buf.remove(index)
    } else {
        None
    }
}

/// Retain the incoming frame, evicting the oldest unmatched sample when the
/// window is full.
fn buffer(buf: &mut VecDeque<ImageFrame>, frame: ImageFrame, queue_size: usize) {
    buf.push_back(frame);
    while buf.len() > queue_size {
        let dropped = buf.pop_front();
        if let Some(f) = dropped {
            log::debug!("Evicting unmatched sample at {} us", f.timestamp_us);
        }
    }
}

fn make_pair(color: ImageFrame, depth: ImageFrame) -> SyncedFramePair {
    let timestamp_us = color.timestamp_us / 2
        + depth.timestamp_us / 2
        + (color.timestamp_us % 2 + depth.timestamp_us % 2) / 2;
    SyncedFramePair {
        color,
        depth,
        timestamp_us,
    }
}
