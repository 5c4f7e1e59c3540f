/*
 * observer.rs
 * Copyright (c) 2025 Lectern Developers
 *
 * Per-node progress hooks.
 */

//! Observers receive every dispatched node along with a 0-based tick.
//!
//! They are a side channel for progress reporting and logging and have no
//! effect on output. Any `FnMut(&Node, usize)` closure is an observer.

use crate::node::Node;

pub trait TickObserver {
    /// Called once per dispatched node, before any generator sees it.
    fn on_tick(&mut self, node: &Node, tick: usize);
}

impl<F> TickObserver for F
where
    F: FnMut(&Node, usize),
{
    fn on_tick(&mut self, node: &Node, tick: usize) {
        self(node, tick)
    }
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TickObserver for NoopObserver {
    fn on_tick(&mut self, _node: &Node, _tick: usize) {}
}

/// Observer that emits `tracing` events.
///
/// Every node is logged at trace level; every `interval` nodes a progress
/// line is logged at info level.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    interval: usize,
}

impl TracingObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl TickObserver for TracingObserver {
    fn on_tick(&mut self, node: &Node, tick: usize) {
        tracing::trace!(
            tick = tick,
            kind = node.kind().as_str(),
            name = node.name(),
            depth = node.depth(),
            "Dispatching node"
        );
        if tick > 0 && tick % self.interval == 0 {
            tracing::info!(nodes = tick, "Processed nodes");
        }
    }
}
