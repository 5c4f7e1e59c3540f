/*
 * generator.rs
 * Copyright (c) 2025 Lectern Developers
 */

//! The consumer side of a run.

use crate::content::Content;
use crate::error::Result;
use crate::node::Node;
use crate::sink::Sink;

/// An independent output producer driven by the engine.
///
/// The engine calls `set_up` on every generator, then hands each node of the
/// walk to each generator in registration order, then calls `tear_down`.
/// A generator never sees nesting directly: it returns [`Content`] and the
/// engine decides when each wrapper's `after` half is written.
///
/// Generators may keep cursors (for example "currently inside a synopsis")
/// across calls within one run.
pub trait Generator {
    /// Human-readable name for this generator.
    ///
    /// Used for logging and in error messages.
    fn name(&self) -> &str;

    /// Called once before the first node.
    fn set_up(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once after the last node, before the active sink is closed.
    fn tear_down(&mut self) -> Result<()> {
        Ok(())
    }

    /// Open the sink that output for `node` (and what follows) goes to.
    ///
    /// Called for the first node of the run and for every node where
    /// [`Generator::should_chunk`] returns true.
    fn stream(&mut self, node: &Node) -> Result<Box<dyn Sink>>;

    /// Whether output should move to a new sink starting at this opening element.
    fn should_chunk(&mut self, _node: &Node) -> bool {
        false
    }

    /// Render one node.
    fn render(&mut self, node: &Node) -> Result<Content>;
}
