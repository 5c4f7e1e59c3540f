/*
 * sink.rs
 * Copyright (c) 2025 Lectern Developers
 *
 * Append-only output targets.
 */

//! Output sinks.
//!
//! A [`Sink`] is an append-only target with an explicit close. Generators hand
//! sinks to the engine through [`Generator::stream`](crate::Generator::stream);
//! the engine writes to them and closes each one exactly once.
//!
//! - [`FileSink`] buffers writes to a file on disk.
//! - [`MemorySink`] collects writes into a shared in-memory buffer.
//! - [`SharedSink`] is a cloneable handle, for generators that write to their
//!   own sink in `set_up`/`tear_down` while the engine holds it too.

use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{RenderError, Result};

/// An append-only, explicitly closable output target.
pub trait Sink {
    /// Append text to the sink.
    fn write(&mut self, text: &str) -> Result<()>;

    /// Flush and release the sink.
    fn close(&mut self) -> Result<()>;

    /// Where downstream readers can find the output after the run.
    fn path(&self) -> &Path;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, text: &str) -> Result<()> {
        (**self).write(text)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn path(&self) -> &Path {
        (**self).path()
    }
}

/// A buffered file sink.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Default buffer capacity in bytes.
    pub const DEFAULT_CAPACITY: usize = 8 * 1024;

    /// Create (or truncate) the file at `path`, creating parent directories.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_capacity(path, Self::DEFAULT_CAPACITY)
    }

    /// Like [`FileSink::create`] with an explicit buffer capacity.
    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RenderError::Sink {
                path: path.clone(),
                source,
            })?;
        }
        let file = File::create(&path).map_err(|source| RenderError::Sink {
            path: path.clone(),
            source,
        })?;
        tracing::trace!(path = %path.display(), "Opened file sink");
        Ok(Self {
            path,
            writer: Some(BufWriter::with_capacity(capacity, file)),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

impl Sink for FileSink {
    fn write(&mut self, text: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| RenderError::SinkClosed(self.path.clone()))?;
        writer
            .write_all(text.as_bytes())
            .map_err(|source| RenderError::Sink {
                path: self.path.clone(),
                source,
            })
    }

    /// Closing an already closed file sink is a no-op.
    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|source| RenderError::Sink {
                path: self.path.clone(),
                source,
            })?;
            tracing::trace!(path = %self.path.display(), "Closed file sink");
        }
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// An in-memory sink.
///
/// Clones share the same buffer, so a caller can keep one handle to read the
/// output while the engine owns another. Every call to `close` is counted.
#[derive(Debug, Clone)]
pub struct MemorySink {
    path: PathBuf,
    buffer: Rc<RefCell<String>>,
    closes: Rc<Cell<usize>>,
}

impl MemorySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            buffer: Rc::new(RefCell::new(String::new())),
            closes: Rc::new(Cell::new(0)),
        }
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer.borrow().clone()
    }

    /// How many times `close` has been called.
    pub fn close_count(&self) -> usize {
        self.closes.get()
    }

    pub fn is_closed(&self) -> bool {
        self.closes.get() > 0
    }
}

impl Sink for MemorySink {
    fn write(&mut self, text: &str) -> Result<()> {
        if self.is_closed() {
            return Err(RenderError::SinkClosed(self.path.clone()));
        }
        self.buffer.borrow_mut().push_str(text);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closes.set(self.closes.get() + 1);
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// A cloneable handle to a sink owned jointly by a generator and the engine.
#[derive(Debug)]
pub struct SharedSink<S> {
    path: PathBuf,
    inner: Rc<RefCell<S>>,
}

impl<S> Clone for SharedSink<S> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: Sink> SharedSink<S> {
    pub fn new(sink: S) -> Self {
        Self {
            path: sink.path().to_path_buf(),
            inner: Rc::new(RefCell::new(sink)),
        }
    }
}

impl<S: Sink> Sink for SharedSink<S> {
    fn write(&mut self, text: &str) -> Result<()> {
        self.inner.borrow_mut().write(text)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.borrow_mut().close()
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
