// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! A lazy, memoizing view over a one-shot sequence.
//!
//! [`Stream`] is the foundation both halves of the front end stand on: the
//! reader consumes a `Stream<char>` and the parser consumes a stream of
//! tokens. A stream value denotes a *position* in the underlying sequence.
//! The first time a position is forced it pulls exactly one element from the
//! source and caches the result; every later read at that position — through
//! this handle or any other handle sharing it — returns the cached value
//! without touching the source again. That is what lets grammar rules
//! re-peek the current token freely even though the source can only be
//! iterated once.
//!
//! Streams are single-threaded by construction (`Rc`/`RefCell`); the
//! memoization cell is written at most once per position and is not
//! synchronized.
//!
//! # Examples
//!
//! ```
//! use onyx_core::parse::Stream;
//!
//! let stream = Stream::from_iter(1..=3);
//! assert_eq!(stream.head().unwrap(), 1);
//! assert_eq!(stream.head().unwrap(), 1); // cached, source not re-pulled
//! assert_eq!(stream.tail().unwrap().head().unwrap(), 2);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// Error returned when reading past the end of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stream exhausted")]
pub struct StreamExhausted;

/// The shared one-shot source behind a chain of pending positions.
type Source<T> = Rc<RefCell<dyn Iterator<Item = T>>>;

/// The memoization cell for one position.
///
/// A position starts `Pending`, and the first force moves it to `Realized`
/// (caching the element and the next position) or `Exhausted`. It never
/// changes state again.
enum State<T> {
    Pending(Source<T>),
    Realized { head: T, tail: Stream<T> },
    Exhausted,
}

/// A position in a lazily-realized sequence.
///
/// Cloning a `Stream` is cheap and shares the memoization cell: every clone
/// observes the same realized element, in whatever order the clones are read.
pub struct Stream<T> {
    cell: Rc<RefCell<State<T>>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T> std::fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.cell.borrow() {
            State::Pending(_) => "pending",
            State::Realized { .. } => "realized",
            State::Exhausted => "exhausted",
        };
        f.debug_struct("Stream").field("state", &state).finish()
    }
}

impl<T: 'static> Stream<T> {
    /// Wraps a one-shot source, returning a stream positioned at its start.
    pub fn from_iter<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::pending(Rc::new(RefCell::new(source.into_iter())))
    }

    fn pending(source: Source<T>) -> Self {
        Self {
            cell: Rc::new(RefCell::new(State::Pending(source))),
        }
    }

    /// Realizes this position if it is still pending.
    ///
    /// Pulls the source at most once per position, no matter how many
    /// handles share the cell or how often they are queried.
    fn force(&self) {
        let source = match &*self.cell.borrow() {
            State::Pending(source) => Rc::clone(source),
            State::Realized { .. } | State::Exhausted => return,
        };
        let next = source.borrow_mut().next();
        let state = match next {
            Some(head) => State::Realized {
                head,
                tail: Self::pending(source),
            },
            None => State::Exhausted,
        };
        *self.cell.borrow_mut() = state;
    }

    /// Returns the element at this position.
    ///
    /// # Errors
    ///
    /// Returns [`StreamExhausted`] if this position is past the end of input.
    pub fn head(&self) -> Result<T, StreamExhausted>
    where
        T: Clone,
    {
        self.force();
        match &*self.cell.borrow() {
            State::Realized { head, .. } => Ok(head.clone()),
            State::Exhausted => Err(StreamExhausted),
            State::Pending(_) => unreachable!("position forced above"),
        }
    }

    /// Returns the stream positioned one element later.
    ///
    /// # Errors
    ///
    /// Returns [`StreamExhausted`] if this position is past the end of input.
    pub fn tail(&self) -> Result<Self, StreamExhausted> {
        self.force();
        match &*self.cell.borrow() {
            State::Realized { tail, .. } => Ok(tail.clone()),
            State::Exhausted => Err(StreamExhausted),
            State::Pending(_) => unreachable!("position forced above"),
        }
    }

    /// Returns true iff this position is past the end of input.
    pub fn is_empty(&self) -> bool {
        self.force();
        matches!(&*self.cell.borrow(), State::Exhausted)
    }

    /// Iterates the remaining elements without consuming this handle.
    ///
    /// The stream itself is unaffected: reading it afterwards still starts
    /// at this position.
    pub fn iter(&self) -> Iter<T>
    where
        T: Clone,
    {
        Iter {
            stream: self.clone(),
        }
    }
}

/// Iterator over the elements of a [`Stream`], from some position onward.
pub struct Iter<T> {
    stream: Stream<T>,
}

impl<T: Clone + 'static> Iterator for Iter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let head = self.stream.head().ok()?;
        // head() realized the position, so the tail exists
        if let Ok(tail) = self.stream.tail() {
            self.stream = tail;
        }
        Some(head)
    }
}
