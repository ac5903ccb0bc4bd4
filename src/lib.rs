//! Lazy restartable sequences and synchronous push-based event streams.
//!
//! A [`Sequence`] is a cold, pull-based recipe for iterating values: every terminal consumption
//! walks the source afresh, and operators compose lazily without ever touching data. An
//! [`Observable`] is the push-based counterpart: subscribing hands an [`Observer`] to a producer
//! that delivers values on the calling thread until a single terminal signal, or until the
//! returned [`Disposable`] is disposed.
//!
//! [`Sequence::to_observable`] bridges the two, and [`Observable::flatten`] concatenates a stream
//! of streams one inner stream at a time.

pub use crate::{
    core::{Message, Observable, Observer, ObserverFn, Subscriber},
    disposable::Disposable,
    error::{BoxError, Cause, Error, Result},
    sequence::{Iteration, Sequence},
};

mod concat;
mod core;
mod disposable;
mod error;
mod filter;
mod flatten;
mod for_each;
mod from_iter;
mod map;
mod sequence;
mod skip;
mod take;
pub mod text;
mod utils;
pub mod walk;
