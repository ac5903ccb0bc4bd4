use std::sync::{
    atomic::{AtomicUsize, Ordering as AtomicOrdering},
    Arc,
};

use crossbeam_queue::SegQueue;

use crate::common::drain;

use seqflow::{Disposable, Error, Observable, Subscriber};

pub mod common;

#[test_log::test]
fn it_calls_the_function_for_every_value() {
    let actual = Arc::new(SegQueue::new());
    let subscription = Observable::of(["x", "y"]).for_each({
        let actual = Arc::clone(&actual);
        move |s| actual.push(s)
    });

    assert_eq!(drain(&actual), ["x", "y"]);
    assert!(subscription.is_disposed());
}

#[test_log::test]
fn it_tears_down_once_however_often_disposed() {
    let teardowns = Arc::new(AtomicUsize::new(0));
    let source = Observable::create({
        let teardowns = Arc::clone(&teardowns);
        move |_subscriber: Subscriber<()>| {
            let teardowns = Arc::clone(&teardowns);
            Disposable::new(move || {
                teardowns.fetch_add(1, AtomicOrdering::SeqCst);
            })
        }
    });

    let subscription = source.for_each(|_| {});
    assert!(!subscription.is_disposed());
    subscription.dispose();
    subscription.dispose();
    subscription.clone().dispose();

    assert!(subscription.is_disposed());
    assert_eq!(teardowns.load(AtomicOrdering::SeqCst), 1);
}

#[test_log::test]
fn it_reports_a_running_stream_as_unfinished() {
    let teardowns = Arc::new(AtomicUsize::new(0));
    let source = Observable::create({
        let teardowns = Arc::clone(&teardowns);
        move |subscriber: Subscriber<i32>| {
            subscriber.next(1);
            let teardowns = Arc::clone(&teardowns);
            Disposable::new(move || {
                teardowns.fetch_add(1, AtomicOrdering::SeqCst);
            })
        }
    });

    assert!(matches!(source.to_list(), Err(Error::Unfinished)));
    assert_eq!(teardowns.load(AtomicOrdering::SeqCst), 1);
}

#[test_log::test]
fn it_returns_the_stream_error() {
    let source = Observable::of([1, 2]).concat_with(&Observable::throw(Error::stream("boom")));
    let error = source.to_list().unwrap_err();
    assert!(matches!(error, Error::Stream(_)));
    assert_eq!(error.to_string(), Error::stream("boom").to_string());
}
