use std::sync::{
    atomic::{AtomicBool, Ordering as AtomicOrdering},
    Arc,
};

use crate::common::{assert_messages, drain, recorder, MessagePredicate};

use seqflow::{concat, Disposable, Error, Message, Observable, Subscriber};

pub mod common;

#[test_log::test]
fn it_concatenates_streams_in_order() {
    let expected_types: Vec<(MessagePredicate<_>, &str)> = vec![
        (|m| matches!(m, Message::Next(_)), "Message::Next"),
        (|m| matches!(m, Message::Next(_)), "Message::Next"),
        (|m| matches!(m, Message::Next(_)), "Message::Next"),
        (|m| matches!(m, Message::Next(_)), "Message::Next"),
        (|m| matches!(m, Message::Complete), "Message::Complete"),
    ];

    let (observer, actual) = recorder::<i32>();
    concat![Observable::of([1, 2]), Observable::empty(), Observable::of([3, 4])]
        .subscribe(observer);

    assert_messages(drain(&actual), &expected_types, &[1, 2, 3, 4]);
}

#[test_log::test]
fn it_does_not_start_streams_after_an_error() {
    let expected_types: Vec<(MessagePredicate<_>, &str)> = vec![
        (|m| matches!(m, Message::Next(_)), "Message::Next"),
        (|m| matches!(m, Message::Error(Error::Stream(_))), "Message::Error"),
    ];
    let started = Arc::new(AtomicBool::new(false));
    let last = Observable::create({
        let started = Arc::clone(&started);
        move |subscriber: Subscriber<i32>| {
            started.store(true, AtomicOrdering::SeqCst);
            subscriber.complete();
            Disposable::empty()
        }
    });

    let (observer, actual) = recorder::<i32>();
    concat![
        Observable::just(1),
        Observable::throw(Error::stream("connection reset")),
        last,
    ]
    .subscribe(observer);

    assert_messages(drain(&actual), &expected_types, &[1]);
    assert!(!started.load(AtomicOrdering::SeqCst));
}

#[test_log::test]
fn it_completes_an_empty_concatenation() {
    let source: Observable<i32> = Observable::concat(Vec::new());
    assert!(source.to_list().unwrap().is_empty());
}

#[test_log::test]
fn it_prepends_and_appends_values() {
    let source = Observable::of([2, 3]).prepend(1).append(4);
    assert_eq!(source.to_list().unwrap(), [1, 2, 3, 4]);
    assert_eq!(
        Observable::of(["a"]).concat_with(&Observable::of(["b"])).to_list().unwrap(),
        ["a", "b"]
    );
}
