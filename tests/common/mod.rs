#![allow(dead_code)]

use crossbeam_queue::SegQueue;
use std::sync::Arc;

use seqflow::{Message, Observer};

pub type MessagePredicate<T> = fn(&Message<T>) -> bool;

/// An observer pushing every message it receives into the returned queue.
pub fn recorder<T: Send + 'static>() -> (Observer<T>, Arc<SegQueue<Message<T>>>) {
    let queue = Arc::new(SegQueue::new());
    let observer = {
        let queue = Arc::clone(&queue);
        move |message: Message<T>| queue.push(message)
    };
    (observer.into(), queue)
}

pub fn drain<T>(queue: &SegQueue<T>) -> Vec<T> {
    let mut v = vec![];
    while let Some(x) = queue.pop() {
        v.push(x);
    }
    v
}

/// Checks the kind of every received message, then the values carried by the `Next` ones.
pub fn assert_messages<T>(
    actual: Vec<Message<T>>,
    expected_types: &[(MessagePredicate<T>, &str)],
    expected_values: &[T],
) where
    T: std::fmt::Debug + PartialEq,
{
    assert_eq!(
        actual.len(),
        expected_types.len(),
        "message count is expected: {actual:?}"
    );
    for (message, (predicate, name)) in actual.iter().zip(expected_types) {
        assert!(predicate(message), "message type is expected: {name}, got {message:?}");
    }
    let values: Vec<&T> = actual
        .iter()
        .filter_map(|message| match message {
            Message::Next(value) => Some(value),
            _ => None,
        })
        .collect();
    assert_eq!(values, expected_values.iter().collect::<Vec<_>>());
}

pub fn is_next<T>(message: &Message<T>) -> bool {
    matches!(message, Message::Next(_))
}

pub fn is_error<T>(message: &Message<T>) -> bool {
    matches!(message, Message::Error(_))
}

pub fn is_complete<T>(message: &Message<T>) -> bool {
    matches!(message, Message::Complete)
}
