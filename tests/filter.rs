use crate::common::{assert_messages, drain, recorder, MessagePredicate};

use seqflow::{Error, Message, Observable};

pub mod common;

#[test_log::test]
fn it_filters_a_pushed_stream() {
    let expected_types: Vec<(MessagePredicate<_>, &str)> = vec![
        (|m| matches!(m, Message::Next(_)), "Message::Next"),
        (|m| matches!(m, Message::Next(_)), "Message::Next"),
        (|m| matches!(m, Message::Complete), "Message::Complete"),
    ];

    let (observer, actual) = recorder::<i32>();
    Observable::of(1..=5).filter(|x| x % 2 == 0).subscribe(observer);

    assert_messages(drain(&actual), &expected_types, &[2, 4]);
}

#[test_log::test]
fn it_counts_rejected_values_in_the_index() {
    let source = Observable::of([5, 5, 7, 5]).filter_indexed(|x, i| *x == 5 && i > 0);
    assert_eq!(source.to_list().unwrap(), [5, 5]);
}

#[test_log::test]
fn it_redirects_predicate_failures_to_the_error_channel() {
    let expected_types: Vec<(MessagePredicate<_>, &str)> = vec![
        (|m| matches!(m, Message::Next(_)), "Message::Next"),
        (|m| matches!(m, Message::Error(Error::Operator(_))), "Message::Error"),
    ];

    let (observer, actual) = recorder::<&str>();
    Observable::of(["10", "7", "oops", "12"])
        .try_filter(|s| s.parse::<u32>().map(|n| n % 2 == 0))
        .subscribe(observer);

    assert_messages(drain(&actual), &expected_types, &["10"]);
}
