//! Checking received calls through the container.

mod common;

use autosub::prelude::*;
use common::*;

#[test]
fn test_received_calls_from_system_under_test() {
    let auto = AutoSubstitute::new();
    let sut: SimpleSystem = auto.create_instance().unwrap();

    sut.combine();
    sut.combine();
    sut.process();

    auto.received_times::<dyn TextGenerator>("generate", 2)
        .unwrap()
        .received_times::<dyn NumberGenerator>("generate", 2)
        .unwrap()
        .received_once::<dyn TextGenerator>("process")
        .unwrap()
        .did_not_receive::<dyn TextGenerator>("combine")
        .unwrap();
}

#[test]
fn test_received_with_argument_matchers() {
    let auto = AutoSubstitute::new();
    let sut: SimpleSystem = auto.create_instance().unwrap();
    let post = random_text();

    sut.combine_pre_post("pre", &post);

    auto.received_once::<dyn TextGenerator>(
        CallSpec::method("combine")
            .arg(Arg::eq("pre".to_string()))
            .arg(Arg::eq(post.clone())),
    )
    .unwrap()
    .received_at_least_once::<dyn TextGenerator>(
        CallSpec::method("combine")
            .arg(Arg::is::<String, _>("starts with p", |s| s.starts_with('p')))
            .arg(Arg::any()),
    )
    .unwrap()
    .did_not_receive::<dyn TextGenerator>(
        CallSpec::method("combine")
            .arg(Arg::eq("post".to_string()))
            .arg(Arg::any()),
    )
    .unwrap();
}

#[test]
fn test_received_property_accessors() {
    let auto = AutoSubstitute::new();
    let text = auto.substitute_for::<dyn TextGenerator>().unwrap();

    text.set_value("new".to_string());
    text.value();

    auto.received_once::<dyn TextGenerator>(
        CallSpec::setter("value").arg(Arg::eq("new".to_string())),
    )
    .unwrap()
    .received_once::<dyn TextGenerator>(CallSpec::getter("value"))
    .unwrap()
    .received::<dyn TextGenerator>(CallSpec::getter("value"), Quantity::Between(1, 3))
    .unwrap();
}

#[test]
fn test_mismatch_lists_received_calls() {
    let auto = AutoSubstitute::new();
    let sut: SimpleSystem = auto.create_instance().unwrap();

    sut.combine_pre_post("a", "b");

    let error = auto
        .received_once::<dyn TextGenerator>("generate")
        .err()
        .unwrap();

    match error {
        Error::Mock(MockError::ReceivedCallsMismatch {
            type_name,
            expected,
            actual,
            received,
            ..
        }) => {
            assert_eq!(type_name, "TextGenerator");
            assert_eq!(expected, Quantity::once());
            assert_eq!(actual, 0);
            assert_eq!(received, r#"combine("a", "b")"#);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_target_under_automatic() {
    let auto = AutoSubstitute::new();

    let error = auto.did_not_receive::<dyn TextGenerator>("generate").err().unwrap();

    assert_eq!(
        error.to_string(),
        "Could not find substituted service. This typically should not have happened but a workaround would be to utilise the 'use_instance'/'use_collection' methods to ensure there is an implementation used."
    );
}

#[test]
fn test_missing_target_under_manual_behaviours() {
    for behaviour in [
        SubstituteBehaviour::ManualWithNulls,
        SubstituteBehaviour::ManualWithExceptions,
    ] {
        let auto = AutoSubstitute::with_behaviour(behaviour);

        let error = auto.received_once::<dyn NumberGenerator>("generate").err().unwrap();

        assert_eq!(
            error.to_string(),
            "Could not find substituted service. Substitute behaviour is a 'Manual' behaviour, so unless you have explicitly utilised the 'NumberGenerator' type or utilise 'use_instance'/'use_collection', the dependency cannot be checked via this method."
        );
    }
}

#[test]
fn test_throwing_substitutes_are_verifiable() {
    let auto = AutoSubstitute::with_behaviour(SubstituteBehaviour::ManualWithExceptions);
    let sut: SimpleSystem = auto.create_instance().unwrap();

    raised(|| sut.process());

    auto.received_once::<dyn TextGenerator>("process")
        .unwrap()
        .did_not_receive::<dyn NumberGenerator>("generate")
        .unwrap();
}
