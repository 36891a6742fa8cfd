//! `validate_numericality_of` against in-memory models.

use assay::prelude::*;
use assay::Comparison;
use assay_model::{Model, Validation};

fn validating_numericality(options: impl FnOnce(Validation) -> Validation) -> Model {
    Model::define("Example")
        .attribute("attr")
        .validates(options(Validation::numericality("attr")))
        .build()
}

#[test]
fn plain_numericality() {
    let mut model = validating_numericality(|v| v);
    let mut m = validate_numericality_of("attr");
    assert!(m.matches(&mut model).unwrap(), "{}", m.failure_message());
    assert_eq!(m.description(), "validate that :attr looks like a number");
}

#[test]
fn no_numericality_validation() {
    let mut model = Model::define("Example").attribute("attr").build();
    let mut m = validate_numericality_of("attr");
    assert!(!m.matches(&mut model).unwrap());
    assert!(m.does_not_match(&mut model).unwrap());
    assert!(m.failure_message().contains("‹\"abcd\"›"));
}

#[test]
fn only_integer() {
    let mut model = validating_numericality(|v| v.only_integer());
    let mut m = validate_numericality_of("attr").only_integer();
    assert!(m.matches(&mut model).unwrap(), "{}", m.failure_message());

    let mut model = validating_numericality(|v| v);
    assert!(m.does_not_match(&mut model).unwrap());
    assert!(m.failure_message().contains("‹\"0.1\"›"));
}

#[test]
fn parity() {
    let mut odd = validating_numericality(|v| v.odd());
    let mut even = validating_numericality(|v| v.even());

    assert!(validate_numericality_of("attr").odd().matches(&mut odd).unwrap());
    assert!(validate_numericality_of("attr").even().matches(&mut even).unwrap());
    assert!(validate_numericality_of("attr").odd().does_not_match(&mut even).unwrap());
    assert!(validate_numericality_of("attr").even().does_not_match(&mut odd).unwrap());
}

#[test]
fn comparisons_match_their_exact_bound() {
    let cases = [
        Comparison::GreaterThan,
        Comparison::GreaterThanOrEqualTo,
        Comparison::EqualTo,
        Comparison::LessThan,
        Comparison::LessThanOrEqualTo,
        Comparison::OtherThan,
    ];
    for operator in cases {
        let mut model = validating_numericality(|v| v.compare(operator, 18));
        let mut m = match operator {
            Comparison::GreaterThan => validate_numericality_of("attr").is_greater_than(18),
            Comparison::GreaterThanOrEqualTo => {
                validate_numericality_of("attr").is_greater_than_or_equal_to(18)
            }
            Comparison::EqualTo => validate_numericality_of("attr").is_equal_to(18),
            Comparison::LessThan => validate_numericality_of("attr").is_less_than(18),
            Comparison::LessThanOrEqualTo => {
                validate_numericality_of("attr").is_less_than_or_equal_to(18)
            }
            Comparison::OtherThan => validate_numericality_of("attr").is_other_than(18),
        };
        assert!(m.matches(&mut model).unwrap(), "{operator:?}: {}", m.failure_message());
    }
}

#[test]
fn comparison_off_by_one_is_disproved() {
    let mut model = validating_numericality(|v| v.compare(Comparison::GreaterThan, 18));
    let mut m = validate_numericality_of("attr").is_greater_than(17);
    assert!(!m.matches(&mut model).unwrap());
    assert!(m.does_not_match(&mut model).unwrap());

    let mut m = validate_numericality_of("attr").is_greater_than(19);
    assert!(m.does_not_match(&mut model).unwrap());
}

#[test]
fn error_listing_includes_other_invalid_attributes() {
    let mut model = Model::define("Person")
        .attribute("age")
        .attribute("score")
        .validates(Validation::numericality("age").compare(Comparison::GreaterThan, 18))
        .validates(Validation::numericality("score"))
        .build();
    let mut m = validate_numericality_of("age").is_greater_than(17);
    assert!(!m.matches(&mut model).unwrap());

    let message = m.failure_message();
    let age = message.find("* age: [\"must be greater than 18\"]").expect("age listed");
    let score = message.find("* score: [\"is not a number\"]").expect("score listed");
    assert!(age < score, "{message}");
}

#[test]
fn combined_bounds() {
    let mut model = validating_numericality(|v| {
        v.only_integer()
            .compare(Comparison::GreaterThanOrEqualTo, 18)
            .compare(Comparison::LessThan, 130)
    });
    let mut m = validate_numericality_of("attr")
        .only_integer()
        .is_greater_than_or_equal_to(18)
        .is_less_than(130);
    assert!(m.matches(&mut model).unwrap(), "{}", m.failure_message());
}

#[test]
fn float_bounds() {
    let mut model = validating_numericality(|v| v.compare(Comparison::LessThan, 9.5));
    let mut m = validate_numericality_of("attr").is_less_than(9.5);
    assert!(m.matches(&mut model).unwrap(), "{}", m.failure_message());

    let mut m = validate_numericality_of("attr").is_less_than_or_equal_to(9.5);
    assert!(m.does_not_match(&mut model).unwrap());
}

#[test]
fn custom_message_applies_to_every_probe() {
    let mut model = validating_numericality(|v| {
        v.compare(Comparison::GreaterThan, 0).message("must be positive")
    });
    let mut m = validate_numericality_of("attr")
        .is_greater_than(0)
        .with_message("must be positive");
    assert!(m.matches(&mut model).unwrap(), "{}", m.failure_message());

    let mut m = validate_numericality_of("attr").is_greater_than(0);
    assert!(!m.matches(&mut model).unwrap());
}

#[test]
fn allow_nil() {
    let mut model = validating_numericality(|v| v.allow_nil());
    let mut m = validate_numericality_of("attr").allow_nil();
    assert!(m.matches(&mut model).unwrap(), "{}", m.failure_message());

    let mut model = validating_numericality(|v| v);
    assert!(!m.matches(&mut model).unwrap());
    assert!(m.failure_message().contains("After setting :attr to ‹nil›"));
    assert!(m.failure_message().contains("* attr: [\"is not a number\"]"));
}

#[test]
fn trace_records_every_probe() {
    let mut model = validating_numericality(|v| v.compare(Comparison::EqualTo, 3));
    let mut m = validate_numericality_of("attr").is_equal_to(3);
    assert!(m.matches(&mut model).unwrap());
    let trace = m.last_trace().unwrap();
    assert!(trace.results.iter().all(|r| r.matched));
    assert_eq!(trace.results[0].written(), &Value::from("abcd"));
}
