//! `validate_inclusion_of` and `validate_exclusion_of` against in-memory models.

use assay::prelude::*;
use assay::ARBITRARY_OUTSIDE_STRING;
use assay_model::{Model, Validation, Writer};

fn example(validation: Validation) -> Model {
    Model::define("Example")
        .attribute("attr")
        .validates(validation)
        .build()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Inclusion
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn inclusion_in_array() {
    let mut model = example(Validation::inclusion("attr", ["draft", "published"]));
    let mut m = validate_inclusion_of("attr").in_array(["draft", "published"]);
    assert!(m.matches(&mut model).unwrap(), "{}", m.failure_message());
    assert_eq!(
        m.description(),
        "validate that :attr is either ‹\"draft\"› or ‹\"published\"›"
    );

    let outside = &m.last_trace().unwrap().results[2];
    assert_eq!(outside.written(), &Value::from(ARBITRARY_OUTSIDE_STRING));
    assert_eq!(outside.attribute_errors, ["is not included in the list"]);
}

#[test]
fn inclusion_of_a_larger_set_is_disproved() {
    let mut model = example(Validation::inclusion("attr", ["draft"]));
    let mut m = validate_inclusion_of("attr").in_array(["draft", "published"]);
    assert!(!m.matches(&mut model).unwrap());
    assert!(m.does_not_match(&mut model).unwrap());
    assert!(m.failure_message().contains("‹\"published\"›"));
}

#[test]
fn inclusion_of_a_subset_is_proved() {
    let mut model = example(Validation::inclusion("attr", ["draft", "published"]));
    let mut m = validate_inclusion_of("attr").in_array(["draft"]);
    assert!(m.matches(&mut model).unwrap());
}

#[test]
fn inclusion_of_integers_picks_an_outside_integer() {
    let mut model = example(Validation::inclusion("attr", [1, 2, 3]));
    let mut m = validate_inclusion_of("attr").in_array([1, 2, 3]);
    assert!(m.matches(&mut model).unwrap());
    let last = m.last_trace().unwrap().last().unwrap();
    assert_eq!(last.written(), &Value::Int(assay::ARBITRARY_OUTSIDE_INTEGER));
}

#[test]
fn inclusion_of_booleans() {
    let mut model = example(Validation::inclusion("attr", [true]));
    let mut m = validate_inclusion_of("attr").in_array([true]);
    assert!(m.matches(&mut model).unwrap());
    let last = m.last_trace().unwrap().last().unwrap();
    assert_eq!(last.written(), &Value::Bool(false));
}

#[test]
fn inclusion_in_range() {
    let mut model = example(Validation::inclusion_in_range("attr", 1..=5));
    let mut m = validate_inclusion_of("attr").in_range(1..=5);
    assert!(m.matches(&mut model).unwrap(), "{}", m.failure_message());
    assert_eq!(
        m.description(),
        "validate that :attr lies inside the range ‹1› to ‹5›"
    );

    let mut m = validate_inclusion_of("attr").in_range(1..=6);
    assert!(m.does_not_match(&mut model).unwrap());
    let mut m = validate_inclusion_of("attr").in_range(0..=5);
    assert!(m.does_not_match(&mut model).unwrap());
}

#[test]
fn inclusion_with_custom_message() {
    let mut model = example(
        Validation::inclusion("attr", ["small", "large"]).message("is not a size"),
    );
    let mut m = validate_inclusion_of("attr")
        .in_array(["small", "large"])
        .with_message("is not a size");
    assert!(m.matches(&mut model).unwrap());

    let mut m = validate_inclusion_of("attr").in_array(["small", "large"]);
    assert!(!m.matches(&mut model).unwrap());
}

#[test]
fn inclusion_allow_nil() {
    let mut model = example(Validation::inclusion("attr", ["a"]).allow_nil());
    let mut m = validate_inclusion_of("attr").in_array(["a"]).allow_nil();
    assert!(m.matches(&mut model).unwrap());

    let mut model = example(Validation::inclusion("attr", ["a"]));
    assert!(!m.matches(&mut model).unwrap());
    assert!(m.failure_message().contains("‹nil›"));
}

#[test]
fn inclusion_allow_blank() {
    let mut model = example(Validation::inclusion("attr", ["a"]).allow_blank());
    let mut m = validate_inclusion_of("attr").in_array(["a"]).allow_blank();
    assert!(m.matches(&mut model).unwrap());

    let mut model = example(Validation::inclusion("attr", ["a"]));
    assert!(!m.matches(&mut model).unwrap());
}

#[test]
fn inclusion_with_interfering_writer() {
    let mut model = Model::define("Example")
        .writer("attr", Writer::Upcase)
        .validates(Validation::inclusion("attr", ["a", "b"]))
        .build();
    let mut m = validate_inclusion_of("attr").in_array(["a", "b"]);
    assert!(!m.matches(&mut model).unwrap());
    assert!(!m.does_not_match(&mut model).unwrap());
    assert!(m
        .failure_message()
        .contains("`ignoring_interference_by_writer`"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Exclusion
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn exclusion_in_array() {
    let mut model = example(Validation::exclusion("attr", ["admin", "root"]));
    let mut m = validate_exclusion_of("attr").in_array(["admin", "root"]);
    assert!(m.matches(&mut model).unwrap(), "{}", m.failure_message());
    assert_eq!(
        m.description(),
        "validate that :attr is neither ‹\"admin\"› nor ‹\"root\"›"
    );
}

#[test]
fn exclusion_of_a_single_value() {
    let mut model = example(Validation::exclusion("attr", ["admin"]));
    let mut m = validate_exclusion_of("attr").in_array(["admin"]);
    assert!(m.matches(&mut model).unwrap());
    assert_eq!(m.description(), "validate that :attr is not ‹\"admin\"›");
}

#[test]
fn exclusion_of_an_unexcluded_value_is_disproved() {
    let mut model = example(Validation::exclusion("attr", ["admin"]));
    let mut m = validate_exclusion_of("attr").in_array(["admin", "root"]);
    assert!(!m.matches(&mut model).unwrap());
    assert!(m.does_not_match(&mut model).unwrap());
    assert!(m.failure_message().contains("‹\"root\"›"));
}

#[test]
fn exclusion_in_range() {
    let mut model = example(Validation::exclusion_in_range("attr", 13..=19));
    let mut m = validate_exclusion_of("attr").in_range(13..=19);
    assert!(m.matches(&mut model).unwrap(), "{}", m.failure_message());

    let mut m = validate_exclusion_of("attr").in_range(12..=19);
    assert!(m.does_not_match(&mut model).unwrap());
}

#[test]
fn exclusion_without_validation() {
    let mut model = Model::define("Example").attribute("attr").build();
    let mut m = validate_exclusion_of("attr").in_array(["admin"]);
    assert!(m.does_not_match(&mut model).unwrap());
}

#[test]
fn empty_set_is_an_invalid_constraint() {
    let mut model = example(Validation::inclusion("attr", ["a"]));
    let err = validate_inclusion_of("attr")
        .in_array(Vec::<&str>::new())
        .matches(&mut model)
        .unwrap_err();
    assert!(matches!(err, AssayError::InvalidConstraint { .. }));
}
