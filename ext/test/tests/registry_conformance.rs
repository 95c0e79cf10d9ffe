//! Registry conformance: structured forms round-trip through the person
//! registry and unknown names are rejected with the registered names listed.

use sieve::{CompareOp, SpecError, StructuredPredicate as P};
use sieve_test::prelude::*;

fn every_rule() -> Vec<Specification<Person>> {
    let dentist = profession(Profession::Dentist);
    let doctor = profession(Profession::Doctor);
    vec![
        adults(),
        adults().and(&dentist),
        dentist.or(&doctor).not(),
        !(adults() | doctor.not()),
        Specification::all([adults(), dentist.clone(), doctor.not()]).expect("non-empty"),
    ]
}

#[test]
fn structured_form_round_trips() {
    let r = registry();
    for spec in every_rule() {
        let form = spec.to_structured_form();
        let loaded = r.load(&form).expect("load");
        assert_eq!(loaded.to_structured_form(), form);
        for p in sample_people() {
            assert_eq!(
                loaded.is_satisfied_by(&p),
                spec.is_satisfied_by(&p),
                "{form} disagrees on {}",
                p.name
            );
        }
    }
}

#[test]
fn json_and_yaml_load_the_same_rule() {
    let form = adults().and(&profession(Profession::Dentist)).to_structured_form();
    let json = serde_json::to_string(&form).expect("json");
    let yaml = serde_yaml::to_string(&form).expect("yaml");

    let r = registry();
    let from_json = r.load_json(&json).expect("load json");
    let from_yaml = r.load_yaml(&yaml).expect("load yaml");
    assert_eq!(from_json.to_structured_form(), form);
    assert_eq!(from_yaml.to_structured_form(), form);
}

#[test]
fn unknown_attribute_lists_registered() {
    let err = registry()
        .load(&P::leaf("height", CompareOp::Gt, 180))
        .unwrap_err();
    assert_eq!(
        err,
        SpecError::UnknownAttribute {
            name: "height".into(),
            available: vec!["age".into(), "name".into(), "profession".into()],
        }
    );
}

#[test]
fn unknown_condition_lists_registered() {
    let err = registry().load(&P::Custom { name: "vip".into() }).unwrap_err();
    assert_eq!(
        err,
        SpecError::UnknownCondition {
            name: "vip".into(),
            available: vec!["employed".into()],
        }
    );
}

#[test]
fn string_operator_needs_string_literal() {
    let err = registry()
        .load(&P::leaf("name", CompareOp::Prefix, 5))
        .unwrap_err();
    assert!(matches!(err, SpecError::Construction { .. }));
}

#[test]
fn custom_rules_work_in_memory_but_not_in_record_store() {
    let spec = registry()
        .load(&P::and(
            P::Custom { name: "employed".into() },
            P::leaf("age", CompareOp::Gt, 18),
        ))
        .expect("load");

    let people = sample_people();
    let in_memory: PersonRepository = people.iter().cloned().collect();
    let names: Vec<&str> = in_memory
        .find(&spec)
        .expect("in-memory find")
        .into_iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ada", "Cleo"]);

    let store: RecordStore<Person> = people.into_iter().collect();
    assert!(matches!(
        store.find(&spec),
        Err(SpecError::TranslationUnsupported { .. })
    ));
}
