//! sieve-test: reference person domain for conformance testing
//!
//! Provides a small [`Person`] entity with `name`, `age` and `profession`
//! attributes, canned specifications, and a [`register`] hook that wires the
//! attributes into a [`RegistryBuilder`]. This is the reference extension
//! that demonstrates how to build a sieve domain.
//!
//! # Example
//!
//! ```
//! use sieve_test::prelude::*;
//!
//! let alice = Person::new("alice").with_age(34).with_profession(Profession::Dentist);
//! let kid = Person::new("kid").with_age(9);
//!
//! let adult_dentists = adults() & profession(Profession::Dentist);
//! assert!(adult_dentists.is_satisfied_by(&alice));
//! assert!(!adult_dentists.is_satisfied_by(&kid));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sieve::prelude::*;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// What a [`Person`] does for a living.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profession {
    /// Medical doctor.
    Doctor,
    /// Dentist.
    Dentist,
    /// University professor.
    Professor,
}

impl Profession {
    /// Every profession, in declaration order.
    pub const ALL: [Profession; 3] = [Self::Doctor, Self::Dentist, Self::Professor];

    /// Canonical name, as stored in rules and records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "Doctor",
            Self::Dentist => "Dentist",
            Self::Professor => "Professor",
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`Profession::from_str`] for an unrecognized name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profession \"{0}\" (expected Doctor, Dentist or Professor)")]
pub struct ParseProfessionError(String);

impl FromStr for Profession {
    type Err = ParseProfessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseProfessionError(s.to_string()))
    }
}

/// A person. Age and profession may be unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Display name.
    pub name: String,
    /// Age in years, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Profession, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<Profession>,
}

impl Person {
    /// A person with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: None,
            profession: None,
        }
    }

    /// Set the age (builder pattern).
    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Set the profession (builder pattern).
    #[must_use]
    pub fn with_profession(mut self, profession: Profession) -> Self {
        self.profession = Some(profession);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Attributes
// ═══════════════════════════════════════════════════════════════════════════════

/// `name` — always present.
#[derive(Debug, Clone, Copy)]
pub struct NameAttribute;

impl Attribute<Person> for NameAttribute {
    fn name(&self) -> &str {
        "name"
    }

    fn get(&self, person: &Person) -> Value {
        Value::from(person.name.as_str())
    }
}

/// `age` — [`Value::None`] when unknown.
#[derive(Debug, Clone, Copy)]
pub struct AgeAttribute;

impl Attribute<Person> for AgeAttribute {
    fn name(&self) -> &str {
        "age"
    }

    fn get(&self, person: &Person) -> Value {
        Value::from(person.age)
    }
}

/// `profession` — the canonical name, or [`Value::None`].
#[derive(Debug, Clone, Copy)]
pub struct ProfessionAttribute;

impl Attribute<Person> for ProfessionAttribute {
    fn name(&self) -> &str {
        "profession"
    }

    fn get(&self, person: &Person) -> Value {
        person
            .profession
            .map_or(Value::None, |p| Value::from(p.as_str()))
    }
}

impl Record for Person {
    fn attribute(&self, name: &str) -> Value {
        match name {
            "name" => NameAttribute.get(self),
            "age" => AgeAttribute.get(self),
            "profession" => ProfessionAttribute.get(self),
            _ => Value::None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Canned specifications
// ═══════════════════════════════════════════════════════════════════════════════

/// Age strictly greater than 18. Unknown age is not adult.
#[must_use]
pub fn adults() -> Specification<Person> {
    Specification::leaf(AgeAttribute, Comparison::gt(18))
}

/// Profession equals `p`. No profession never matches.
#[must_use]
pub fn profession(p: Profession) -> Specification<Person> {
    Specification::leaf(ProfessionAttribute, Comparison::eq(p.as_str()))
}

/// Register the person attributes and custom conditions with `builder`.
///
/// - attributes: `name`, `age`, `profession`
/// - conditions: `employed` (has any profession)
#[must_use]
pub fn register(builder: RegistryBuilder<Person>) -> RegistryBuilder<Person> {
    builder
        .attribute(NameAttribute)
        .attribute(AgeAttribute)
        .attribute(ProfessionAttribute)
        .custom("employed", |p: &Person| p.profession.is_some())
}

/// A frozen registry for the person domain.
#[must_use]
pub fn registry() -> Registry<Person> {
    register(RegistryBuilder::new()).build()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Repository
// ═══════════════════════════════════════════════════════════════════════════════

/// An in-memory store of people.
pub type PersonRepository = InMemoryCollection<Person>;

/// Outcome of [`survey_adults`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdultSurvey {
    /// Adults, in repository order.
    pub adults: Vec<Person>,
    /// At least one adult is a dentist.
    pub has_dentist: bool,
    /// Every adult is both a dentist and a doctor. Vacuously true with no adults.
    pub all_dentist_and_doctor: bool,
}

/// Find the adults, then ask two questions of them.
///
/// `dentist AND doctor` is unsatisfiable for a single profession, so
/// `all_dentist_and_doctor` is only true when there are no adults.
#[must_use]
pub fn survey_adults(repository: &PersonRepository) -> AdultSurvey {
    let dentist = profession(Profession::Dentist);
    let dentist_and_doctor = dentist.and(&profession(Profession::Doctor));

    let adults: PersonRepository = repository
        .filter(&adults())
        .into_iter()
        .cloned()
        .collect();

    AdultSurvey {
        has_dentist: adults.any(&dentist),
        all_dentist_and_doctor: adults.all(&dentist_and_doctor),
        adults: adults.into_inner(),
    }
}

/// A small fixed population used by docs, tests and the CLI.
#[must_use]
pub fn sample_people() -> Vec<Person> {
    vec![
        Person::new("Ada").with_age(36).with_profession(Profession::Doctor),
        Person::new("Ben").with_age(12),
        Person::new("Cleo").with_age(41).with_profession(Profession::Dentist),
        Person::new("Dev").with_profession(Profession::Professor),
        Person::new("Eli").with_age(18).with_profession(Profession::Dentist),
    ]
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        adults, profession, register, registry, sample_people, survey_adults, AdultSurvey,
        AgeAttribute, NameAttribute, Person, PersonRepository, Profession, ProfessionAttribute,
    };
    pub use sieve::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_read_person() {
        let p = Person::new("ada").with_age(36).with_profession(Profession::Doctor);
        assert_eq!(NameAttribute.get(&p), Value::from("ada"));
        assert_eq!(AgeAttribute.get(&p), Value::Int(36));
        assert_eq!(ProfessionAttribute.get(&p), Value::from("Doctor"));

        let unknown = Person::new("x");
        assert_eq!(AgeAttribute.get(&unknown), Value::None);
        assert_eq!(ProfessionAttribute.get(&unknown), Value::None);
    }

    #[test]
    fn record_agrees_with_attributes() {
        for p in sample_people() {
            assert_eq!(p.attribute("name"), NameAttribute.get(&p));
            assert_eq!(p.attribute("age"), AgeAttribute.get(&p));
            assert_eq!(p.attribute("profession"), ProfessionAttribute.get(&p));
            assert_eq!(p.attribute("height"), Value::None);
        }
    }

    #[test]
    fn adults_is_strictly_over_eighteen() {
        assert!(adults().is_satisfied_by(&Person::new("a").with_age(19)));
        assert!(!adults().is_satisfied_by(&Person::new("b").with_age(18)));
        assert!(!adults().is_satisfied_by(&Person::new("c")));
        assert!(adults().not().is_satisfied_by(&Person::new("c")));
    }

    #[test]
    fn profession_parse_and_display() {
        assert_eq!("dentist".parse::<Profession>(), Ok(Profession::Dentist));
        assert_eq!(Profession::Professor.to_string(), "Professor");
        let err = "plumber".parse::<Profession>().unwrap_err();
        assert!(err.to_string().contains("plumber"));
    }

    #[test]
    fn survey_of_sample_population() {
        let repo: PersonRepository = sample_people().into_iter().collect();
        let survey = survey_adults(&repo);
        let names: Vec<&str> = survey.adults.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Cleo"]);
        assert!(survey.has_dentist);
        assert!(!survey.all_dentist_and_doctor);
    }

    #[test]
    fn survey_of_empty_population() {
        let survey = survey_adults(&PersonRepository::default());
        assert!(survey.adults.is_empty());
        assert!(!survey.has_dentist);
        assert!(survey.all_dentist_and_doctor);
    }

    #[test]
    fn register_wires_every_attribute() {
        let r = registry();
        assert_eq!(r.attribute_names(), vec!["age", "name", "profession"]);
        assert_eq!(r.condition_names(), vec!["employed"]);

        let spec = r
            .load(&(adults() & profession(Profession::Doctor)).to_structured_form())
            .unwrap();
        let ada = &sample_people()[0];
        assert!(spec.is_satisfied_by(ada));
    }

    #[test]
    fn person_serde() {
        let p: Person = serde_json::from_str(r#"{"name":"Dev","profession":"Professor"}"#).unwrap();
        assert_eq!(p, Person::new("Dev").with_profession(Profession::Professor));
        assert_eq!(
            serde_json::to_string(&Person::new("Ben").with_age(12)).unwrap(),
            r#"{"name":"Ben","age":12}"#
        );
    }
}
