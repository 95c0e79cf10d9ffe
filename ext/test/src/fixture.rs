//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the sieve engine. A fixture is
//! a structured rule, a list of people with the expected verdict for each,
//! and optionally the names a collection filter must return.
//!
//! ```yaml
//! name: adult dentists
//! description: and of a comparison and an equality
//! rule:
//!   type: and
//!   left: { type: leaf, attribute: age, op: gt, value: 18 }
//!   right: { type: leaf, attribute: profession, op: eq, value: Dentist }
//! cases:
//!   - name: adult dentist
//!     person: { name: Cleo, age: 41, profession: Dentist }
//!     expect: true
//! ```

use serde::Deserialize;
use sieve::prelude::*;

use crate::{registry, Person};

/// A complete test fixture.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rule: StructuredPredicate,
    #[serde(default)]
    pub cases: Vec<Case>,
    /// Names `find` must return over the case people, in order.
    #[serde(default)]
    pub find: Option<Vec<String>>,
}

/// One person and the verdict expected for them.
#[derive(Debug, Deserialize)]
pub struct Case {
    pub name: String,
    pub person: Person,
    pub expect: bool,
}

/// Result of running a single test case.
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: bool,
    pub actual: bool,
}

impl Fixture {
    /// Parse a fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Load the rule through the person registry and evaluate every case.
    ///
    /// # Errors
    ///
    /// Whatever [`Registry::load`] returns for the rule.
    pub fn run(&self) -> Result<Vec<CaseResult>, SpecError> {
        let spec = registry().load(&self.rule)?;
        Ok(self
            .cases
            .iter()
            .map(|case| {
                let actual = spec.is_satisfied_by(&case.person);
                CaseResult {
                    case_name: case.name.clone(),
                    passed: actual == case.expect,
                    expected: case.expect,
                    actual,
                }
            })
            .collect())
    }

    /// Names matched by the in-memory evaluator and, when the rule has no
    /// custom leaves, by the record store.
    ///
    /// # Errors
    ///
    /// Whatever [`Registry::load`] or [`RecordStore::find`] returns.
    pub fn find_names(&self) -> Result<(Vec<String>, Option<Vec<String>>), SpecError> {
        let spec = registry().load(&self.rule)?;
        let people: Vec<Person> = self.cases.iter().map(|c| c.person.clone()).collect();

        let names = |found: Vec<&Person>| -> Vec<String> {
            found.into_iter().map(|p| p.name.clone()).collect()
        };

        let in_memory = names(InMemoryCollection::new(people.clone()).find(&spec)?);
        let native = if self.rule.has_custom() {
            None
        } else {
            Some(names(RecordStore::new(people).find(&spec)?))
        };
        Ok((in_memory, native))
    }

    /// Run all checks and panic on first failure.
    pub fn run_and_assert(&self) {
        let results = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to load: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }

        let Some(expected) = &self.find else {
            return;
        };
        let (in_memory, native) = self
            .find_names()
            .unwrap_or_else(|e| panic!("Fixture '{}' find failed: {e}", self.name));
        assert_eq!(&in_memory, expected, "Fixture '{}' in-memory find", self.name);
        if let Some(native) = native {
            assert_eq!(&native, expected, "Fixture '{}' record-store find", self.name);
        }
    }
}
