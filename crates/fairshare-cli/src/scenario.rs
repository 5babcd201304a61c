//! Scenario files: a scripted sequence of allocator events.
//!
//! A scenario is a TOML file with an ordered `[[events]]` list. Replaying
//! it feeds each event to a [`Sorter`] exactly as an allocator would and
//! records the ordering every time a `sort` event is reached.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use fairshare_resources::Resources;
use fairshare_sorter::{Client, Sorter};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("event {index}: client '{name}' is already registered")]
    DuplicateClient { index: usize, name: String },

    #[error("event {index}: {op} on unregistered client '{name}'")]
    UnknownClient {
        index: usize,
        op: &'static str,
        name: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// One allocator event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Event {
    AddClient { name: String },
    RemoveClient { name: String },
    Activate { name: String },
    Deactivate { name: String },
    Allocated { name: String, resources: Resources },
    Unallocated { name: String, resources: Resources },
    AddResources { resources: Resources },
    RemoveResources { resources: Resources },
    Sort,
}

impl Event {
    pub fn op(&self) -> &'static str {
        match self {
            Event::AddClient { .. } => "add_client",
            Event::RemoveClient { .. } => "remove_client",
            Event::Activate { .. } => "activate",
            Event::Deactivate { .. } => "deactivate",
            Event::Allocated { .. } => "allocated",
            Event::Unallocated { .. } => "unallocated",
            Event::AddResources { .. } => "add_resources",
            Event::RemoveResources { .. } => "remove_resources",
            Event::Sort => "sort",
        }
    }

    fn apply<S: Sorter + ?Sized>(&self, sorter: &mut S) {
        match self {
            Event::AddClient { name } => sorter.add(name),
            Event::RemoveClient { name } => sorter.remove(name),
            Event::Activate { name } => sorter.activate(name),
            Event::Deactivate { name } => sorter.deactivate(name),
            Event::Allocated { name, resources } => sorter.allocated(name, resources),
            Event::Unallocated { name, resources } => sorter.unallocated(name, resources),
            Event::AddResources { resources } => sorter.add_resources(resources),
            Event::RemoveResources { resources } => sorter.remove_resources(resources),
            Event::Sort => {}
        }
    }
}

/// The ordering observed at one `sort` event.
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    /// Zero-based position of the `sort` event in the scenario.
    pub event: usize,
    pub clients: Vec<Client>,
}

impl Scenario {
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(content)?)
    }

    /// Reject events that would break the sorter's preconditions.
    ///
    /// Tracks registrations the same way the sorter will, so a scenario
    /// that passes never trips the sorter's assertions.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut registered: HashSet<&str> = HashSet::new();
        for (index, event) in self.events.iter().enumerate() {
            match event {
                Event::AddClient { name } => {
                    if !registered.insert(name.as_str()) {
                        return Err(ScenarioError::DuplicateClient {
                            index,
                            name: name.clone(),
                        });
                    }
                }
                Event::RemoveClient { name } => {
                    registered.remove(name.as_str());
                }
                Event::Activate { name }
                | Event::Allocated { name, .. }
                | Event::Unallocated { name, .. } => {
                    if !registered.contains(name.as_str()) {
                        return Err(ScenarioError::UnknownClient {
                            index,
                            op: event.op(),
                            name: name.clone(),
                        });
                    }
                }
                Event::Deactivate { .. }
                | Event::AddResources { .. }
                | Event::RemoveResources { .. }
                | Event::Sort => {}
            }
        }
        Ok(())
    }

    /// Feed every event to `sorter`, collecting the ordering at each `sort`.
    ///
    /// Call [`Scenario::validate`] first; replaying an invalid scenario can
    /// panic inside the sorter.
    pub fn replay<S: Sorter + ?Sized>(&self, sorter: &mut S) -> Vec<SortReport> {
        let mut reports = Vec::new();
        for (index, event) in self.events.iter().enumerate() {
            debug!(index, op = event.op(), "replaying event");
            if let Event::Sort = event {
                reports.push(SortReport {
                    event: index,
                    clients: sorter.shares(),
                });
            } else {
                event.apply(sorter);
            }
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairshare_sorter::DrfSorter;
    use std::io::Write;

    const TWO_FRAMEWORKS: &str = r#"
name = "two frameworks"

[[events]]
op = "add_client"
name = "A"

[[events]]
op = "add_client"
name = "B"

[[events]]
op = "add_resources"
resources = "cpus:10"

[[events]]
op = "allocated"
name = "A"
resources = "cpus:2"

[[events]]
op = "allocated"
name = "B"
resources = "cpus:1"

[[events]]
op = "sort"

[[events]]
op = "allocated"
name = "B"
resources = "cpus:3"

[[events]]
op = "sort"
"#;

    fn names(report: &SortReport) -> Vec<&str> {
        report.clients.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn parses_events() {
        let scenario = Scenario::from_toml(TWO_FRAMEWORKS).unwrap();
        assert_eq!(scenario.name.as_deref(), Some("two frameworks"));
        assert_eq!(scenario.events.len(), 8);
        assert_eq!(
            scenario.events[2],
            Event::AddResources {
                resources: Resources::scalar("cpus", 10.0)
            }
        );
        assert_eq!(scenario.events[5], Event::Sort);
    }

    #[test]
    fn replay_reports_each_sort() {
        let scenario = Scenario::from_toml(TWO_FRAMEWORKS).unwrap();
        scenario.validate().unwrap();

        let mut sorter = DrfSorter::new();
        let reports = scenario.replay(&mut sorter);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].event, 5);
        assert_eq!(names(&reports[0]), vec!["B", "A"]);
        assert_eq!(names(&reports[1]), vec!["A", "B"]);
        assert!((reports[1].clients[1].share - 0.4).abs() < 1e-12);
    }

    #[test]
    fn node_churn_demo() {
        let scenario =
            Scenario::from_toml(include_str!("../../../demos/node-churn.toml")).unwrap();
        scenario.validate().unwrap();

        let mut sorter = DrfSorter::new();
        let reports = scenario.replay(&mut sorter);

        assert_eq!(reports.len(), 3);
        assert_eq!(names(&reports[0]), vec!["web", "analytics", "batch"]);
        assert_eq!(names(&reports[1]), vec!["batch", "analytics"]);
        assert_eq!(names(&reports[2]), vec!["batch", "web", "analytics"]);
        // One pass covers both node registrations, one the node loss.
        assert_eq!(sorter.stats().full_recomputes, 2);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_FRAMEWORKS.as_bytes()).unwrap();

        let scenario = Scenario::from_file(file.path()).unwrap();
        assert_eq!(scenario.events.len(), 8);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Scenario::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ScenarioError::Io { .. }));
    }

    #[test]
    fn bad_resources_fail_to_parse() {
        let toml_str = r#"
[[events]]
op = "add_resources"
resources = "cpus:lots"
"#;
        let err = Scenario::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }

    #[test]
    fn unknown_op_fails_to_parse() {
        let toml_str = r#"
[[events]]
op = "explode"
"#;
        assert!(Scenario::from_toml(toml_str).is_err());
    }

    #[test]
    fn empty_scenario_is_valid() {
        let scenario = Scenario::from_toml("name = \"nothing\"").unwrap();
        scenario.validate().unwrap();
        assert!(scenario.replay(&mut DrfSorter::new()).is_empty());
    }

    #[test]
    fn rejects_activation_of_unknown_client() {
        let toml_str = r#"
[[events]]
op = "activate"
name = "ghost"
"#;
        let scenario = Scenario::from_toml(toml_str).unwrap();
        let err = scenario.validate().unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::UnknownClient { index: 0, op: "activate", .. }
        ));
    }

    #[test]
    fn rejects_allocation_after_removal() {
        let toml_str = r#"
[[events]]
op = "add_client"
name = "A"

[[events]]
op = "remove_client"
name = "A"

[[events]]
op = "allocated"
name = "A"
resources = "cpus:1"
"#;
        let scenario = Scenario::from_toml(toml_str).unwrap();
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::UnknownClient { index: 2, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_registration() {
        let toml_str = r#"
[[events]]
op = "add_client"
name = "A"

[[events]]
op = "add_client"
name = "A"
"#;
        let scenario = Scenario::from_toml(toml_str).unwrap();
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::DuplicateClient { index: 1, .. })
        ));
    }

    #[test]
    fn deactivate_then_activate_round_trip() {
        let toml_str = r#"
[[events]]
op = "add_client"
name = "A"

[[events]]
op = "add_client"
name = "B"

[[events]]
op = "deactivate"
name = "A"

[[events]]
op = "sort"

[[events]]
op = "activate"
name = "A"

[[events]]
op = "sort"
"#;
        let scenario = Scenario::from_toml(toml_str).unwrap();
        scenario.validate().unwrap();
        let reports = scenario.replay(&mut DrfSorter::new());
        assert_eq!(names(&reports[0]), vec!["B"]);
        assert_eq!(names(&reports[1]), vec!["A", "B"]);
    }
}
