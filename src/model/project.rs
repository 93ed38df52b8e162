use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Project lifecycle status. A fixed closed set, used both for display and
/// for the board's status filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Planned,
    Active,
    Paused,
    Done,
    Archived,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Planned,
        ProjectStatus::Active,
        ProjectStatus::Paused,
        ProjectStatus::Done,
        ProjectStatus::Archived,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Done => "done",
            ProjectStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<ProjectStatus> {
        ProjectStatus::ALL.into_iter().find(|st| st.label() == s)
    }

    /// Cycle through statuses in display order
    pub fn next(self) -> ProjectStatus {
        match self {
            ProjectStatus::Planned => ProjectStatus::Active,
            ProjectStatus::Active => ProjectStatus::Paused,
            ProjectStatus::Paused => ProjectStatus::Done,
            ProjectStatus::Done => ProjectStatus::Archived,
            ProjectStatus::Archived => ProjectStatus::Planned,
        }
    }
}

/// Which project statuses are visible on the board. Statuses absent from the
/// map are visible; the default shows everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFilter(BTreeMap<ProjectStatus, bool>);

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter(
            ProjectStatus::ALL
                .into_iter()
                .map(|status| (status, true))
                .collect(),
        )
    }
}

impl StatusFilter {
    pub fn allows(&self, status: ProjectStatus) -> bool {
        self.0.get(&status).copied().unwrap_or(true)
    }

    pub fn toggle(&mut self, status: ProjectStatus) {
        let visible = self.allows(status);
        self.0.insert(status, !visible);
    }

    pub fn show_all(&mut self) {
        for status in ProjectStatus::ALL {
            self.0.insert(status, true);
        }
    }

    pub fn all_visible(&self) -> bool {
        ProjectStatus::ALL.into_iter().all(|s| self.allows(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_allows_everything() {
        let filter = StatusFilter::default();
        for status in ProjectStatus::ALL {
            assert!(filter.allows(status));
        }
        assert!(filter.all_visible());
    }

    #[test]
    fn toggle_hides_then_shows() {
        let mut filter = StatusFilter::default();
        filter.toggle(ProjectStatus::Archived);
        assert!(!filter.allows(ProjectStatus::Archived));
        assert!(filter.allows(ProjectStatus::Active));
        assert!(!filter.all_visible());

        filter.toggle(ProjectStatus::Archived);
        assert!(filter.all_visible());
    }

    #[test]
    fn missing_status_in_stored_map_is_visible() {
        // A filter saved by an older build may not mention every status
        let filter: StatusFilter = serde_json::from_str(r#"{"done": false}"#).unwrap();
        assert!(!filter.allows(ProjectStatus::Done));
        assert!(filter.allows(ProjectStatus::Planned));
    }

    #[test]
    fn status_cycle_covers_the_closed_set() {
        let mut seen = vec![ProjectStatus::Planned];
        let mut cur = ProjectStatus::Planned;
        for _ in 0..4 {
            cur = cur.next();
            seen.push(cur);
        }
        assert_eq!(seen, ProjectStatus::ALL.to_vec());
        assert_eq!(cur.next(), ProjectStatus::Planned);
    }

    #[test]
    fn parse_round_trips_labels() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::parse(status.label()), Some(status));
        }
        assert_eq!(ProjectStatus::parse("bogus"), None);
    }
}
