//! View derivation shared by the plan panels

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Generate,
    Current,
    History,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Workouts,
    Nutrition,
}

/// Pick the panel's view from the `action` query parameter and stored data
///
/// Returns `None` while the panel is loading; callers keep the previous view.
pub fn derive_view(
    action: Option<&str>,
    has_current: bool,
    saved_count: usize,
    loading: bool,
    kind: PanelKind,
) -> Option<ViewMode> {
    if loading {
        return None;
    }

    let forced = match (kind, action) {
        (PanelKind::Workouts, Some("generate")) => Some(ViewMode::Generate),
        (PanelKind::Nutrition, Some("generate_plan")) => Some(ViewMode::Generate),
        (PanelKind::Nutrition, Some("log_meal")) => Some(ViewMode::Log),
        _ => None,
    };

    Some(forced.unwrap_or(if has_current {
        ViewMode::Current
    } else if saved_count > 0 {
        ViewMode::History
    } else {
        ViewMode::Generate
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use PanelKind::*;

    #[test]
    fn test_loading_keeps_previous_view() {
        assert_eq!(derive_view(Some("generate"), true, 3, true, Workouts), None);
    }

    #[test]
    fn test_actions() {
        assert_eq!(derive_view(Some("generate"), true, 1, false, Workouts), Some(ViewMode::Generate));
        assert_eq!(derive_view(Some("generate_plan"), true, 1, false, Nutrition), Some(ViewMode::Generate));
        assert_eq!(derive_view(Some("log_meal"), true, 1, false, Nutrition), Some(ViewMode::Log));
    }

    #[test]
    fn test_actions_are_panel_specific() {
        assert_eq!(derive_view(Some("log_meal"), true, 0, false, Workouts), Some(ViewMode::Current));
        assert_eq!(derive_view(Some("generate"), false, 2, false, Nutrition), Some(ViewMode::History));
    }

    #[test]
    fn test_data_driven_fallback() {
        for kind in [Workouts, Nutrition] {
            assert_eq!(derive_view(None, true, 0, false, kind), Some(ViewMode::Current));
            assert_eq!(derive_view(None, false, 2, false, kind), Some(ViewMode::History));
            assert_eq!(derive_view(None, false, 0, false, kind), Some(ViewMode::Generate));
            assert_eq!(derive_view(Some("other"), false, 0, false, kind), Some(ViewMode::Generate));
        }
    }
}
