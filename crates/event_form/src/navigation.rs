//! Bottom navigation bar model.

use serde::Serialize;
use shared::domain::Destination;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub destination: Destination,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationRequest {
    pub destination: Destination,
    pub route: &'static str,
}

/// `current` is `None` while a screen outside the tab set is showing.
pub fn navigation_items(current: Option<Destination>) -> Vec<NavigationItem> {
    Destination::TABS
        .into_iter()
        .map(|destination| NavigationItem {
            destination,
            label: destination.label(),
            selected: current == Some(destination),
        })
        .collect()
}

/// Tapping the tab that is already showing does nothing.
pub fn on_item_selected(
    current: Option<Destination>,
    target: Destination,
) -> Option<NavigationRequest> {
    if current == Some(target) {
        return None;
    }
    Some(NavigationRequest {
        destination: target,
        route: target.route(),
    })
}
