use serde::{Deserialize, Serialize};

/// Group label applied to wishlist entries saved without one.
pub const DEFAULT_GROUP: &str = "기타";

/// WGS84 point. Replaced wholesale on every new selection.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Outcome of the restricted-zone containment check.
///
/// `Unavailable` means the backend could not be reached; the UI renders it
/// with the same theme as `Inside` (fail-closed) but the variant stays
/// distinct so that policy is an explicit branch, not an accidental default.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ZoneStatus {
    Inside,
    Outside,
    Unavailable,
}

impl ZoneStatus {
    /// Maps a containment-check outcome to a status. `None` stands for an
    /// unreachable or unparseable backend response.
    pub fn from_check(is_inside: Option<bool>) -> Self {
        match is_inside {
            Some(true) => ZoneStatus::Inside,
            Some(false) => ZoneStatus::Outside,
            None => ZoneStatus::Unavailable,
        }
    }

    /// Whether the location must be treated as forbidden. `Unavailable`
    /// reports forbidden so a backend outage never shows an "allowed" signal.
    pub fn is_forbidden(self) -> bool {
        !matches!(self, ZoneStatus::Outside)
    }
}

/// The single active selection. Created on click or search, address and zone
/// filled in as their lookups resolve, discarded on the next selection.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SelectedLocation {
    pub coordinate: Coordinate,
    pub address: Option<String>,
    pub zone: Option<ZoneStatus>,
}

impl SelectedLocation {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            address: None,
            zone: None,
        }
    }
}

/// A persisted favorite location. `address` is the unique key; saving the
/// same address twice overwrites on the backend rather than duplicating.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WishlistEntry {
    pub address: String,
    pub group_name: String,
    pub color: String,
    pub note: String,
}

/// One collapsible section of the rendered wishlist.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WishlistGroup {
    pub name: String,
    pub entries: Vec<WishlistEntry>,
}

impl WishlistGroup {
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

/// Groups entries by `group_name` (empty names fall into [`DEFAULT_GROUP`])
/// and sorts groups lexicographically. Entries inside a group keep a stable
/// address order so re-renders don't shuffle the list.
pub fn group_entries(mut entries: Vec<WishlistEntry>) -> Vec<WishlistGroup> {
    entries.sort_by(|a, b| a.address.cmp(&b.address));

    let mut groups: Vec<WishlistGroup> = Vec::new();
    for entry in entries {
        let name = if entry.group_name.trim().is_empty() {
            DEFAULT_GROUP.to_string()
        } else {
            entry.group_name.clone()
        };
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.entries.push(entry),
            None => groups.push(WishlistGroup {
                name,
                entries: vec![entry],
            }),
        }
    }
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    groups
}

/// A store inside a nearby building.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Store {
    pub name: String,
    pub category: String,
}

/// A commercial building within the nearby-search radius.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NearbyBuilding {
    pub building_address: String,
    pub location: Coordinate,
    pub stores: Vec<Store>,
}

impl NearbyBuilding {
    /// Popup label: store names joined, or the no-info placeholder.
    pub fn store_label(&self) -> String {
        if self.stores.is_empty() {
            "상가 정보 없음".to_string()
        } else {
            self.stores
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Full nearby-buildings response, replaced entirely on each (re)trigger.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NearbyBuildings {
    pub count: usize,
    pub radius_meter: f64,
    pub buildings: Vec<NearbyBuilding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(address: &str, group: &str) -> WishlistEntry {
        WishlistEntry {
            address: address.to_string(),
            group_name: group.to_string(),
            color: "#ff0000".to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn zone_check_failure_is_forbidden() {
        assert_eq!(ZoneStatus::from_check(None), ZoneStatus::Unavailable);
        assert!(ZoneStatus::Unavailable.is_forbidden());
        assert!(ZoneStatus::Inside.is_forbidden());
        assert!(!ZoneStatus::Outside.is_forbidden());
    }

    #[test]
    fn groups_sort_lexicographically() {
        let groups = group_entries(vec![
            entry("서울시청", "자주 가는 곳"),
            entry("강남역", "후보지"),
            entry("역삼역", "후보지"),
        ]);
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["자주 가는 곳", "후보지"]);
        assert_eq!(groups[1].count(), 2);
    }

    #[test]
    fn empty_group_falls_back_to_default_label() {
        let groups = group_entries(vec![entry("서울시청", ""), entry("강남역", "  ")]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, DEFAULT_GROUP);
        assert_eq!(groups[0].count(), 2);
    }

    #[test]
    fn entries_keep_stable_address_order_within_group() {
        let groups = group_entries(vec![entry("c", "g"), entry("a", "g"), entry("b", "g")]);
        let addrs: Vec<_> = groups[0]
            .entries
            .iter()
            .map(|e| e.address.as_str())
            .collect();
        assert_eq!(addrs, vec!["a", "b", "c"]);
    }

    #[test]
    fn store_label_joins_names_or_falls_back() {
        let mut building = NearbyBuilding {
            building_address: "서울 강남구 역삼동 1".to_string(),
            location: Coordinate::new(37.5, 127.0),
            stores: vec![],
        };
        assert_eq!(building.store_label(), "상가 정보 없음");

        building.stores = vec![
            Store {
                name: "GS25".to_string(),
                category: "편의점".to_string(),
            },
            Store {
                name: "파리바게뜨".to_string(),
                category: "베이커리".to_string(),
            },
        ];
        assert_eq!(building.store_label(), "GS25, 파리바게뜨");
    }
}
