//! Category change events.

use serde::{Deserialize, Serialize};

use crate::host::ItemId;

/// Emitted by the store after each successful mutation.
///
/// The UI layer subscribes to keep its panes in sync with category state;
/// no event fires for no-op calls (duplicate create, absent delete,
/// already-assigned tag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CategoryEvent {
    Created(String),
    Deleted(String),
    Renamed { from: String, to: String },
    Assigned { item: ItemId, name: String },
    Unassigned { item: ItemId, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serde_round_trip() {
        let events = vec![
            CategoryEvent::Created("Fieldwork".into()),
            CategoryEvent::Deleted("Fieldwork".into()),
            CategoryEvent::Renamed {
                from: "Fieldwork".into(),
                to: "Archive".into(),
            },
            CategoryEvent::Assigned {
                item: 42,
                name: "Archive".into(),
            },
            CategoryEvent::Unassigned {
                item: 42,
                name: "Archive".into(),
            },
        ];
        for e in &events {
            let json = serde_json::to_string(e).unwrap();
            let back: CategoryEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(*e, back);
        }
    }
}
