//! Notifications from the collection manager to the view layer

use crate::SystemRef;
use emufront_catalog::EntryId;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    MetadataChanged,
    Sorted,
    Removed,
}

/// What a change notification is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewTarget {
    /// A real catalog game
    Game(EntryId),
    /// A collection entry, by full path key
    Entry { system: SystemRef, key: String },
    /// The root folder of a displayed system
    Root(SystemRef),
}

/// View layer driven by the collection manager
pub trait ViewBinding {
    fn on_file_changed(&mut self, target: ViewTarget, change: ChangeKind);

    /// Drop the game list view built for a system
    fn remove_game_list_view(&mut self, system: &SystemRef);

    /// Whether a game list view is currently built for a system
    fn has_game_list_view(&self, system: &SystemRef) -> bool;

    /// Remove an entry shown in a live game list view
    fn remove_entry(&mut self, system: &SystemRef, key: &str);

    /// Rebuild the game list view of a system from its current contents
    fn repopulate(&mut self, system: &SystemRef);

    /// Transient message for the user
    fn notify(&mut self, message: &str, duration: Duration);
}

/// A view that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl ViewBinding for NullView {
    fn on_file_changed(&mut self, _target: ViewTarget, _change: ChangeKind) {}

    fn remove_game_list_view(&mut self, _system: &SystemRef) {}

    fn has_game_list_view(&self, _system: &SystemRef) -> bool {
        false
    }

    fn remove_entry(&mut self, _system: &SystemRef, _key: &str) {}

    fn repopulate(&mut self, _system: &SystemRef) {}

    fn notify(&mut self, message: &str, _duration: Duration) {
        tracing::debug!("Notification: {}", message);
    }
}
