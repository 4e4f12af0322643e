//! Runtime edit capabilities.
//!
//! The debugged runtime advertises which kinds of metadata changes it can
//! apply. Every capability-gated decision goes through a
//! [`CapabilityGrantor`]; the analyzer records what it asked for so callers
//! can report which capabilities an edit needed.

use std::cell::Cell;

use bitflags::bitflags;

bitflags! {
    /// Metadata edits the attached runtime can apply.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct EditCapabilities: u32 {
        /// Method body updates.
        const BASELINE = 1 << 0;
        const ADD_METHOD_TO_EXISTING_TYPE = 1 << 1;
        const ADD_STATIC_FIELD_TO_EXISTING_TYPE = 1 << 2;
        const ADD_INSTANCE_FIELD_TO_EXISTING_TYPE = 1 << 3;
        const NEW_TYPE_DEFINITION = 1 << 4;
        const CHANGE_CUSTOM_ATTRIBUTES = 1 << 5;
        const UPDATE_PARAMETERS = 1 << 6;
        const GENERIC_ADD_METHOD_TO_EXISTING_TYPE = 1 << 7;
        const GENERIC_UPDATE_METHOD = 1 << 8;
        const GENERIC_ADD_FIELD_TO_EXISTING_TYPE = 1 << 9;
        const ADD_EXPLICIT_INTERFACE_IMPLEMENTATION = 1 << 10;
    }
}

impl EditCapabilities {
    /// Names of the set flags, for logging.
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

/// Answers whether the attached runtime supports a set of capabilities.
pub trait CapabilityGrantor {
    fn is_available(&self, capabilities: EditCapabilities) -> bool;
}

impl CapabilityGrantor for EditCapabilities {
    fn is_available(&self, capabilities: EditCapabilities) -> bool {
        self.contains(capabilities)
    }
}

/// Wraps a grantor and accumulates every capability requested through it.
pub struct CapabilityTracker<'a> {
    grantor: &'a dyn CapabilityGrantor,
    requested: Cell<EditCapabilities>,
}

impl<'a> CapabilityTracker<'a> {
    pub fn new(grantor: &'a dyn CapabilityGrantor) -> Self {
        Self {
            grantor,
            requested: Cell::new(EditCapabilities::empty()),
        }
    }

    /// Request `capabilities`; returns whether all of them are available.
    pub fn grant(&self, capabilities: EditCapabilities) -> bool {
        self.requested.set(self.requested.get() | capabilities);
        self.grantor.is_available(capabilities)
    }

    pub fn requested(&self) -> EditCapabilities {
        self.requested.get()
    }
}

impl std::fmt::Debug for CapabilityTracker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityTracker")
            .field("requested", &self.requested.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_records_requests() {
        let available = EditCapabilities::BASELINE | EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE;
        let tracker = CapabilityTracker::new(&available);

        assert!(tracker.grant(EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE));
        assert!(!tracker.grant(EditCapabilities::NEW_TYPE_DEFINITION));
        assert_eq!(
            tracker.requested(),
            EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE | EditCapabilities::NEW_TYPE_DEFINITION
        );
    }

    #[test]
    fn test_names() {
        let caps = EditCapabilities::BASELINE | EditCapabilities::UPDATE_PARAMETERS;
        assert_eq!(caps.names(), vec!["BASELINE", "UPDATE_PARAMETERS"]);
    }
}
