use std::collections::BTreeMap;

/// Flat field-name → value mapping for a student.
///
/// Ordered so that serialization and prompt rendering are deterministic.
pub type Profile = BTreeMap<String, String>;
