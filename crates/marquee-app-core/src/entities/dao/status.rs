use strum::{AsRefStr, Display, EnumString};

/// Visibility of a catalog row.  `Deleted` is a soft-delete tombstone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Deleted,
}
