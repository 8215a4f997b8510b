//! Packing request status.

use serde::{Deserialize, Serialize};

/// Lifecycle of a packing request for one shop.
///
/// There is no `Absent` variant: a shop without a packing request simply has
/// no status, so lookups return `Option<PackingStatus>`.
///
/// ```text
/// (absent) -> Pending -> Processing -> Completed
///                \-> (absent)   cancel
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingStatus {
    /// Requested by the customer, not yet picked up by the shop.
    Pending,
    /// The shop owner is packing the order.
    Processing,
    /// The shop owner has finished packing.
    Completed,
}

impl PackingStatus {
    /// Whether the shop group is locked while in this status.
    ///
    /// Lines belonging to a shop with an active request cannot be edited or
    /// deleted until the request is cancelled.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// The status reached by the next fulfillment signal from the shop.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Processing),
            Self::Processing => Some(Self::Completed),
            Self::Completed => None,
        }
    }
}

impl std::fmt::Display for PackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for PackingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid packing status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses() {
        assert!(PackingStatus::Pending.is_active());
        assert!(PackingStatus::Processing.is_active());
        assert!(!PackingStatus::Completed.is_active());
    }

    #[test]
    fn test_next_walks_the_lifecycle() {
        assert_eq!(PackingStatus::Pending.next(), Some(PackingStatus::Processing));
        assert_eq!(
            PackingStatus::Processing.next(),
            Some(PackingStatus::Completed)
        );
        assert_eq!(PackingStatus::Completed.next(), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&PackingStatus::Processing).unwrap();
        assert_eq!(json, r#""processing""#);

        let status: PackingStatus = serde_json::from_str(r#""completed""#).unwrap();
        assert_eq!(status, PackingStatus::Completed);
    }

    #[test]
    fn test_display_matches_from_str() {
        for status in [
            PackingStatus::Pending,
            PackingStatus::Processing,
            PackingStatus::Completed,
        ] {
            assert_eq!(status.to_string().parse::<PackingStatus>().unwrap(), status);
        }
        assert!("absent".parse::<PackingStatus>().is_err());
    }
}
