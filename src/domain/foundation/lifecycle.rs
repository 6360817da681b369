//! Soft-delete lifecycle and repository lookup results.
//!
//! Aggregates that can be soft-deleted carry a [`Lifecycle`] instead of a
//! nullable deletion timestamp. Repositories report what they found through
//! [`Lookup`], so handlers resolve "missing" and "deleted" in one place.

use serde::{Deserialize, Serialize};

use super::{Timestamp, UserId};

/// Lifecycle state of a soft-deletable aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted {
        deleted_at: Timestamp,
        deleted_by: Option<UserId>,
    },
}

impl Lifecycle {
    /// Creates a deleted lifecycle stamped with the current time.
    pub fn deleted_now(by: Option<UserId>) -> Self {
        Lifecycle::Deleted {
            deleted_at: Timestamp::now(),
            deleted_by: by,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Lifecycle::Deleted { .. })
    }

    /// Returns the deletion time, if deleted.
    pub fn deleted_at(&self) -> Option<&Timestamp> {
        match self {
            Lifecycle::Active => None,
            Lifecycle::Deleted { deleted_at, .. } => Some(deleted_at),
        }
    }

    /// Returns who deleted the aggregate, if recorded.
    pub fn deleted_by(&self) -> Option<&UserId> {
        match self {
            Lifecycle::Active => None,
            Lifecycle::Deleted { deleted_by, .. } => deleted_by.as_ref(),
        }
    }
}

/// Outcome of a repository lookup for a soft-deletable aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Found and not deleted.
    Active(T),
    /// Found, but soft-deleted.
    Deleted,
    /// No record with that key exists.
    Missing,
}

impl<T> Lookup<T> {
    /// Builds a lookup from an optional record and its lifecycle accessor.
    pub fn from_record(record: Option<T>, lifecycle: impl FnOnce(&T) -> &Lifecycle) -> Self {
        match record {
            None => Lookup::Missing,
            Some(value) if lifecycle(&value).is_deleted() => Lookup::Deleted,
            Some(value) => Lookup::Active(value),
        }
    }

    /// Converts to a result, mapping the missing and deleted cases to errors.
    pub fn require<E>(
        self,
        missing: impl FnOnce() -> E,
        deleted: impl FnOnce() -> E,
    ) -> Result<T, E> {
        match self {
            Lookup::Active(value) => Ok(value),
            Lookup::Deleted => Err(deleted()),
            Lookup::Missing => Err(missing()),
        }
    }

    /// Returns the active value, treating deleted records as absent.
    pub fn into_active(self) -> Option<T> {
        match self {
            Lookup::Active(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Active(value) => Lookup::Active(f(value)),
            Lookup::Deleted => Lookup::Deleted,
            Lookup::Missing => Lookup::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Record {
        lifecycle: Lifecycle,
    }

    #[test]
    fn default_lifecycle_is_active() {
        assert!(!Lifecycle::default().is_deleted());
        assert!(Lifecycle::default().deleted_at().is_none());
    }

    #[test]
    fn deleted_now_records_actor() {
        let by = UserId::new("admin").unwrap();
        let lifecycle = Lifecycle::deleted_now(Some(by.clone()));
        assert!(lifecycle.is_deleted());
        assert_eq!(lifecycle.deleted_by(), Some(&by));
    }

    #[test]
    fn from_record_distinguishes_all_cases() {
        let active = Lookup::from_record(Some(Record { lifecycle: Lifecycle::Active }), |r| {
            &r.lifecycle
        });
        assert!(matches!(active, Lookup::Active(_)));

        let deleted = Lookup::from_record(
            Some(Record {
                lifecycle: Lifecycle::deleted_now(None),
            }),
            |r| &r.lifecycle,
        );
        assert_eq!(deleted, Lookup::Deleted);

        let missing: Lookup<Record> = Lookup::from_record(None, |r| &r.lifecycle);
        assert_eq!(missing, Lookup::Missing);
    }

    #[test]
    fn require_maps_each_case_to_its_error() {
        let missing: Lookup<u8> = Lookup::Missing;
        assert_eq!(missing.require(|| "missing", || "deleted"), Err("missing"));

        let deleted: Lookup<u8> = Lookup::Deleted;
        assert_eq!(deleted.require(|| "missing", || "deleted"), Err("deleted"));

        assert_eq!(Lookup::Active(7u8).require(|| "missing", || "deleted"), Ok(7));
    }

    #[test]
    fn into_active_drops_deleted_records() {
        assert_eq!(Lookup::Active(1).into_active(), Some(1));
        assert_eq!(Lookup::<i32>::Deleted.into_active(), None);
        assert_eq!(Lookup::Active(2).map(|v| v * 2).into_active(), Some(4));
    }
}
