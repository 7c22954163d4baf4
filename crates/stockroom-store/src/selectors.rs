//! # Derived-State Selectors
//!
//! Pure computations over store snapshots, plus a revision-keyed memo
//! cell so repeated renders of unchanged state reuse the last result.
//!
//! ## Recompute Rule
//! ```text
//! store.dispatch(..) ──► revision += 1 ──► memo miss ──► recompute
//! render, no dispatch ──► revision same ──► memo hit  ──► cached value
//! ```

use std::sync::Mutex;

use chrono::Duration;

use stockroom_core::{Item, ItemImage, ReservationStatus, Role};

use crate::inventory::InventoryState;
use crate::reservations::ReservationRow;
use crate::users::UserRow;

// =============================================================================
// Memo
// =============================================================================

/// Revision-keyed memo cell for one derived value.
///
/// Recomputes only when the store revision moved since the cached value
/// was produced.
#[derive(Debug, Default)]
pub struct Memo<T> {
    cached: Mutex<Option<(u64, T)>>,
}

impl<T: Clone> Memo<T> {
    pub fn new() -> Self {
        Memo {
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached value for `revision`, or computes and caches it.
    pub fn get_or_compute(&self, revision: u64, compute: impl FnOnce() -> T) -> T {
        let mut slot = self.cached.lock().expect("memo mutex poisoned");
        match slot.as_ref() {
            Some((cached_revision, value)) if *cached_revision == revision => value.clone(),
            _ => {
                let value = compute();
                *slot = Some((revision, value.clone()));
                value
            }
        }
    }
}

// =============================================================================
// Reservation Selectors
// =============================================================================

/// Buckets reservation rows per status, in dashboard display order.
/// Every status appears, empty buckets included, so tab headers stay
/// stable.
pub fn group_by_status(rows: &[ReservationRow]) -> Vec<(ReservationStatus, Vec<ReservationRow>)> {
    ReservationStatus::ALL
        .into_iter()
        .map(|status| {
            let bucket = rows
                .iter()
                .filter(|row| row.reservation.status == status)
                .cloned()
                .collect();
            (status, bucket)
        })
        .collect()
}

/// Usage aggregate for one item across reservations.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUsage {
    pub item_id: i64,
    pub item_name: String,
    pub reservation_count: usize,
    pub total_duration: Duration,
}

impl ItemUsage {
    /// Mean reservation length for this item.
    pub fn average_duration(&self) -> Duration {
        if self.reservation_count == 0 {
            Duration::zero()
        } else {
            self.total_duration / self.reservation_count as i32
        }
    }
}

/// Aggregates reservation durations per item, heaviest usage first.
///
/// Cancelled/denied/missed bookings never held the item, so they are
/// excluded from the aggregates.
pub fn usage_stats(rows: &[ReservationRow]) -> Vec<ItemUsage> {
    let mut stats: Vec<ItemUsage> = Vec::new();

    for row in rows {
        let reservation = &row.reservation;
        if matches!(
            reservation.status,
            ReservationStatus::Cancelled | ReservationStatus::Denied | ReservationStatus::Missed
        ) {
            continue;
        }

        let duration = reservation.duration();
        match stats.iter_mut().find(|s| s.item_id == reservation.item.id) {
            Some(entry) => {
                entry.reservation_count += 1;
                entry.total_duration = entry.total_duration + duration;
            }
            None => stats.push(ItemUsage {
                item_id: reservation.item.id,
                item_name: reservation.item.name.clone(),
                reservation_count: 1,
                total_duration: duration,
            }),
        }
    }

    stats.sort_by(|a, b| b.total_duration.cmp(&a.total_duration));
    stats
}

// =============================================================================
// Inventory Selectors
// =============================================================================

/// Images attached to the given item (root or child).
pub fn images_for_item(state: &InventoryState, item_id: i64) -> Vec<ItemImage> {
    state
        .find_item(item_id)
        .map(|item| item.images.clone())
        .unwrap_or_default()
}

/// Root items currently eligible for reservation (not retired).
pub fn reservable_items(state: &InventoryState) -> Vec<Item> {
    state
        .items
        .iter()
        .filter(|item| item.reservable())
        .cloned()
        .collect()
}

// =============================================================================
// Directory Selectors
// =============================================================================

/// The registered-user list as visible to the given viewer role.
///
/// The directory is an admin surface: regular users see nothing.
pub fn visible_to_role(rows: &[UserRow], viewer: Role) -> Vec<UserRow> {
    if viewer.is_admin_or_super() {
        rows.to_vec()
    } else {
        Vec::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservations::ReservationRow;
    use crate::testing::{test_base_user, test_item, test_reservation};
    use crate::users::UserRow;
    use chrono::TimeZone;
    use chrono::Utc;

    fn row_with_window(
        id: i64,
        status: ReservationStatus,
        item_id: i64,
        hours: i64,
    ) -> ReservationRow {
        let mut reservation = test_reservation(id, status, 0);
        reservation.item = test_item(item_id);
        reservation.start_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        reservation.end_at = reservation.start_at + Duration::hours(hours);
        ReservationRow::new(reservation)
    }

    #[test]
    fn test_group_by_status_keeps_empty_buckets() {
        let rows = vec![
            row_with_window(1, ReservationStatus::Pending, 1, 2),
            row_with_window(2, ReservationStatus::Pending, 1, 2),
            row_with_window(3, ReservationStatus::Late, 2, 4),
        ];

        let groups = group_by_status(&rows);
        assert_eq!(groups.len(), ReservationStatus::ALL.len());

        let pending = groups
            .iter()
            .find(|(s, _)| *s == ReservationStatus::Pending)
            .unwrap();
        assert_eq!(pending.1.len(), 2);

        let returned = groups
            .iter()
            .find(|(s, _)| *s == ReservationStatus::Returned)
            .unwrap();
        assert!(returned.1.is_empty());
    }

    #[test]
    fn test_usage_stats_aggregate_and_order() {
        let rows = vec![
            row_with_window(1, ReservationStatus::Returned, 1, 2),
            row_with_window(2, ReservationStatus::CheckedOut, 1, 4),
            row_with_window(3, ReservationStatus::Returned, 2, 10),
            // Never held the item: excluded
            row_with_window(4, ReservationStatus::Cancelled, 1, 100),
        ];

        let stats = usage_stats(&rows);
        assert_eq!(stats.len(), 2);

        // Heaviest usage first
        assert_eq!(stats[0].item_id, 2);
        assert_eq!(stats[0].total_duration, Duration::hours(10));

        assert_eq!(stats[1].item_id, 1);
        assert_eq!(stats[1].reservation_count, 2);
        assert_eq!(stats[1].total_duration, Duration::hours(6));
        assert_eq!(stats[1].average_duration(), Duration::hours(3));
    }

    #[test]
    fn test_reservable_excludes_retired() {
        let mut retired = test_item(1);
        retired.retired_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let state = InventoryState {
            items: vec![retired, test_item(2)],
        };

        let eligible = reservable_items(&state);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, 2);
    }

    #[test]
    fn test_images_for_item_missing_item_is_empty() {
        let state = InventoryState { items: vec![] };
        assert!(images_for_item(&state, 42).is_empty());
    }

    #[test]
    fn test_directory_hidden_from_regular_users() {
        let rows = vec![
            UserRow::new(test_base_user(1, Role::User)),
            UserRow::new(test_base_user(2, Role::Admin)),
        ];

        assert_eq!(visible_to_role(&rows, Role::Admin).len(), 2);
        assert_eq!(visible_to_role(&rows, Role::Super).len(), 2);
        assert!(visible_to_role(&rows, Role::User).is_empty());
    }

    #[test]
    fn test_memo_reuses_until_revision_moves() {
        let memo: Memo<Vec<i64>> = Memo::new();
        let mut computes = 0;

        let first = memo.get_or_compute(1, || {
            computes += 1;
            vec![1, 2, 3]
        });
        let second = memo.get_or_compute(1, || {
            computes += 1;
            vec![9, 9, 9]
        });
        assert_eq!(first, second);
        assert_eq!(computes, 1);

        let third = memo.get_or_compute(2, || {
            computes += 1;
            vec![4]
        });
        assert_eq!(third, vec![4]);
        assert_eq!(computes, 2);
    }
}
