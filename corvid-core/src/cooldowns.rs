use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;

/// A single cooldown record for a (subject, command) pair.
#[derive(Clone, Copy, Debug)]
pub struct CooldownRecord {
    pub executed_at: Instant,
    pub duration: Duration,
}

/// Everything an error renderer needs to explain a cooldown to the user.
#[derive(Clone, Copy, Debug)]
pub struct CooldownInfo {
    pub executed_at: Instant,
    pub duration: Duration,
    /// Time left until the cooldown lapses. Zero if it already has.
    pub wait_more: Duration,
}

struct RecordExpiry;

impl Expiry<(u64, String), CooldownRecord> for RecordExpiry {
    fn expire_after_create(
        &self,
        _key: &(u64, String),
        value: &CooldownRecord,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.duration)
    }
}

/// All command cooldowns, in the format <(subject id, command name) =>
/// record of when the command was last run and for how long it is locked>.
///
/// Records expire on their own once their duration elapses; an expired
/// record is never observable through any accessor.
pub struct CooldownStore(Cache<(u64, String), CooldownRecord>);

impl CooldownStore {
    pub fn new() -> Self {
        Self(
            Cache::builder()
                .max_capacity(10_000)
                .expire_after(RecordExpiry)
                .support_invalidation_closures()
                .build(),
        )
    }

    pub fn is_in_cooldown(&self, subject: u64, command_name: &str) -> bool {
        self.0.get(&(subject, command_name.to_owned())).is_some()
    }

    pub fn get_cooldown(&self, subject: u64, command_name: &str) -> Option<CooldownInfo> {
        self.0.get(&(subject, command_name.to_owned())).map(|record| {
            let deadline = record.executed_at + record.duration;
            CooldownInfo {
                executed_at: record.executed_at,
                duration: record.duration,
                wait_more: deadline.saturating_duration_since(Instant::now()),
            }
        })
    }

    /// Inserts a new record. No-op when `duration` is zero or a live
    /// record already exists for this pair.
    pub fn set_cooldown(&self, subject: u64, command_name: &str, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        let key = (subject, command_name.to_owned());
        if self.0.get(&key).is_some() {
            return;
        }

        self.0.insert(
            key,
            CooldownRecord {
                executed_at: Instant::now(),
                duration,
            },
        );
    }

    /// Drops every record for a command, regardless of subject. Used when
    /// a command is unloaded.
    pub fn clear_command(&self, command_name: &str) {
        let command_name = command_name.to_owned();
        // failure here means invalidation closures were not enabled, which
        // the constructor guarantees
        let _ = self.0.invalidate_entries_if(move |(_, name), _| *name == command_name);
    }
}

impl Default for CooldownStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread::sleep;

    use super::*;

    #[test]
    fn zero_cooldown_never_recorded() {
        let store = CooldownStore::new();
        store.set_cooldown(1, "test", Duration::ZERO);
        assert!(!store.is_in_cooldown(1, "test"));
        assert!(store.get_cooldown(1, "test").is_none());
    }

    #[test]
    fn set_then_get() {
        let store = CooldownStore::new();
        store.set_cooldown(1, "test", Duration::from_secs(10));
        assert!(store.is_in_cooldown(1, "test"));

        let info = store.get_cooldown(1, "test").unwrap();
        assert!(info.wait_more > Duration::ZERO);
        assert!(info.wait_more <= Duration::from_secs(10));
        assert_eq!(info.duration, Duration::from_secs(10));
    }

    #[test]
    fn set_is_noop_while_live() {
        let store = CooldownStore::new();
        store.set_cooldown(1, "test", Duration::from_secs(10));
        let first = store.get_cooldown(1, "test").unwrap();

        store.set_cooldown(1, "test", Duration::from_secs(100));
        let second = store.get_cooldown(1, "test").unwrap();
        assert_eq!(first.executed_at, second.executed_at);
        assert_eq!(second.duration, Duration::from_secs(10));
    }

    #[test]
    fn records_are_per_subject_and_command() {
        let store = CooldownStore::new();
        store.set_cooldown(1, "a", Duration::from_secs(10));
        assert!(!store.is_in_cooldown(2, "a"));
        assert!(!store.is_in_cooldown(1, "b"));
    }

    #[test]
    fn record_expires() {
        let store = CooldownStore::new();
        store.set_cooldown(1, "test", Duration::from_millis(100));
        assert!(store.is_in_cooldown(1, "test"));
        sleep(Duration::from_millis(150));
        assert!(!store.is_in_cooldown(1, "test"));
    }

    #[test]
    fn clear_command_drops_all_subjects() {
        let store = CooldownStore::new();
        store.set_cooldown(1, "test", Duration::from_secs(10));
        store.set_cooldown(2, "test", Duration::from_secs(10));
        store.set_cooldown(1, "other", Duration::from_secs(10));

        store.clear_command("test");
        // invalidation closures apply eagerly on read
        assert!(store.get_cooldown(1, "test").is_none());
        assert!(store.get_cooldown(2, "test").is_none());
        assert!(store.get_cooldown(1, "other").is_some());
    }
}
