//! Render snapshot cache
//!
//! A cacheable response is rendered once into an immutable snapshot. Later
//! renders within the same wall-clock second hand out that snapshot as is;
//! once the second changes, the snapshot is copied, the 29-byte `Date` field
//! is rewritten in the copy, and the copy replaces the held snapshot.
//! Published bytes are never written again, so readers holding an older
//! snapshot keep seeing exactly what they were given.

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::date::{format_http_date, HTTP_DATE_LEN};
use crate::error::Result;

/// One fully rendered version of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub bytes: Bytes,
    /// Offset of the date text, `None` when rendered without a `Date` line
    pub date_offset: Option<usize>,
    /// Body length written into the head
    pub content_length: u64,
    /// Whole seconds since the epoch at which `bytes` were rendered
    pub second: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Fresh,
    Stale,
}

/// Holder of the current snapshot
///
/// The lock only guards which snapshot is current; snapshot bytes are never
/// modified after publication.
#[derive(Debug, Default)]
pub struct RenderCache {
    current: RwLock<Option<Snapshot>>,
}

impl Clone for RenderCache {
    fn clone(&self) -> Self {
        Self {
            current: RwLock::new(self.current.read().clone()),
        }
    }
}

impl RenderCache {
    /// Return the current snapshot, patching the date or rendering as needed
    ///
    /// `render` produces a complete snapshot for the given time; it runs only
    /// when there is nothing usable to patch.
    pub fn get_or_render<F>(&self, now: DateTime<Utc>, render: F) -> Result<Snapshot>
    where
        F: FnOnce(DateTime<Utc>) -> Result<Snapshot>,
    {
        let second = now.timestamp();
        let current = self.current.read().clone();

        if let Some(snapshot) = current {
            let Some(offset) = snapshot.date_offset else {
                return Ok(snapshot);
            };
            if snapshot.second == second {
                return Ok(snapshot);
            }
            if let Some(bytes) = patch_date(&snapshot.bytes, offset, now) {
                let patched = Snapshot {
                    bytes,
                    second,
                    ..snapshot
                };
                self.publish(patched.clone());
                return Ok(patched);
            }
        }

        let rendered = render(now)?;
        self.publish(rendered.clone());
        Ok(rendered)
    }

    pub fn state(&self, now_secs: i64) -> CacheState {
        match self.current.read().as_ref() {
            None => CacheState::Empty,
            Some(s) if s.date_offset.is_none() || s.second == now_secs => CacheState::Fresh,
            Some(_) => CacheState::Stale,
        }
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.current.read().clone()
    }

    pub fn invalidate(&mut self) {
        *self.current.get_mut() = None;
    }

    /// Swap in a newer snapshot; an older one never replaces a newer one
    fn publish(&self, snapshot: Snapshot) {
        let mut current = self.current.write();
        if current.as_ref().map_or(true, |held| held.second <= snapshot.second) {
            *current = Some(snapshot);
        }
    }
}

/// Copy `bytes` with the date field at `offset` rewritten for `now`
fn patch_date(bytes: &Bytes, offset: usize, now: DateTime<Utc>) -> Option<Bytes> {
    let date = format_http_date(now);
    if date.len() != HTTP_DATE_LEN {
        return None;
    }
    let mut copy = BytesMut::from(&bytes[..]);
    copy.get_mut(offset..offset + HTTP_DATE_LEN)?
        .copy_from_slice(date.as_bytes());
    Some(copy.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn rendered(now: DateTime<Utc>) -> Snapshot {
        let text = format!("HTTP/1.1 404 Not Found\r\nDate: {}\r\n\r\nbody", format_http_date(now));
        Snapshot {
            bytes: Bytes::from(text),
            date_offset: Some("HTTP/1.1 404 Not Found\r\nDate: ".len()),
            content_length: 4,
            second: now.timestamp(),
        }
    }

    #[test]
    fn test_same_second_reuses_snapshot() {
        let cache = RenderCache::default();
        let now = Utc.with_ymd_and_hms(2019, 8, 23, 12, 58, 3).unwrap();
        assert_eq!(cache.state(now.timestamp()), CacheState::Empty);

        let a = cache.get_or_render(now, |t| Ok(rendered(t))).unwrap();
        let b = cache
            .get_or_render(now, |_| panic!("must not re-render"))
            .unwrap();
        assert_eq!(a.bytes.as_ptr(), b.bytes.as_ptr());
        assert_eq!(cache.state(now.timestamp()), CacheState::Fresh);
    }

    #[test]
    fn test_new_second_patches_copy() {
        let cache = RenderCache::default();
        let now = Utc.with_ymd_and_hms(2019, 8, 23, 12, 58, 3).unwrap();
        let a = cache.get_or_render(now, |t| Ok(rendered(t))).unwrap().bytes;
        let a_before = a.to_vec();

        let later = now + Duration::seconds(1);
        assert_eq!(cache.state(later.timestamp()), CacheState::Stale);
        let b = cache
            .get_or_render(later, |_| panic!("must patch, not re-render"))
            .unwrap();

        assert_eq!(a.to_vec(), a_before);
        assert_ne!(a, b.bytes);
        assert_eq!(b, rendered(later));
        assert_eq!(cache.snapshot().unwrap().second, later.timestamp());
    }

    #[test]
    fn test_snapshot_without_date_is_returned_forever() {
        let cache = RenderCache::default();
        let now = Utc.with_ymd_and_hms(2019, 8, 23, 12, 58, 3).unwrap();
        let a = cache
            .get_or_render(now, |t| {
                Ok(Snapshot {
                    bytes: Bytes::from_static(b"static"),
                    date_offset: None,
                    content_length: 0,
                    second: t.timestamp(),
                })
            })
            .unwrap();
        let b = cache
            .get_or_render(now + Duration::hours(1), |_| panic!("no re-render"))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_older_snapshot_does_not_replace_newer() {
        let cache = RenderCache::default();
        let now = Utc.with_ymd_and_hms(2019, 8, 23, 12, 58, 3).unwrap();
        let later = now + Duration::seconds(5);
        cache.get_or_render(later, |t| Ok(rendered(t))).unwrap();

        let old = cache.get_or_render(now, |_| panic!("patch")).unwrap();
        assert_eq!(old, rendered(now));
        assert_eq!(cache.snapshot().unwrap().second, later.timestamp());
    }

    #[test]
    fn test_invalidate() {
        let mut cache = RenderCache::default();
        let now = Utc.with_ymd_and_hms(2019, 8, 23, 12, 58, 3).unwrap();
        cache.get_or_render(now, |t| Ok(rendered(t))).unwrap();
        cache.invalidate();
        assert_eq!(cache.snapshot(), None);
    }
}
