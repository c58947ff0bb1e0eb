//! URL segment generation
//!
//! Segments are slugs unique among draft elements of the same type tag.
//! Collisions are resolved by appending `-2`, `-3`, ... to the filtered base.

use std::collections::HashMap;

use chrono::Utc;

use super::store::ElementStore;
use crate::errors::Result;

/// Request-scoped cache of "is this segment taken" answers
///
/// Created by the caller and dropped at the end of the request. Writing a
/// segment must be reported through [`SegmentLookupCache::record_write`] so
/// later lookups in the same request never see a stale "free" answer.
#[derive(Debug, Default)]
pub struct SegmentLookupCache {
    entries: HashMap<(String, String, Option<String>), bool>,
    store_lookups: usize,
}

impl SegmentLookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every cached answer
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of lookups that reached the store
    pub fn store_lookups(&self) -> usize {
        self.store_lookups
    }

    /// Invalidate answers for a segment that was just written
    pub fn record_write(&mut self, type_tag: &str, segment: &str) {
        self.entries
            .retain(|(tag, seg, _), _| !(tag == type_tag && seg == segment));
    }

    fn is_taken<S: ElementStore + ?Sized>(
        &mut self,
        store: &S,
        type_tag: &str,
        segment: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool> {
        let key = (
            type_tag.to_string(),
            segment.to_string(),
            exclude_id.map(str::to_string),
        );
        if let Some(taken) = self.entries.get(&key) {
            return Ok(*taken);
        }

        self.store_lookups += 1;
        let taken = store.url_segment_taken(type_tag, segment, exclude_id)?;
        self.entries.insert(key, taken);
        Ok(taken)
    }
}

/// Filter text into a URL-safe slug
///
/// Non-ASCII letters are transliterated first, then the text is lowercased,
/// every other character becomes `-` and runs of separators collapse.
/// Leading and trailing separators are dropped.
///
/// # Example
///
/// ```
/// use elements_core::ops::url_segment::filter_segment;
///
/// assert_eq!(filter_segment("Hello World!"), "hello-world");
/// assert_eq!(filter_segment("  a -- b  "), "a-b");
/// assert_eq!(filter_segment("Über Café"), "uber-cafe");
/// ```
pub fn filter_segment(text: &str) -> String {
    slug::slugify(text)
}

/// Time-based token used when the filtered text is empty
fn fallback_token() -> String {
    format!("{:x}", Utc::now().timestamp_micros())
}

/// Strip a trailing `-<digits>` suffix, if any
fn strip_numeric_suffix(segment: &str) -> &str {
    match segment.rsplit_once('-') {
        Some((base, digits))
            if !base.is_empty()
                && !digits.is_empty()
                && digits.chars().all(|c| c.is_ascii_digit()) =>
        {
            base
        }
        _ => segment,
    }
}

/// Generate a segment unique among elements of `type_tag`
///
/// `exclude_id` is the element's own id, so regenerating for an unchanged
/// title does not collide with itself.
///
/// Uniqueness holds at the moment of generation only; two concurrent
/// writers may still produce the same segment.
///
/// # Errors
///
/// Returns `Persistence` if the existence lookup fails.
pub fn generate_url_segment<S: ElementStore + ?Sized>(
    store: &S,
    cache: &mut SegmentLookupCache,
    type_tag: &str,
    candidate: &str,
    exclude_id: Option<&str>,
) -> Result<String> {
    let mut segment = filter_segment(candidate);
    if segment.is_empty() {
        segment = fallback_token();
    }

    let mut suffix = 2u32;
    while cache.is_taken(store, type_tag, &segment, exclude_id)? {
        segment = format!("{}-{}", strip_numeric_suffix(&segment), suffix);
        suffix += 1;
    }

    tracing::debug!(type_tag, segment = %segment, "url segment generated");
    Ok(segment)
}
