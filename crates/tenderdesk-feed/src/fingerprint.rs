//! Query fingerprints.
//!
//! A [`Fingerprint`] is the stable string key every cache and in-flight
//! entry is addressed by. Two descriptors with equal field values always
//! produce the same key; any field difference, including either
//! date-range bound and the acting user, produces a different key.
//! Values are form-encoded so free text cannot collide with the field
//! separators.

use std::fmt;

use tenderdesk_backend::{DistinctColumn, TenderQuery};
use tenderdesk_core::UserId;

/// Stable cache key for one query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprints a tender listing descriptor.
    #[must_use]
    pub fn of(query: &TenderQuery) -> Self {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        ser.append_pair("user", &query.user.to_string());
        ser.append_pair("page", &query.page.to_string());
        if let Some(ministry) = &query.ministry {
            ser.append_pair("ministry", ministry);
        }
        if let Some(department) = &query.department {
            ser.append_pair("department", department);
        }
        if let Some(city) = &query.city {
            ser.append_pair("city", city);
        }
        if let Some(search) = &query.search {
            ser.append_pair("search", search);
        }
        if let Some(from) = query.dates.from {
            ser.append_pair("from", &from.unix_timestamp_nanos().to_string());
        }
        if let Some(to) = query.dates.to {
            ser.append_pair("to", &to.unix_timestamp_nanos().to_string());
        }
        ser.append_pair("kw", if query.use_keywords { "1" } else { "0" });
        Self(format!("tenders?{}", ser.finish()))
    }

    /// Fingerprints a filter-option listing.
    #[must_use]
    pub fn options(column: DistinctColumn) -> Self {
        Self(format!("options?column={}", column.as_str()))
    }

    /// Fingerprints the per-identity saved-keywords flag.
    #[must_use]
    pub fn keywords(user: UserId) -> Self {
        Self(format!("keywords?user={user}"))
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
