//! Content type allow-list.

/// Decides which sniffed content types may be stored.
///
/// Entries are either an exact type (`application/pdf`) or a major-type
/// wildcard (`image/*`). An empty list permits everything. Comparison
/// ignores case and any MIME parameters such as `; charset=utf-8`.
#[derive(Debug, Clone, Default)]
pub struct ContentPolicy {
    allowed: Vec<String>,
}

impl ContentPolicy {
    /// Build a policy from configured entries. Blank entries are ignored.
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = allowed
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_ascii_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { allowed }
    }

    /// Whether any restriction is configured.
    pub fn is_restricted(&self) -> bool {
        !self.allowed.is_empty()
    }

    /// Whether `content_type` may be stored.
    pub fn permits(&self, content_type: &str) -> bool {
        if !self.is_restricted() {
            return true;
        }
        let essence = essence(content_type);
        self.allowed.iter().any(|entry| match entry.strip_suffix('*') {
            Some(prefix) if prefix.ends_with('/') => essence.starts_with(prefix),
            _ => *entry == essence,
        })
    }
}

/// `type/subtype` without parameters, lowercased.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
