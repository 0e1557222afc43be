use std::collections::HashSet;

/// Static allowlist of channel ids the gateway is permitted to read.
///
/// An empty whitelist permits every channel. Entries are matched exactly
/// (channel ids are opaque, case-sensitive strings).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelWhitelist {
    ids: HashSet<String>,
}

impl ChannelWhitelist {
    /// Build a whitelist from individual entries, trimming whitespace and
    /// dropping blanks.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = entries
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { ids }
    }

    /// Parse a comma-separated list such as `"123, 456,"`.
    pub fn parse(raw: &str) -> Self {
        Self::from_entries(raw.split(','))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check whether `channel_id` passes the whitelist.
    #[must_use]
    pub fn permits(&self, channel_id: &str) -> bool {
        self.ids.is_empty() || self.ids.contains(channel_id)
    }
}
