/// Tunables passed explicitly into the engine's entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// How many levels of JSON-encoded strings the normalizer will decode
    pub max_depth: usize,
    /// Character budget for truncated table previews
    pub truncate_len: usize,
    /// Host ranking size for the interactive view
    pub top_hosts: usize,
    /// Host ranking size for the static report
    pub report_hosts: usize,
    /// Candidate strings longer than this (in bytes) are never decoded
    pub max_decode_len: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_TRUNCATE_LEN: usize = 100;
pub const DEFAULT_TOP_HOSTS: usize = 10;
pub const DEFAULT_REPORT_HOSTS: usize = 20;
pub const DEFAULT_MAX_DECODE_LEN: usize = 8 * 1024 * 1024;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            truncate_len: DEFAULT_TRUNCATE_LEN,
            top_hosts: DEFAULT_TOP_HOSTS,
            report_hosts: DEFAULT_REPORT_HOSTS,
            max_decode_len: DEFAULT_MAX_DECODE_LEN,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_truncate_len(mut self, truncate_len: usize) -> Self {
        self.truncate_len = truncate_len;
        self
    }

    pub fn with_top_hosts(mut self, top_hosts: usize) -> Self {
        self.top_hosts = top_hosts;
        self
    }

    pub fn with_max_decode_len(mut self, max_decode_len: usize) -> Self {
        self.max_decode_len = max_decode_len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.truncate_len, 100);
        assert_eq!(config.top_hosts, 10);
        assert_eq!(config.report_hosts, 20);
    }

    #[test]
    fn test_builder_overrides() {
        let config = EngineConfig::new().with_max_depth(5).with_truncate_len(40);
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.truncate_len, 40);
        assert_eq!(config.top_hosts, 10);
    }
}
