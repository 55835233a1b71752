use std::net::SocketAddr;
use std::path::PathBuf;

/// Policy for who may release a claimed job back to the queue.
///
/// The shop floor convention is that anyone can unclaim a job (covering
/// for a machinist who went home), but stricter shops can limit it to the
/// claimant themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnclaimPolicy {
    /// Any machinist or admin may unclaim any in-progress job.
    #[default]
    Anyone,
    /// Only the user who claimed the job (or an admin) may unclaim it.
    ClaimantOnly,
}

/// Configuration for attachment storage.
///
/// Uploaded files (G-code, drawings, completion photos) are written under
/// `root` and served back at `<public_base>/files/...`.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory that holds uploaded files.
    pub root: PathBuf,
    /// Base URL prefixed to returned file references.
    pub public_base: String,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/files"),
            public_base: "http://127.0.0.1:8080".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub storage: StorageConfig,
    pub unclaim_policy: UnclaimPolicy,
    /// Bearer session lifetime in hours.
    pub session_ttl_hours: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            // SAFETY: This is a hardcoded valid address that will always parse
            listen_addr: "127.0.0.1:8080"
                .parse()
                .expect("default listen address is valid"),
            storage: StorageConfig::default(),
            unclaim_policy: UnclaimPolicy::default(),
            session_ttl_hours: 24 * 7,
        }
    }
}

impl AppConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }

    pub fn with_storage_root(mut self, root: PathBuf) -> Self {
        self.storage.root = root;
        self
    }

    pub fn with_public_base(mut self, base: impl Into<String>) -> Self {
        self.storage.public_base = base.into();
        self
    }

    pub fn with_unclaim_policy(mut self, policy: UnclaimPolicy) -> Self {
        self.unclaim_policy = policy;
        self
    }

    pub fn with_session_ttl_hours(mut self, hours: i64) -> Self {
        self.session_ttl_hours = hours;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_config_default() {
        let cfg = StorageConfig::default();
        assert_eq!(cfg.root, PathBuf::from("data/files"));
        assert_eq!(cfg.public_base, "http://127.0.0.1:8080");
        assert_eq!(cfg.max_upload_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn app_config_default() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.listen_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.unclaim_policy, UnclaimPolicy::Anyone);
        assert_eq!(cfg.session_ttl_hours, 168);
    }

    #[test]
    fn app_config_new() {
        let addr: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        let cfg = AppConfig::new(addr);
        assert_eq!(cfg.listen_addr, addr);
        assert_eq!(cfg.unclaim_policy, UnclaimPolicy::Anyone);
    }

    #[test]
    fn app_config_builders() {
        let cfg = AppConfig::default()
            .with_storage_root(PathBuf::from("/tmp/shopqueue"))
            .with_public_base("https://queue.shop.example")
            .with_unclaim_policy(UnclaimPolicy::ClaimantOnly)
            .with_session_ttl_hours(8);
        assert_eq!(cfg.storage.root, PathBuf::from("/tmp/shopqueue"));
        assert_eq!(cfg.storage.public_base, "https://queue.shop.example");
        assert_eq!(cfg.unclaim_policy, UnclaimPolicy::ClaimantOnly);
        assert_eq!(cfg.session_ttl_hours, 8);
    }
}
