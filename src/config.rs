//! Centralized configuration and builder for cabinetdb.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - CabinetConfig::from_env() reads CABINET_* variables.
//! - CabinetBuilder returns a CabinetConfig, which Cabinet consumes.
//!
//! Defaults:
//! - name_policy = reject (over-length names are an error, not silently cut)
//! - data_fsync = false (flush only; fsync on truncate)
//! - rebuild_after_mutation = false (incremental index maintenance)

use std::fmt;

use crate::codec::NamePolicy;

/// Top-level configuration for a Cabinet.
#[derive(Clone, Debug)]
pub struct CabinetConfig {
    /// What to do with names longer than the slot width.
    /// Env: CABINET_NAME_POLICY = truncate|reject (default reject)
    pub name_policy: NamePolicy,

    /// fsync data after every slot write.
    /// Env: CABINET_DATA_FSYNC (default false; "1|true|on|yes" => true)
    pub data_fsync: bool,

    /// Rebuild all indexes with a full scan after each edit/remove instead of
    /// maintaining them incrementally.
    /// Env: CABINET_REBUILD_AFTER_MUTATION (default false)
    pub rebuild_after_mutation: bool,
}

impl Default for CabinetConfig {
    fn default() -> Self {
        Self {
            name_policy: NamePolicy::Reject,
            data_fsync: false,
            rebuild_after_mutation: false,
        }
    }
}

fn env_flag(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "on" || s == "yes"
}

impl CabinetConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CABINET_NAME_POLICY") {
            match NamePolicy::parse(&v) {
                Some(p) => cfg.name_policy = p,
                None => log::warn!("CABINET_NAME_POLICY='{}' not recognized, keeping default", v),
            }
        }

        if let Ok(v) = std::env::var("CABINET_DATA_FSYNC") {
            cfg.data_fsync = env_flag(&v);
        }

        if let Ok(v) = std::env::var("CABINET_REBUILD_AFTER_MUTATION") {
            cfg.rebuild_after_mutation = env_flag(&v);
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_name_policy(mut self, p: NamePolicy) -> Self {
        self.name_policy = p;
        self
    }

    pub fn with_data_fsync(mut self, on: bool) -> Self {
        self.data_fsync = on;
        self
    }

    pub fn with_rebuild_after_mutation(mut self, on: bool) -> Self {
        self.rebuild_after_mutation = on;
        self
    }
}

impl fmt::Display for CabinetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CabinetConfig {{ \
             name_policy: {}, \
             data_fsync: {}, \
             rebuild_after_mutation: {} \
             }}",
            self.name_policy.as_str(),
            self.data_fsync,
            self.rebuild_after_mutation,
        )
    }
}

/// Lightweight builder that produces a CabinetConfig.
#[derive(Clone, Debug)]
pub struct CabinetBuilder {
    cfg: CabinetConfig,
}

impl Default for CabinetBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: CabinetConfig::from_env(),
        }
    }
}

impl CabinetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: CabinetConfig::default(),
        }
    }

    pub fn name_policy(mut self, p: NamePolicy) -> Self {
        self.cfg.name_policy = p;
        self
    }

    pub fn data_fsync(mut self, on: bool) -> Self {
        self.cfg.data_fsync = on;
        self
    }

    pub fn rebuild_after_mutation(mut self, on: bool) -> Self {
        self.cfg.rebuild_after_mutation = on;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> CabinetConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_and_incremental() {
        let c = CabinetConfig::default();
        assert_eq!(c.name_policy, NamePolicy::Reject);
        assert!(!c.data_fsync);
        assert!(!c.rebuild_after_mutation);
    }

    #[test]
    fn builder_overrides() {
        let c = CabinetBuilder::from_default()
            .name_policy(NamePolicy::Truncate)
            .rebuild_after_mutation(true)
            .build();
        assert_eq!(c.name_policy, NamePolicy::Truncate);
        assert!(c.rebuild_after_mutation);
        assert!(c.to_string().contains("name_policy: truncate"));
    }

    #[test]
    fn env_flag_parsing() {
        assert!(env_flag(" Yes "));
        assert!(env_flag("1"));
        assert!(!env_flag("off"));
        assert_eq!(NamePolicy::parse("TRUNCATE"), Some(NamePolicy::Truncate));
        assert_eq!(NamePolicy::parse("bogus"), None);
    }
}
