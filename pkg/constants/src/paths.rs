//! Filesystem path constants.

/// Default config file read by `slimctl` when `--config` is not given.
pub const DEFAULT_SLIMCTL_CONFIG: &str = "slimctl.yaml";
