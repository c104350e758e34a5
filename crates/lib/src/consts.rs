//! Crate-wide constants.

pub const APP_NAME: &str = "vmprov";

/// Default provisioning file name, looked up relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "provision.lua";

/// Host side of the download cache. Relative paths resolve against the config directory.
pub const DEFAULT_CACHE_HOST_DIR: &str = "provisioning_cache";

/// Guest side of the download cache, where the synced folder is mounted.
pub const DEFAULT_CACHE_GUEST_DIR: &str = "/.provisioning_cache";

/// Length of the truncated session hash.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Directory that disk images are mounted under while their package is installed.
pub const MOUNT_ROOT: &str = "/Volumes/_vm_provisioning_";

/// Target directory for archive installs.
pub const APPLICATIONS_DIR: &str = "/Applications";

pub const ENV_PLATFORM: &str = "VMPROV_PLATFORM";
pub const ENV_CACHE_HOST: &str = "VMPROV_CACHE_HOST";
pub const ENV_CACHE_GUEST: &str = "VMPROV_CACHE_GUEST";
