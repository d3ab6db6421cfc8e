//! Configuration loaded from `.purecheck.toml`
//!
//! ```toml
//! [markers]
//! enforce_pure = "EnforcePure"
//! allow_synchronization = "AllowSynchronization"
//!
//! [signatures]
//! pure = ["Vendor.Math.Lerp"]
//! impure = ["Vendor.Clock.Now"]
//! impure_namespaces = ["Vendor.Native"]
//!
//! [analysis]
//! max_call_depth = 256
//! parallel = true
//! ```

mod core;
mod loader;

pub use self::core::{AnalysisSettings, PurityConfig, SignatureConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
