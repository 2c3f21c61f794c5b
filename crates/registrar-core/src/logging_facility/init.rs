//! Subscriber installation

use std::sync::OnceLock;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output style of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines
    Development,
    /// One JSON object per line
    Production,
    /// No output; tests install [`init_test_capture`](super::init_test_capture) instead
    Test,
}

impl Profile {
    /// Level used for `registrar*` targets when `RUST_LOG` is unset
    pub fn default_level(&self) -> &'static str {
        match self {
            Profile::Development => "debug",
            Profile::Production => "info",
            Profile::Test => "trace",
        }
    }
}

static INSTALLED: OnceLock<Profile> = OnceLock::new();

/// Install the subscriber for `profile` at its default level
///
/// ```
/// use registrar_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) -> Profile {
    init_with_level(profile, profile.default_level())
}

/// Install the subscriber for `profile`, filtering `registrar*` targets at `level`
///
/// Output goes to stderr. `RUST_LOG` replaces the filter when set. Only the
/// first call in a process installs anything; the profile actually installed
/// is returned.
pub fn init_with_level(profile: Profile, level: &str) -> Profile {
    *INSTALLED.get_or_init(|| {
        install(profile, filter(level));
        profile
    })
}

/// Profile installed by the first `init` call, if any
pub fn installed_profile() -> Option<Profile> {
    INSTALLED.get().copied()
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("registrar={}", level)))
}

fn install(profile: Profile, filter: EnvFilter) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    // A subscriber installed elsewhere (test capture) is left in place
    let _ = match profile {
        Profile::Development => builder.finish().try_init(),
        Profile::Production => builder.json().finish().try_init(),
        Profile::Test => tracing_subscriber::registry().try_init(),
    };
}
