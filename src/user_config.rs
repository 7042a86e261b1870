// texnav configuration
// Edit this file to change the compiled-in defaults

use crate::config::Config;

/// User configuration function
pub fn configure(config: &mut Config) {
    // Shared by every tab; :fs changes it at runtime (8-72)
    config.set("font_size", 12);

    // :case toggles it at runtime
    config.set("case_sensitive", true);

    // Command-bar suggestions shown at once
    config.set("suggestion_limit", 10);

    // Program started by :cmd. Unset means $SHELL, then the platform default.
    // config.set("shell", "/bin/bash");
}
