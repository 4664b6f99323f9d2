//! Extension commands: executables named `devsh-<command>` found on `PATH`

/// Namespace tag prepended to extension command names
pub const EXTENSION_PREFIX: &str = "devsh";

/// Usage hint printed under the extension listing
pub const USAGE_HINT: &str = "Run an extension with: devsh exec <command>";

/// Resolve a user-supplied extension name to the program to launch.
#[must_use]
pub fn program_name(command: &str) -> String {
    format!("{EXTENSION_PREFIX}-{command}")
}

/// Pre-rendered listing of the installed extensions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionListing {
    text: String,
    rendered: String,
}

impl ExtensionListing {
    #[must_use]
    pub fn new(contents: &str) -> Self {
        let text = contents.trim().to_string();
        let rendered = if text.is_empty() {
            String::new()
        } else {
            format!("Extension commands:\n\n{text}\n\n{USAGE_HINT}\n")
        };
        Self { text, rendered }
    }

    /// The listing as read from disk, surrounding whitespace removed
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Help text shown by `devsh exec`; empty when there are no extensions
    #[must_use]
    pub fn render(&self) -> &str {
        &self.rendered
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
