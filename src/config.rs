//! Runtime configuration

use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the text artifact written by the pipeline
pub const OUTPUT_FILE_NAME: &str = "text.txt";

/// Default deadline for the fetch stage, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Configuration for one extraction run
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the normalized text is written, overwritten unconditionally
    pub output_path: PathBuf,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with the page request
    pub user_agent: String,

    /// Trim leading and trailing whitespace from the final text
    pub trim: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: Self::default_output_path(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: USER_AGENT.to_string(),
            trim: false,
        }
    }
}

impl Config {
    /// `text.txt` two directory levels above the directory holding the
    /// running executable, or `./text.txt` when that cannot be resolved.
    ///
    /// For a binary under `target/release/` this is the project root.
    pub fn default_output_path() -> PathBuf {
        match std::env::current_exe() {
            Ok(exe) => Self::output_path_near(&exe),
            Err(e) => {
                warn!(error = %e, "cannot locate executable, writing {OUTPUT_FILE_NAME} to the working directory");
                PathBuf::from(OUTPUT_FILE_NAME)
            }
        }
    }

    fn output_path_near(exe: &Path) -> PathBuf {
        Self::output_path_for_exe(exe).unwrap_or_else(|| {
            warn!(exe = %exe.display(), "executable path too shallow, writing {OUTPUT_FILE_NAME} to the working directory");
            PathBuf::from(OUTPUT_FILE_NAME)
        })
    }

    fn output_path_for_exe(exe: &Path) -> Option<PathBuf> {
        let root = exe.parent()?.parent()?.parent()?;
        Some(root.join(OUTPUT_FILE_NAME))
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_is_two_levels_above_exe_dir() {
        let exe = Path::new("/opt/project/target/release/webpage_text");
        let path = Config::output_path_for_exe(exe).unwrap();
        assert_eq!(path, PathBuf::from("/opt/project/text.txt"));
    }

    #[test]
    fn shallow_exe_has_no_derived_path() {
        assert!(Config::output_path_for_exe(Path::new("/webpage_text")).is_none());
    }

    #[test]
    fn shallow_exe_falls_back_to_working_directory() {
        assert_eq!(
            Config::output_path_near(Path::new("/webpage_text")),
            PathBuf::from(OUTPUT_FILE_NAME)
        );
        assert_eq!(
            Config::output_path_near(Path::new("/opt/project/target/debug/webpage_text")),
            PathBuf::from("/opt/project/text.txt")
        );
    }

    #[test]
    fn default_output_path_names_text_file() {
        let path = Config::default_output_path();
        assert_eq!(path.file_name().unwrap(), OUTPUT_FILE_NAME);
    }

    #[test]
    fn builders_override_defaults() {
        let config = Config::default()
            .with_output_path("/tmp/out.txt")
            .with_timeout(5)
            .with_user_agent("tester")
            .with_trim(true);

        assert_eq!(config.output_path, PathBuf::from("/tmp/out.txt"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, "tester");
        assert!(config.trim);
    }
}
