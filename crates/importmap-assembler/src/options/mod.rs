//! Run configuration

use camino::Utf8PathBuf;

use importmap_cache::Layout;

/// Module-loader shim used when none is configured
pub const DEFAULT_SHIM_PATH: &str = "https://ga.jspm.io/npm:es-module-shims@1.7.0";

/// Settings for one `ImportMap` run, fixed before the run starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Base for `cache_dir` and `assets_dir`
    pub root_dir: Utf8PathBuf,
    /// Version-keyed mirror; `None` disables caching
    pub cache_dir: Option<Utf8PathBuf>,
    /// Published files; `None` keeps remote URLs in the output
    pub assets_dir: Option<Utf8PathBuf>,
    /// Base URL of es-module-shims
    pub shim_path: String,
    pub include_shim: bool,
    /// Remove the cache and assets roots before fetching
    pub clean: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            cache_dir: None,
            assets_dir: None,
            shim_path: DEFAULT_SHIM_PATH.to_string(),
            include_shim: true,
            clean: false,
        }
    }
}

impl Options {
    /// Directory layout the materializer works in
    pub fn layout(&self) -> Layout {
        Layout::new(
            self.root_dir.clone(),
            self.cache_dir.clone(),
            self.assets_dir.clone(),
        )
    }

    /// Shim URL to load, if the rendered snippet should load one
    pub fn shim(&self) -> Option<&str> {
        (self.include_shim && !self.shim_path.is_empty()).then_some(self.shim_path.as_str())
    }
}

/// Directory of the running executable, or `.` if it cannot be determined
pub fn default_root_dir() -> Utf8PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_mirroring() {
        let options = Options::default();
        assert!(!options.layout().caches());
        assert!(!options.layout().publishes());
        assert_eq!(options.shim(), Some(DEFAULT_SHIM_PATH));
    }

    #[test]
    fn test_shim_can_be_turned_off() {
        let options = Options {
            include_shim: false,
            ..Options::default()
        };
        assert_eq!(options.shim(), None);

        let options = Options {
            shim_path: String::new(),
            ..Options::default()
        };
        assert_eq!(options.shim(), None);
    }
}
