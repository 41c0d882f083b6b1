//! Configuration loading and parsing.
//!
//! Parses `screen.toml` (or an override path) for the renderer's ambient
//! tunables: tab stop, indentation width, and the prompt-layout cache
//! capacity. Unknown fields are ignored (TOML deserialization tolerance) so
//! the file format can grow without breaking older configs.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::info;

/// Hard ceiling on the prompt-layout cache capacity a config file can request.
/// Mirrors `core_text::layout_cache::PROMPT_CACHE_CAPACITY`; kept as a local
/// constant rather than a dependency so `core-config` stays a leaf crate.
pub const MAX_PROMPT_CACHE_CAPACITY: u16 = 8;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    pub tab_stop: u16,
    pub indent_width: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tab_stop: Self::default_tab_stop(),
            indent_width: Self::default_indent_width(),
        }
    }
}

impl LayoutConfig {
    const fn default_tab_stop() -> u16 {
        8
    }
    const fn default_indent_width() -> u16 {
        2
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub prompt_cache_capacity: u16,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prompt_cache_capacity: MAX_PROMPT_CACHE_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    pub layout: LayoutConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub raw: Option<String>,
    pub file: ConfigFile,
    pub effective_prompt_cache_capacity: u16,
}

/// Best-effort config path: local working directory first, then the
/// platform config directory, matching the host's own config discovery.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("screen.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("screen").join("screen.toml");
    }
    PathBuf::from("screen.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<RenderConfig> {
    let path = path.unwrap_or_else(discover);
    let mut cfg = if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => RenderConfig {
                raw: Some(content),
                file,
                effective_prompt_cache_capacity: 0,
            },
            Err(e) => {
                tracing::warn!(
                    target: "core_config",
                    error = %e,
                    path = %path.display(),
                    "config parse failed, using defaults"
                );
                RenderConfig::default()
            }
        }
    } else {
        RenderConfig::default()
    };
    cfg.apply_clamp();
    Ok(cfg)
}

impl RenderConfig {
    /// Clamp `cache.prompt_cache_capacity` to `MAX_PROMPT_CACHE_CAPACITY`,
    /// logging when the configured value is reduced.
    pub fn apply_clamp(&mut self) -> u16 {
        let raw = self.file.cache.prompt_cache_capacity;
        let clamped = raw.min(MAX_PROMPT_CACHE_CAPACITY);
        if clamped != raw {
            info!(
                target: "core_config",
                raw,
                clamped,
                max = MAX_PROMPT_CACHE_CAPACITY,
                "prompt_cache_capacity_clamped"
            );
        }
        self.effective_prompt_cache_capacity = clamped;
        clamped
    }

    pub fn tab_stop(&self) -> u16 {
        self.file.layout.tab_stop.max(1)
    }

    pub fn indent_width(&self) -> u16 {
        self.file.layout.indent_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn defaults_when_file_missing() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_screen_toml__.toml"))).unwrap();
        assert_eq!(cfg.tab_stop(), 8);
        assert_eq!(cfg.indent_width(), 2);
        assert_eq!(cfg.effective_prompt_cache_capacity, MAX_PROMPT_CACHE_CAPACITY);
    }

    #[test]
    fn parses_layout_values() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[layout]\ntab_stop = 4\nindent_width = 3\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.tab_stop(), 4);
        assert_eq!(cfg.indent_width(), 3);
    }

    #[test]
    fn clamps_prompt_cache_capacity() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[cache]\nprompt_cache_capacity = 99\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.effective_prompt_cache_capacity, MAX_PROMPT_CACHE_CAPACITY);
    }

    #[test]
    fn zero_tab_stop_is_floored_to_one() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[layout]\ntab_stop = 0\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.tab_stop(), 1);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "not valid toml :::").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.tab_stop(), 8);
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let mut cfg = RenderConfig {
            raw: None,
            file: ConfigFile {
                layout: LayoutConfig::default(),
                cache: CacheConfig {
                    prompt_cache_capacity: 50,
                },
            },
            effective_prompt_cache_capacity: 0,
        };

        with_default(subscriber, || {
            cfg.apply_clamp();
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO core_config:"));
        assert!(log_output.contains("prompt_cache_capacity_clamped"));
        assert_eq!(cfg.effective_prompt_cache_capacity, MAX_PROMPT_CACHE_CAPACITY);
    }
}
