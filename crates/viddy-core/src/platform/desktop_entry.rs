//! Desktop entry (.desktop file) reading and writing.
//!
//! Implements the subset of the XDG Desktop Entry Specification needed for
//! launcher shortcuts, including `X-` extension keys.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Result, ViddyError};
use crate::platform::permissions::set_executable;
use tracing::debug;

const GROUP_HEADER: &str = "[Desktop Entry]";

/// The `[Desktop Entry]` group of an application launcher.
///
/// `Type` is always `Application` and `Terminal` always `false`; neither is
/// kept on the struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: String,
    pub comment: Option<String>,
    /// Command line with every argument already quoted.
    pub exec: String,
    /// Absolute path or theme icon name.
    pub icon: String,
    pub categories: Vec<String>,
    /// `X-` extension keys, written in key order.
    pub extensions: BTreeMap<String, String>,
}

impl DesktopEntry {
    /// An application entry in the video categories.
    pub fn application(name: impl Into<String>, exec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exec: exec.into(),
            categories: vec!["AudioVideo".to_string(), "Video".to_string()],
            ..Self::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    /// Value of an `X-` extension key.
    pub fn extension(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).map(String::as_str)
    }

    /// Parse the `[Desktop Entry]` group of a .desktop file.
    pub fn parse(content: &str) -> Result<Self> {
        let mut in_group = false;
        let mut seen_group = false;
        let mut entry = DesktopEntry::default();

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                in_group = line == GROUP_HEADER;
                seen_group |= in_group;
                continue;
            }
            if !in_group {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = unescape_value(value.trim());
            match key.trim() {
                "Name" => entry.name = value,
                "Comment" => entry.comment = Some(value),
                "Exec" => entry.exec = value,
                "Icon" => entry.icon = value,
                "Categories" => {
                    entry.categories = value
                        .split(';')
                        .filter(|c| !c.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                other if other.starts_with("X-") => {
                    entry.extensions.insert(other.to_string(), value);
                }
                _ => {}
            }
        }

        if !seen_group {
            return Err(ViddyError::Validation {
                field: "desktop entry".to_string(),
                message: format!("missing {} group", GROUP_HEADER),
            });
        }
        Ok(entry)
    }

    /// Read and parse a .desktop file.
    pub fn read_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ViddyError::io_with_path(e, path))?;
        Self::parse(&content)
    }

    /// Write the entry, creating the directory as needed, and mark it
    /// executable so desktop environments treat it as trusted.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| ViddyError::io_with_path(e, dir))?;
        }
        fs::write(path, self.to_string()).map_err(|e| ViddyError::io_with_path(e, path))?;
        set_executable(path)?;

        debug!("Wrote launcher entry {}", path.display());
        Ok(())
    }
}

impl fmt::Display for DesktopEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", GROUP_HEADER)?;
        writeln!(f, "Name={}", escape_value(&self.name))?;

        if let Some(comment) = self.comment.as_deref() {
            writeln!(f, "Comment={}", escape_value(comment))?;
        }

        writeln!(f, "Exec={}", escape_value(&self.exec))?;
        if !self.icon.is_empty() {
            writeln!(f, "Icon={}", escape_value(&self.icon))?;
        }
        writeln!(f, "Terminal=false")?;
        writeln!(f, "Type=Application")?;
        if !self.categories.is_empty() {
            writeln!(f, "Categories={};", self.categories.join(";"))?;
        }

        for (key, value) in &self.extensions {
            writeln!(f, "{}={}", key, escape_value(value))?;
        }

        Ok(())
    }
}

/// Quote one argument for an `Exec` line.
///
/// Field codes are disabled by doubling `%`.
pub fn quote_exec_arg(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        match c {
            '"' | '`' | '$' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '%' => quoted.push_str("%%"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some('r') => unescaped.push('\r'),
            Some('s') => unescaped.push(' '),
            Some(other) => unescaped.push(other),
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_fixed_keys() {
        let rendered = DesktopEntry::application("Cats", "viddy-launcher activate \"x\"")
            .with_icon("/tmp/Video_1.png")
            .with_extension("X-Viddy-TileId", "Video_1")
            .to_string();

        assert!(rendered.starts_with("[Desktop Entry]\nName=Cats\n"));
        assert!(rendered.contains("Icon=/tmp/Video_1.png\n"));
        assert!(rendered.contains("Terminal=false\nType=Application\n"));
        assert!(rendered.contains("Categories=AudioVideo;Video;\n"));
        assert!(rendered.ends_with("X-Viddy-TileId=Video_1\n"));
    }

    #[test]
    fn test_parse_back_with_escapes() {
        let entry = DesktopEntry::application("Line\nbreak \\ slash", "run")
            .with_comment("Tab\there")
            .with_icon("icon")
            .with_extension("X-Viddy-Arguments", "viddy://?tileType=Video&id=a%20b");

        assert_eq!(DesktopEntry::parse(&entry.to_string()).unwrap(), entry);
    }

    #[test]
    fn test_parse_ignores_other_groups() {
        let content = "# comment\n[Desktop Entry]\nName=A\nExec=a\n\n[Desktop Action x]\nName=B\n";
        let parsed = DesktopEntry::parse(content).unwrap();
        assert_eq!(parsed.name, "A");
        assert_eq!(parsed.exec, "a");
    }

    #[test]
    fn test_parse_requires_group() {
        assert!(DesktopEntry::parse("Name=A\n").is_err());
    }

    #[test]
    fn test_quote_exec_arg() {
        assert_eq!(quote_exec_arg("a b"), "\"a b\"");
        assert_eq!(quote_exec_arg("id=a%20$x"), "\"id=a%%20\\$x\"");
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("apps").join("viddy-test.desktop");

        let entry = DesktopEntry::application("Test", "/bin/test");
        entry.write_to_file(&path).unwrap();
        assert_eq!(DesktopEntry::read_from_file(&path).unwrap(), entry);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }
}
