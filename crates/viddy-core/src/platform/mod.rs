//! Platform integration: data locations, file permissions and desktop
//! launcher entries.

mod desktop_entry;
mod desktop_host;
mod paths;
mod permissions;

pub use desktop_entry::{quote_exec_arg, DesktopEntry};
pub use desktop_host::DesktopShortcutHost;
pub use paths::{apps_dir, data_dir, settings_db_path, tiles_dir};
pub use permissions::set_executable;
