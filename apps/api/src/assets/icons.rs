//! Contact icons, read once at startup and served as `data:` URIs.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::{info, warn};

/// Icon names the editor knows how to place next to contact details.
pub const ICON_NAMES: [&str; 6] = ["email", "phone", "linkedin", "website", "github", "location"];

/// Icon name → `data:image/png;base64,...`. Immutable once built.
pub type IconMap = BTreeMap<String, String>;

/// Reads `<dir>/<name>.png` for every known icon name. Missing directories
/// and files are logged and left out; they never fail startup.
pub async fn load_icons(dir: &Path) -> IconMap {
    let mut icons = IconMap::new();

    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        warn!("Icon directory {} not found; serving no icons", dir.display());
        return icons;
    }

    for name in ICON_NAMES {
        let path = dir.join(format!("{name}.png"));
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                icons.insert(name.to_string(), png_data_uri(&bytes));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Icon {} not found", path.display());
            }
            Err(e) => warn!("Failed to read icon {}: {e}", path.display()),
        }
    }

    info!("Loaded {} of {} icons", icons.len(), ICON_NAMES.len());
    icons
}

pub fn png_data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_data_uri() {
        assert_eq!(png_data_uri(b"\x89PNG"), "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn test_missing_directory_gives_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let icons = load_icons(&dir.path().join("nope")).await;
        assert!(icons.is_empty());
    }

    #[tokio::test]
    async fn test_partial_directory_gives_partial_map() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("email.png"), b"mail").unwrap();
        std::fs::write(dir.path().join("github.png"), b"gh").unwrap();
        std::fs::write(dir.path().join("unrelated.png"), b"x").unwrap();

        let icons = load_icons(dir.path()).await;
        assert_eq!(icons.len(), 2);
        assert_eq!(icons["email"], png_data_uri(b"mail"));
        assert!(icons["github"].starts_with("data:image/png;base64,"));
        assert!(!icons.contains_key("unrelated"));
    }
}
