use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};
use tracing::{debug, warn};

/// Family name every chart requests text in.
pub const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font file registered by the first call, `None` when nothing loaded.
static REGISTERED_FONT: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Whether chart text can be rendered.
///
/// The first call registers a TrueType font under [`FONT_FAMILY`], trying
/// `preferred` before the system locations. plotters keeps one font per
/// family for the whole process, so later calls reuse that registration and
/// a different `preferred` file is ignored with a warning.
pub fn text_available(preferred: Option<&Path>) -> bool {
    let registered = REGISTERED_FONT.get_or_init(|| register_first_font(preferred));
    if preferred_ignored(registered.as_deref(), preferred) {
        if let Some(path) = preferred {
            warn!(
                font = %path.display(),
                "chart font already chosen for this process; keeping the first one"
            );
        }
    }
    registered.is_some()
}

/// True when `preferred` names a file other than the one in use.
fn preferred_ignored(registered: Option<&Path>, preferred: Option<&Path>) -> bool {
    match preferred {
        Some(path) => registered != Some(path),
        None => false,
    }
}

fn register_first_font(preferred: Option<&Path>) -> Option<PathBuf> {
    let candidates = preferred
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        // The font registry keeps a 'static borrow for the life of the process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        match register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
            Ok(()) => {
                debug!(font = %path.display(), "registered chart font");
                return Some(path);
            }
            Err(_) => warn!(font = %path.display(), "not a usable TrueType font"),
        }
    }

    warn!("no TrueType font found; charts will be drawn without text");
    None
}
