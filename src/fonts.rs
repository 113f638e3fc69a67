//! Font loading for the PDF renderer.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use genpdf::fonts::{self, FontData, FontFamily};
use log::warn;

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable that overrides the font search path.
pub const FONTS_DIR_ENV: &str = "INSURANCE_REPORTER_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

const DEJAVU_DIR: &str = "/usr/share/fonts/truetype/dejavu";

struct DejaVuFiles {
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const DEJAVU_FILES: DejaVuFiles = DejaVuFiles {
    regular: "DejaVuSans.ttf",
    bold: "DejaVuSans-Bold.ttf",
    italic: "DejaVuSans-Oblique.ttf",
    bold_italic: "DejaVuSans-BoldOblique.ttf",
};

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = env::var(FONTS_DIR_ENV) {
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn directory_has_all_fonts(path: &Path) -> bool {
    path.is_dir() && FONT_FILES.iter().all(|name| path.join(name).is_file())
}

fn resolve_font_directory() -> Option<PathBuf> {
    font_directory_candidates()
        .into_iter()
        .find(|candidate| directory_has_all_fonts(candidate))
}

fn load_bundled_font_family(directory: &Path) -> Result<FontFamily<FontData>> {
    fonts::from_files(directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        anyhow!(
            "failed to load font family '{}' from {}: {}",
            DEFAULT_FONT_FAMILY_NAME,
            directory.display(),
            err
        )
    })
}

fn load_dejavu_font(directory: &Path, file: &str, style: &str) -> Result<FontData> {
    let path = directory.join(file);
    FontData::load(&path, None)
        .map_err(|err| anyhow!("failed to load {} font at {}: {}", style, path.display(), err))
}

fn dejavu_fallback_family() -> Result<FontFamily<FontData>> {
    let directory = Path::new(DEJAVU_DIR);
    if !directory.is_dir() {
        return Err(anyhow!("system font directory {} not found", DEJAVU_DIR));
    }

    Ok(FontFamily {
        regular: load_dejavu_font(directory, DEJAVU_FILES.regular, "regular")?,
        bold: load_dejavu_font(directory, DEJAVU_FILES.bold, "bold")?,
        italic: load_dejavu_font(directory, DEJAVU_FILES.italic, "italic")?,
        bold_italic: load_dejavu_font(directory, DEJAVU_FILES.bold_italic, "bold italic")?,
    })
}

/// Returns the bundled Roboto family if present, falling back to the system
/// DejaVu family.
///
/// The bundled directory is searched via [`FONTS_DIR_ENV`], then next to the
/// executable, then under the crate's `assets/fonts`.
pub fn default_font_family() -> Result<FontFamily<FontData>> {
    if let Some(directory) = resolve_font_directory() {
        return load_bundled_font_family(&directory);
    }

    match dejavu_fallback_family() {
        Ok(family) => {
            warn!("bundled fonts unavailable; using system DejaVu family");
            Ok(family)
        }
        Err(err) => Err(err).context(format!(
            "no usable font family: bundled fonts missing (searched {:?}) and system fallback failed",
            font_directory_candidates()
        )),
    }
}

/// Indicates whether any usable font family can be resolved.
///
/// Rendering tests consult this to skip cleanly on machines without fonts.
pub fn fonts_available() -> bool {
    resolve_font_directory().is_some() || dejavu_fallback_family().is_ok()
}
