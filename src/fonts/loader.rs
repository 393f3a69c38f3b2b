//! Font family discovery.
//!
//! A fonts directory holds one subdirectory per family. Each family needs a
//! regular face; a file with `Bold` in its name is used as the bold face.
//! With the `system-fonts` feature, families can also be resolved through
//! the operating system.

use super::FontError;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Font files of one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFamily {
    pub name: String,
    pub regular: PathBuf,
    pub bold: Option<PathBuf>,
}

pub struct FontLoader {
    fonts_dir: PathBuf,
}

impl FontLoader {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
        }
    }

    pub fn fonts_dir(&self) -> &Path {
        &self.fonts_dir
    }

    /// All usable families under the fonts directory, sorted by name.
    pub fn families(&self) -> Result<Vec<FontFamily>, FontError> {
        let mut families = Vec::new();
        for entry in std::fs::read_dir(&self.fonts_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match Self::scan_family(&name, &entry.path())? {
                Some(family) => families.push(family),
                None => debug!(family = %name, "skipping font family without a regular face"),
            }
        }
        families.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(families)
    }

    fn scan_family(name: &str, dir: &Path) -> Result<Option<FontFamily>, FontError> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_font_file(path))
            .collect();
        files.sort();

        let bold = files.iter().find(|p| file_name(p).contains("Bold")).cloned();
        let regular = files
            .iter()
            .find(|p| file_name(p).contains("Regular"))
            .or_else(|| files.iter().find(|p| !file_name(p).contains("Bold")))
            .cloned();

        Ok(regular.map(|regular| FontFamily {
            name: name.to_string(),
            regular,
            bold,
        }))
    }

    /// Pick one family at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<FontFamily, FontError> {
        let families = self.families()?;
        families
            .choose(rng)
            .cloned()
            .ok_or_else(|| FontError::NotFound(self.fonts_dir.display().to_string()))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"))
}

/// Resolve a family through the operating system's font database.
#[cfg(feature = "system-fonts")]
pub fn load_system_family(family_name: &str) -> Result<FontFamily, FontError> {
    use font_kit::family_name::FamilyName;
    use font_kit::handle::Handle;
    use font_kit::properties::{Properties, Weight};
    use font_kit::source::SystemSource;

    let source = SystemSource::new();
    let families = [FamilyName::Title(family_name.to_string()), FamilyName::SansSerif];
    let path_of = |properties: &Properties| -> Option<PathBuf> {
        match source.select_best_match(&families, properties).ok()? {
            Handle::Path { path, .. } => Some(path),
            Handle::Memory { .. } => None,
        }
    };

    let regular = path_of(&Properties::new())
        .ok_or_else(|| FontError::NotFound(family_name.to_string()))?;
    let mut bold_properties = Properties::new();
    bold_properties.weight(Weight::BOLD);
    let bold = path_of(&bold_properties).filter(|path| *path != regular);

    Ok(FontFamily {
        name: family_name.to_string(),
        regular,
        bold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn touch(path: &Path) {
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_families_pick_regular_and_bold() {
        let dir = tempfile::tempdir().unwrap();
        let roboto = dir.path().join("Roboto");
        std::fs::create_dir(&roboto).unwrap();
        touch(&roboto.join("Roboto-Bold.ttf"));
        touch(&roboto.join("Roboto-Italic.ttf"));
        touch(&roboto.join("Roboto-Regular.ttf"));
        touch(&roboto.join("LICENSE.txt"));

        let families = FontLoader::new(dir.path()).families().unwrap();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].name, "Roboto");
        assert_eq!(families[0].regular, roboto.join("Roboto-Regular.ttf"));
        assert_eq!(families[0].bold, Some(roboto.join("Roboto-Bold.ttf")));
    }

    #[test]
    fn test_family_without_regular_face_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let only_bold = dir.path().join("OnlyBold");
        std::fs::create_dir(&only_bold).unwrap();
        touch(&only_bold.join("OnlyBold-Bold.otf"));
        let plain = dir.path().join("Plain");
        std::fs::create_dir(&plain).unwrap();
        touch(&plain.join("plain.OTF"));

        let families = FontLoader::new(dir.path()).families().unwrap();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].name, "Plain");
        assert_eq!(families[0].bold, None);
    }

    #[test]
    fn test_choose_from_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let result = FontLoader::new(dir.path()).choose(&mut rng);
        assert!(matches!(result, Err(FontError::NotFound(_))));
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let result = FontLoader::new("/nonexistent/slidewright/fonts").families();
        assert!(matches!(result, Err(FontError::Io(_))));
    }
}
