use log::{debug, trace};
use std::{
    fs::{self, File, FileTimes, Metadata},
    io,
    path::Path,
};

use crate::{
    error::{PublishError, PublishResult},
    remap::{Remapped, SpecifierMapping},
    rewrite::{rewrite_markup, rewrite_module},
    types::{FileKind, FileOutcome, SourceContent, SourceUnit},
};

/// Bytes a build writes for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub outcome: FileOutcome,
}

impl Rendered {
    fn from_remapped(remapped: Remapped) -> Self {
        let outcome = if remapped.changed() {
            FileOutcome::Rewritten { substitutions: remapped.substitutions }
        } else {
            FileOutcome::Unchanged
        };
        Self { bytes: remapped.text.into_bytes(), outcome }
    }
}

impl SourceUnit {
    /// Reads `path` as UTF-8 text for rewritten kinds and raw bytes otherwise.
    pub fn read(path: &Path) -> PublishResult<Self> {
        let kind = FileKind::of(path);
        let content = if kind.is_text() {
            SourceContent::Text(
                fs::read_to_string(path)
                    .map_err(|e| PublishError::from_read(path.to_path_buf(), e))?,
            )
        } else {
            SourceContent::Bytes(
                fs::read(path).map_err(|e| PublishError::from_read(path.to_path_buf(), e))?,
            )
        };
        Ok(Self { path: path.to_path_buf(), kind, content })
    }
}

pub fn render_unit(unit: SourceUnit, mapping: &SpecifierMapping) -> Rendered {
    match unit.content {
        SourceContent::Bytes(bytes) => Rendered { bytes, outcome: FileOutcome::Copied },
        SourceContent::Text(text) => {
            let remapped = match unit.kind {
                FileKind::Markup => rewrite_markup(&text, mapping),
                _ => rewrite_module(&text, mapping),
            };
            Rendered::from_remapped(remapped)
        }
    }
}

/// Computes what [`process_file`] would write, without touching the destination.
pub fn render_file(source: &Path, mapping: &SpecifierMapping) -> PublishResult<Rendered> {
    Ok(render_unit(SourceUnit::read(source)?, mapping))
}

/// Publishes one source file to `destination`.
///
/// `.html` and `.js` files go through the specifier rewriter; everything else
/// is copied byte-for-byte with its timestamps.
pub fn process_file(
    source: &Path,
    destination: &Path,
    mapping: &SpecifierMapping,
) -> PublishResult<FileOutcome> {
    if !FileKind::of(source).is_text() {
        let metadata =
            fs::metadata(source).map_err(|e| PublishError::from_read(source.to_path_buf(), e))?;
        ensure_parent_dir(destination)?;
        copy_preserving(source, destination, &metadata)?;
        trace!("Copied {} -> {}", source.display(), destination.display());
        return Ok(FileOutcome::Copied);
    }

    let rendered = render_file(source, mapping)?;
    ensure_parent_dir(destination)?;
    fs::write(destination, &rendered.bytes).map_err(|source| PublishError::DestinationWrite {
        path: destination.to_path_buf(),
        source,
    })?;
    trace!("Wrote {} ({:?})", destination.display(), rendered.outcome);
    Ok(rendered.outcome)
}

fn ensure_parent_dir(destination: &Path) -> PublishResult<()> {
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| PublishError::DestinationWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn copy_preserving(source: &Path, destination: &Path, metadata: &Metadata) -> PublishResult<()> {
    let dest_err = |source: io::Error| PublishError::DestinationWrite {
        path: destination.to_path_buf(),
        source,
    };

    fs::copy(source, destination).map_err(dest_err)?;

    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    // The copy carries the source permissions, so the handle must not ask for write access.
    let file = open_for_times(destination).map_err(dest_err)?;
    match file.set_times(times) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::Unsupported => {
            debug!("Timestamps not preserved for {}: {}", destination.display(), e);
            Ok(())
        }
        Err(e) => Err(dest_err(e)),
    }
}

#[cfg(not(windows))]
fn open_for_times(path: &Path) -> io::Result<File> {
    File::open(path)
}

#[cfg(windows)]
fn open_for_times(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;
    const FILE_WRITE_ATTRIBUTES: u32 = 0x100;
    fs::OpenOptions::new().access_mode(FILE_WRITE_ATTRIBUTES).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpecifierRule;
    use std::{
        fs::OpenOptions,
        path::PathBuf,
        time::{Duration, SystemTime},
    };
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &[u8]) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn gridchen_mapping() -> SpecifierMapping {
        SpecifierMapping::new([SpecifierRule::new("/gridchen/", "https://cdn.example/gridchen/")])
            .unwrap()
    }

    #[test]
    fn test_script_is_rewritten_into_new_directory() {
        let temp_dir = TempDir::new().unwrap();
        let src = create_test_file(
            temp_dir.path(),
            "src/formchen/formchen.js",
            b"// header\nimport { Grid } from '/gridchen/grid.js';\nconst x = 1;",
        );
        let dest = temp_dir.path().join("out/formchen/formchen.js");

        let outcome = process_file(&src, &dest, &gridchen_mapping()).unwrap();

        assert_eq!(outcome, FileOutcome::Rewritten { substitutions: 1 });
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "// header\nimport { Grid } from 'https://cdn.example/gridchen/grid.js';\nconst x = 1;"
        );
    }

    #[test]
    fn test_script_without_match_is_written_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let content = b"import * as utils from './utils.js'\nconst a = '/gridchen/x.js';\n";
        let src = create_test_file(temp_dir.path(), "converter.js", content);
        let dest = temp_dir.path().join("out/converter.js");

        let outcome = process_file(&src, &dest, &gridchen_mapping()).unwrap();

        assert_eq!(outcome, FileOutcome::Unchanged);
        assert_eq!(fs::read(&dest).unwrap(), content);
    }

    #[test]
    fn test_markup_inline_script_is_rewritten() {
        let temp_dir = TempDir::new().unwrap();
        let src = create_test_file(
            temp_dir.path(),
            "demo.html",
            b"<script type=\"module\">\nimport \"/gridchen/webcomponent.js\";\nconst g = 1;\n</script>\n",
        );
        let dest = temp_dir.path().join("out/demo.html");

        let outcome = process_file(&src, &dest, &gridchen_mapping()).unwrap();

        assert_eq!(outcome, FileOutcome::Rewritten { substitutions: 1 });
        assert!(
            fs::read_to_string(&dest)
                .unwrap()
                .contains("import \"https://cdn.example/gridchen/webcomponent.js\";")
        );
    }

    #[test]
    fn test_json_and_binary_are_copied_byte_for_byte() {
        let temp_dir = TempDir::new().unwrap();
        let json = b"{\"import\": \"import x from '/gridchen/x.js'; const y = 1;\"}";
        let icon: Vec<u8> = (0u8..=255).chain([0xff, 0xfe, 0x00]).collect();
        let json_src = create_test_file(temp_dir.path(), "data.json", json);
        let icon_src = create_test_file(temp_dir.path(), "favicon.ico", &icon);

        let json_dest = temp_dir.path().join("out/data.json");
        let icon_dest = temp_dir.path().join("out/favicon.ico");
        let mapping = gridchen_mapping();
        assert_eq!(process_file(&json_src, &json_dest, &mapping).unwrap(), FileOutcome::Copied);
        assert_eq!(process_file(&icon_src, &icon_dest, &mapping).unwrap(), FileOutcome::Copied);

        assert_eq!(fs::read(&json_dest).unwrap(), json);
        assert_eq!(fs::read(&icon_dest).unwrap(), icon);
    }

    #[test]
    fn test_copy_preserves_modification_time() {
        let temp_dir = TempDir::new().unwrap();
        let src = create_test_file(temp_dir.path(), "style.css", b"body {}");
        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        let file = OpenOptions::new().write(true).open(&src).unwrap();
        file.set_times(FileTimes::new().set_modified(past)).unwrap();
        drop(file);

        let dest = temp_dir.path().join("out/style.css");
        process_file(&src, &dest, &gridchen_mapping()).unwrap();

        let modified = fs::metadata(&dest).unwrap().modified().unwrap();
        assert_eq!(modified, past);
    }

    #[test]
    fn test_existing_destination_directory_is_fine() {
        let temp_dir = TempDir::new().unwrap();
        let src = create_test_file(temp_dir.path(), "a.js", b"const a = 1;");
        fs::create_dir_all(temp_dir.path().join("out")).unwrap();
        let dest = temp_dir.path().join("out/a.js");

        process_file(&src, &dest, &gridchen_mapping()).unwrap();
        process_file(&src, &dest, &gridchen_mapping()).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "const a = 1;");
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone.js");
        let err = process_file(&missing, &temp_dir.path().join("out/gone.js"), &gridchen_mapping())
            .unwrap_err();
        assert!(matches!(err, PublishError::SourceNotFound { ref path } if path == &missing));

        let missing_icon = temp_dir.path().join("gone.ico");
        let err =
            process_file(&missing_icon, &temp_dir.path().join("out/gone.ico"), &gridchen_mapping())
                .unwrap_err();
        assert!(matches!(err, PublishError::SourceNotFound { .. }));
    }

    #[test]
    fn test_missing_source_creates_no_destination_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mapping = gridchen_mapping();
        let js_dest = temp_dir.path().join("out/js/gone.js");
        let png_dest = temp_dir.path().join("out/img/gone.png");

        assert!(process_file(&temp_dir.path().join("gone.js"), &js_dest, &mapping).is_err());
        assert!(process_file(&temp_dir.path().join("gone.png"), &png_dest, &mapping).is_err());

        assert!(!temp_dir.path().join("out").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_asset_is_copied_with_times() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let src = create_test_file(temp_dir.path(), "logo.png", &[0x89, 0x50, 0x4e, 0x47]);
        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        let file = OpenOptions::new().write(true).open(&src).unwrap();
        file.set_times(FileTimes::new().set_modified(past)).unwrap();
        drop(file);
        fs::set_permissions(&src, fs::Permissions::from_mode(0o444)).unwrap();

        let dest = temp_dir.path().join("out/logo.png");
        let outcome = process_file(&src, &dest, &SpecifierMapping::default()).unwrap();

        assert_eq!(outcome, FileOutcome::Copied);
        assert_eq!(fs::read(&dest).unwrap(), [0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(fs::metadata(&dest).unwrap().modified().unwrap(), past);
    }

    #[test]
    fn test_non_utf8_script_is_a_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let src = create_test_file(temp_dir.path(), "bad.js", &[0x69, 0x6d, 0xff, 0xfe]);
        let err = process_file(&src, &temp_dir.path().join("out/bad.js"), &gridchen_mapping())
            .unwrap_err();
        assert!(matches!(err, PublishError::SourceRead { .. }));
    }

    #[test]
    fn test_destination_blocked_by_file_is_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let src = create_test_file(temp_dir.path(), "a.js", b"const a = 1;");
        create_test_file(temp_dir.path(), "out", b"not a directory");
        let err = process_file(&src, &temp_dir.path().join("out/a.js"), &gridchen_mapping())
            .unwrap_err();
        assert!(matches!(err, PublishError::DestinationWrite { .. }));
    }

    #[test]
    fn test_render_file_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let src = create_test_file(
            temp_dir.path(),
            "m.js",
            b"import g from '/gridchen/g.js';\nvar v;",
        );
        let rendered = render_file(&src, &gridchen_mapping()).unwrap();
        assert_eq!(rendered.bytes, b"import g from 'https://cdn.example/gridchen/g.js';\nvar v;");
        assert_eq!(rendered.outcome, FileOutcome::Rewritten { substitutions: 1 });
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_source_unit_content_by_kind() {
        let temp_dir = TempDir::new().unwrap();
        let js = create_test_file(temp_dir.path(), "a.js", b"var a;");
        let png = create_test_file(temp_dir.path(), "a.png", &[0x89, 0x50]);
        assert_eq!(SourceUnit::read(&js).unwrap().content, SourceContent::Text("var a;".into()));
        assert_eq!(SourceUnit::read(&png).unwrap().content, SourceContent::Bytes(vec![0x89, 0x50]));
    }
}
