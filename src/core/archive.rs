// ─── Variant archives ───
// Compound-cosmetic packs ship as one archive with one VPK per combination.
// Listing feeds the variant codec; installing materializes a single chosen
// entry into the addons tree.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;
use zip::ZipArchive;

use crate::core::error::{ModError, ModResult};
use crate::core::mods::model::parse_pak_number;
use crate::core::mods::ModStore;

/// Pak slot used for installed variants when the entry name doesn't carry
/// its own `pak##` number.
const DEFAULT_VARIANT_PAK: u32 = 20;

/// List file entry names inside a variant archive, directories skipped.
/// Entries keep their path prefixes; the codec tolerates them.
pub fn list_entries(archive_path: &Path) -> ModResult<Vec<String>> {
    let file = File::open(archive_path).map_err(|e| ModError::io(archive_path, e))?;
    let mut archive = ZipArchive::new(file)?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        entries.push(entry.name().to_string());
    }
    Ok(entries)
}

/// Extract one archive entry into the store's addons directory under the
/// next free `pak##_dir.vpk` slot. Returns the installed file name, which
/// the caller records in the metadata sidecar.
pub async fn install_entry(
    archive_path: &Path,
    entry_name: &str,
    store: &ModStore,
) -> ModResult<String> {
    let bytes = read_entry(archive_path, entry_name)?;

    let base_name = entry_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entry_name);
    let preferred = parse_pak_number(base_name).unwrap_or(DEFAULT_VARIANT_PAK);
    let pak_number = store.next_free_pak_number(preferred).await?;

    let dest_file_name = format!("pak{pak_number:02}_dir.vpk");
    let dest_path = store.addons_dir().join(&dest_file_name);
    tokio::fs::write(&dest_path, bytes)
        .await
        .map_err(|e| ModError::io(&dest_path, e))?;

    info!(entry = entry_name, file = %dest_file_name, "installed variant entry");
    Ok(dest_file_name)
}

fn read_entry(archive_path: &Path, entry_name: &str) -> ModResult<Vec<u8>> {
    let file = File::open(archive_path).map_err(|e| ModError::io(archive_path, e))?;
    let mut archive = ZipArchive::new(file)?;

    let mut entry = match archive.by_name(entry_name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ModError::ArchiveEntryNotFound(entry_name.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| ModError::io(archive_path, e))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn lists_files_not_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("variants.zip");
        write_archive(
            &archive,
            &[
                ("variants/mina_top_red_dir.vpk", b"vpk"),
                ("preview.png", b"png"),
            ],
        );

        let entries = list_entries(&archive).unwrap();
        assert_eq!(
            entries,
            vec![
                "variants/mina_top_red_dir.vpk".to_string(),
                "preview.png".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn installs_entry_into_free_pak_slot() {
        let tmp = tempfile::tempdir().unwrap();
        let addons = tmp.path().join("addons");
        let disabled = addons.join(".disabled");
        std::fs::create_dir_all(&disabled).unwrap();
        // Slot 20 is taken, so the install lands on 21.
        std::fs::write(addons.join("pak20_dir.vpk"), b"existing").unwrap();
        let store = ModStore::with_dirs(addons.clone(), disabled);

        let archive = tmp.path().join("variants.zip");
        write_archive(&archive, &[("mina_top_red_dir.vpk", b"variant-bytes")]);

        let installed = install_entry(&archive, "mina_top_red_dir.vpk", &store)
            .await
            .unwrap();
        assert_eq!(installed, "pak21_dir.vpk");
        assert_eq!(
            std::fs::read(addons.join("pak21_dir.vpk")).unwrap(),
            b"variant-bytes"
        );
    }

    #[tokio::test]
    async fn missing_entry_is_a_distinct_error() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("variants.zip");
        write_archive(&archive, &[("mina_dir.vpk", b"vpk")]);
        let store = ModStore::with_dirs(tmp.path().join("a"), tmp.path().join("d"));
        std::fs::create_dir_all(tmp.path().join("a")).unwrap();
        std::fs::create_dir_all(tmp.path().join("d")).unwrap();

        let err = install_entry(&archive, "mina_top_red_dir.vpk", &store)
            .await
            .unwrap_err();
        assert!(matches!(err, ModError::ArchiveEntryNotFound(_)));
    }
}
