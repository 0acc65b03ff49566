use crate::validator::lowercase_extension;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

pub struct FileScanner;

impl FileScanner {
    /// 指定した拡張子のファイルを列挙する
    ///
    /// 結果は`extensions`の宣言順に拡張子ごとにまとめられ、各グループ内は
    /// ファイルシステムの列挙順（ソートされない）。`.`で始まるファイル・
    /// ディレクトリは`directory`より下の階層で見つかった場合に除外する。
    pub fn scan_directory(
        directory: &Path,
        recursive: bool,
        extensions: &[&str],
    ) -> Result<Vec<PathBuf>> {
        if !directory.is_dir() {
            bail!("Not a directory: {}", directory.display());
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut groups: Vec<Vec<PathBuf>> = vec![Vec::new(); extensions.len()];

        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|entry| !Self::is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.path().is_file() {
                continue;
            }

            let extension = lowercase_extension(entry.path());
            if let Some(index) = extensions.iter().position(|ext| *ext == extension) {
                groups[index].push(entry.into_path());
            }
        }

        Ok(groups.into_iter().flatten().collect())
    }

    fn is_hidden(entry: &DirEntry) -> bool {
        entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
    }
}
