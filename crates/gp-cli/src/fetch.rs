use std::fs;
use std::path::Path;
use std::time::Duration;

use gp_core::psl::SuffixSet;

use crate::config::{Config, Source};
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("gfwpac/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Read a source into memory, downloading it if it is a URL.
pub fn fetch(source: &Source) -> Result<String> {
    match source {
        Source::Path(path) => read_text(path),
        Source::Url(url) => fetch_url(url),
    }
}

fn fetch_url(url: &str) -> Result<String> {
    log::info!("downloading {url}");

    let fetch_error = |source| Error::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(fetch_error)?;

    let text = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(fetch_error)?;

    log::debug!("downloaded {} bytes from {url}", text.len());
    Ok(text)
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| gp_core::Error::io(format!("Failed to read '{}'", path.display()), e).into())
}

/// Load the public suffix table, reusing the on-disk cache unless a refresh is forced.
pub fn load_suffixes(config: &Config) -> Result<SuffixSet> {
    if !config.force_refresh_suffixes && config.suffix_cache.is_file() {
        log::info!("using cached suffix list '{}'", config.suffix_cache.display());
        return Ok(SuffixSet::load_file(&config.suffix_cache)?);
    }

    let text = fetch(&config.suffix_list)?;
    let suffixes = SuffixSet::load(&text);

    // Cache write failures are not fatal.
    if let Err(e) = write_atomic(&config.suffix_cache, &suffixes.to_cache_text()) {
        log::warn!("could not update suffix cache: {e}");
    }

    Ok(suffixes)
}

/// Write `contents` to `path` so that readers never observe a partial file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| gp_core::Error::io(format!("Failed to create '{}'", parent.display()), e))?;
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&tmp_path, contents)
        .map_err(|e| gp_core::Error::io(format!("Failed to write '{}'", tmp_path.display()), e))?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(gp_core::Error::io(format!("Failed to write '{}'", path.display()), e).into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gfwpac-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn writes_atomically_and_creates_parents() {
        let dir = scratch_dir("write");
        let path = dir.join("nested").join("proxy.pac");

        write_atomic(&path, "first").expect("write should succeed");
        write_atomic(&path, "second").expect("overwrite should succeed");

        assert_eq!(fs::read_to_string(&path).expect("file should exist"), "second");
        assert!(!dir.join("nested").join(".proxy.pac.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn reads_missing_file_as_io_error() {
        let err = fetch(&Source::Path(scratch_dir("missing").join("nope.txt"))).unwrap_err();
        assert!(matches!(err, Error::Core(gp_core::Error::Io { .. })));
    }

    #[test]
    fn refreshes_suffix_cache_from_local_list() {
        let dir = scratch_dir("suffixes");
        let list = dir.join("public_suffix_list.dat");
        let cache = dir.join("cache").join("tld.txt");
        write_atomic(&list, "// comment\ncom\n*.ck\n!www.ck\n").expect("list should be written");

        let config = Config {
            suffix_list: Source::Path(list.clone()),
            suffix_cache: cache.clone(),
            ..Config::default()
        };

        let suffixes = load_suffixes(&config).expect("suffixes should load");
        assert_eq!(suffixes.len(), 2);
        assert_eq!(fs::read_to_string(&cache).expect("cache should exist"), "ck\ncom\n");

        // A cached copy wins over the source unless a refresh is forced.
        write_atomic(&list, "org\n").expect("list should be rewritten");
        assert!(load_suffixes(&config).expect("cache should load").contains("com"));

        let forced = Config {
            force_refresh_suffixes: true,
            ..config
        };
        let refreshed = load_suffixes(&forced).expect("refresh should succeed");
        assert!(refreshed.contains("org"));
        assert!(!refreshed.contains("com"));

        let _ = fs::remove_dir_all(&dir);
    }
}
