//! # pdfium-auto
//!
//! Find a usable [PDFium](https://pdfium.googlesource.com/pdfium/) shared
//! library for `pdfium-render`, downloading and caching one when the machine
//! has none.
//!
//! ## Resolution order
//!
//! 1. `PDFIUM_LIB_PATH`: an existing library file, used as-is.
//! 2. The per-version cache directory
//!    (`<cache>/pdf-highlights/pdfium-{VERSION}/`, override the base with
//!    `PDFIUM_AUTO_CACHE_DIR`).
//! 3. A fresh download of the platform archive from
//!    [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries),
//!    unpacked into the cache directory.
//!
//! ```rust,no_run
//! use pdfium_auto::{bind_pdfium, locate_pdfium};
//!
//! if locate_pdfium().is_none() {
//!     eprintln!("PDFium will be downloaded on first use");
//! }
//! let pdfium = bind_pdfium(None).expect("PDFium unavailable");
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pdfium_render::prelude::Pdfium;
use thiserror::Error;

/// The pdfium-binaries release tag used for downloads.
pub const PDFIUM_VERSION: &str = "7690";

/// Environment variable naming an existing pdfium library.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Environment variable overriding the base cache directory.
pub const CACHE_DIR_ENV: &str = "PDFIUM_AUTO_CACHE_DIR";

const BASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Download progress sink: `(bytes_downloaded, total_bytes)`.
pub type DownloadProgress<'a> = &'a dyn Fn(u64, Option<u64>);

/// Errors returned while locating or binding PDFium.
#[derive(Error, Debug)]
pub enum PdfiumAutoError {
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Cache directory error: {0}")]
    CacheDir(#[source] std::io::Error),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Archive extraction failed: {0}")]
    Extract(String),

    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },
}

/// Where a resolved library came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySource {
    /// `PDFIUM_LIB_PATH` pointed at an existing file.
    EnvOverride(PathBuf),
    /// Found in the cache directory from an earlier download.
    Cached(PathBuf),
    /// Downloaded during this call.
    Downloaded(PathBuf),
}

impl LibrarySource {
    pub fn path(&self) -> &Path {
        match self {
            LibrarySource::EnvOverride(p) | LibrarySource::Cached(p) | LibrarySource::Downloaded(p) => p,
        }
    }
}

/// Release asset layout for one OS/architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
    /// Asset filename in the GitHub release.
    pub archive: &'static str,
    /// Path of the library inside the archive.
    pub member: &'static str,
    /// Filename written into the cache directory.
    pub library: &'static str,
}

const PLATFORMS: &[Platform] = &[
    Platform { os: "macos", arch: "aarch64", archive: "pdfium-mac-arm64.tgz", member: "lib/libpdfium.dylib", library: "libpdfium.dylib" },
    Platform { os: "macos", arch: "x86_64", archive: "pdfium-mac-x64.tgz", member: "lib/libpdfium.dylib", library: "libpdfium.dylib" },
    Platform { os: "linux", arch: "x86_64", archive: "pdfium-linux-x64.tgz", member: "lib/libpdfium.so", library: "libpdfium.so" },
    Platform { os: "linux", arch: "aarch64", archive: "pdfium-linux-arm64.tgz", member: "lib/libpdfium.so", library: "libpdfium.so" },
    Platform { os: "windows", arch: "x86_64", archive: "pdfium-win-x64.tgz", member: "bin/pdfium.dll", library: "pdfium.dll" },
    Platform { os: "windows", arch: "aarch64", archive: "pdfium-win-arm64.tgz", member: "bin/pdfium.dll", library: "pdfium.dll" },
    Platform { os: "windows", arch: "x86", archive: "pdfium-win-x86.tgz", member: "bin/pdfium.dll", library: "pdfium.dll" },
];

impl Platform {
    /// Look up the asset layout for an OS/architecture pair.
    pub fn lookup(os: &str, arch: &str) -> Result<Platform, PdfiumAutoError> {
        PLATFORMS
            .iter()
            .find(|p| p.os == os && p.arch == arch)
            .copied()
            .ok_or_else(|| PdfiumAutoError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })
    }

    /// The platform this binary was compiled for.
    pub fn current() -> Result<Platform, PdfiumAutoError> {
        Self::lookup(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Download URL of the release asset.
    pub fn download_url(&self) -> String {
        format!("{BASE_URL}/chromium%2F{PDFIUM_VERSION}/{}", self.archive)
    }
}

/// Per-version cache directory for the PDFium library.
pub fn pdfium_cache_dir() -> PathBuf {
    if let Ok(base) = std::env::var(CACHE_DIR_ENV) {
        return PathBuf::from(base).join(format!("pdfium-{PDFIUM_VERSION}"));
    }

    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join("pdf-highlights")
        .join(format!("pdfium-{PDFIUM_VERSION}"))
}

static RESOLVED: OnceLock<LibrarySource> = OnceLock::new();

/// Find an already-present library without touching the network.
pub fn locate_pdfium() -> Option<LibrarySource> {
    if let Ok(p) = std::env::var(LIB_PATH_ENV) {
        let path = PathBuf::from(p);
        if path.is_file() {
            return Some(LibrarySource::EnvOverride(path));
        }
    }
    let platform = Platform::current().ok()?;
    let cached = pdfium_cache_dir().join(platform.library);
    cached.is_file().then_some(LibrarySource::Cached(cached))
}

/// Make sure a library is on disk, downloading it if necessary.
///
/// The first successful resolution is memoised for the process lifetime.
pub fn ensure_pdfium_library(
    on_progress: Option<DownloadProgress<'_>>,
) -> Result<LibrarySource, PdfiumAutoError> {
    if let Some(source) = RESOLVED.get() {
        return Ok(source.clone());
    }

    let source = match locate_pdfium() {
        Some(found) => found,
        None => download_into_cache(on_progress)?,
    };

    let _ = RESOLVED.set(source.clone());
    Ok(source)
}

/// Resolve (downloading if needed) and bind PDFium.
pub fn bind_pdfium(on_progress: Option<DownloadProgress<'_>>) -> Result<Pdfium, PdfiumAutoError> {
    let source = ensure_pdfium_library(on_progress)?;
    bind_pdfium_from_path(source.path())
}

/// Bind to a library at an explicit path.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, PdfiumAutoError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| PdfiumAutoError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn download_into_cache(
    on_progress: Option<DownloadProgress<'_>>,
) -> Result<LibrarySource, PdfiumAutoError> {
    let platform = Platform::current()?;
    let cache_dir = pdfium_cache_dir();
    std::fs::create_dir_all(&cache_dir).map_err(PdfiumAutoError::CacheDir)?;

    let archive = fetch(&platform.download_url(), on_progress)?;
    let dest = cache_dir.join(platform.library);
    unpack_member(&archive, platform.member, &dest)?;

    Ok(LibrarySource::Downloaded(dest))
}

fn fetch(url: &str, on_progress: Option<DownloadProgress<'_>>) -> Result<Vec<u8>, PdfiumAutoError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-auto/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| PdfiumAutoError::Download(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| PdfiumAutoError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(PdfiumAutoError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut body = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = [0u8; 64 * 1024];

    loop {
        match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                body.extend_from_slice(&chunk[..n]);
                if let Some(cb) = on_progress {
                    cb(body.len() as u64, total);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(PdfiumAutoError::Download(format!("Read error: {e}"))),
        }
    }

    Ok(body)
}

/// Copy one member of a `.tgz` archive to `dest`.
///
/// The member is streamed into a temporary file beside `dest` and renamed
/// into place once complete, so an interrupted unpack never leaves a
/// truncated library for [`locate_pdfium`] to pick up.
fn unpack_member(archive: &[u8], member: &str, dest: &Path) -> Result<(), PdfiumAutoError> {
    let extract_err = |e: std::io::Error| PdfiumAutoError::Extract(e.to_string());

    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(archive));
    for entry in tar.entries().map_err(extract_err)? {
        let mut entry = entry.map_err(extract_err)?;
        if entry.path().map_err(extract_err)?.to_string_lossy() != member {
            continue;
        }

        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(PdfiumAutoError::CacheDir)?;
        std::io::copy(&mut entry, &mut staged)
            .map_err(|e| PdfiumAutoError::Extract(format!("Unpack of '{member}' failed: {e}")))?;
        staged.as_file().sync_all().map_err(extract_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            staged
                .as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o755))
                .map_err(extract_err)?;
        }

        staged
            .persist(dest)
            .map_err(|e| PdfiumAutoError::Extract(format!("Cannot move library into cache: {}", e.error)))?;
        return Ok(());
    }

    Err(PdfiumAutoError::Extract(format!(
        "'{member}' not found in archive"
    )))
}
