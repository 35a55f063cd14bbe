//! # Resolución de paths
//! src/files/resolver.rs
//!
//! Decide qué hacer con un path decodificado:
//!
//! ```text
//! root + path ──┬─ es directorio ──┬─ tiene index.html → ServeFile(dir/index.html)
//!               │                  └─ no              → ServeDirectoryListing
//!               └─ no ─────────────┬─ se puede abrir  → ServeFile
//!                                  └─ no              → NotFound
//! ```
//!
//! El path se concatena al root **sin normalizar**: un `..` en el path llega
//! tal cual al filesystem. Solo `Request::parse` produce los paths que
//! llegan aquí.

use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Archivo que se sirve en lugar del listado de un directorio
pub const INDEX_FILE: &str = "index.html";

/// Resultado de resolver un path contra el root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// Archivo regular a servir
    ServeFile(PathBuf),

    /// Directorio a listar; `request_path` siempre termina en `/`
    ServeDirectoryListing { dir: PathBuf, request_path: OsString },

    /// No se pudo abrir; se responde con el listado del root
    NotFound,
}

/// Resuelve `decoded_path` contra `root`
///
/// # Ejemplo
/// ```no_run
/// use std::path::Path;
/// use tinyhttpd::files::resolver::{resolve, ResolvedTarget};
///
/// match resolve(Path::new("/srv"), "/docs") {
///     ResolvedTarget::ServeFile(path) => println!("file {}", path.display()),
///     ResolvedTarget::ServeDirectoryListing { request_path, .. } => println!("list {:?}", request_path),
///     ResolvedTarget::NotFound => println!("fallback"),
/// }
/// ```
pub fn resolve(root: &Path, decoded_path: impl AsRef<OsStr>) -> ResolvedTarget {
    let decoded_path = decoded_path.as_ref();
    let candidate = concat_path(root, decoded_path);

    if candidate.is_dir() {
        let index = concat_path(&candidate, format!("/{}", INDEX_FILE));
        if index.is_file() {
            return ResolvedTarget::ServeFile(index);
        }

        let mut request_path = decoded_path.to_os_string();
        if !decoded_path.as_bytes().ends_with(b"/") {
            request_path.push("/");
        }

        return ResolvedTarget::ServeDirectoryListing {
            dir: concat_path(root, &request_path),
            request_path,
        };
    }

    match File::open(&candidate) {
        Ok(_) => ResolvedTarget::ServeFile(candidate),
        Err(_) => ResolvedTarget::NotFound,
    }
}

/// Concatenación literal de strings, sin `Path::join` (que descartaría el
/// root ante un sufijo absoluto) y sin normalizar segmentos.
pub fn concat_path(base: &Path, suffix: impl AsRef<OsStr>) -> PathBuf {
    let mut joined = OsString::from(base.as_os_str());
    joined.push(suffix);
    PathBuf::from(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs/sub")).unwrap();
        fs::create_dir_all(dir.path().join("site")).unwrap();
        fs::write(dir.path().join("hello.txt"), "hello").unwrap();
        fs::write(dir.path().join("docs/..hidden"), "dots").unwrap();
        fs::write(dir.path().join("site/index.html"), "<h1>site</h1>").unwrap();
        dir
    }

    #[test]
    fn test_concat_path_keeps_segments() {
        assert_eq!(concat_path(Path::new("/srv"), "/a/../b"), PathBuf::from("/srv/a/../b"));
        assert_eq!(concat_path(Path::new("."), "/x"), PathBuf::from("./x"));
    }

    #[test]
    fn test_resolve_regular_file() {
        let dir = fixture();
        let target = resolve(dir.path(), "/hello.txt");

        assert_eq!(target, ResolvedTarget::ServeFile(concat_path(dir.path(), "/hello.txt")));
    }

    #[test]
    fn test_resolve_directory_with_index() {
        let dir = fixture();

        let expected = ResolvedTarget::ServeFile(concat_path(dir.path(), "/site/index.html"));
        assert_eq!(resolve(dir.path(), "/site"), expected);
        assert_eq!(
            resolve(dir.path(), "/site/"),
            ResolvedTarget::ServeFile(concat_path(dir.path(), "/site//index.html"))
        );
    }

    #[test]
    fn test_resolve_directory_without_index() {
        let dir = fixture();

        assert_eq!(
            resolve(dir.path(), "/docs"),
            ResolvedTarget::ServeDirectoryListing {
                dir: concat_path(dir.path(), "/docs/"),
                request_path: OsString::from("/docs/"),
            }
        );
    }

    #[test]
    fn test_resolve_root() {
        let dir = fixture();

        assert_eq!(
            resolve(dir.path(), "/"),
            ResolvedTarget::ServeDirectoryListing {
                dir: concat_path(dir.path(), "/"),
                request_path: OsString::from("/"),
            }
        );
    }

    #[test]
    fn test_index_directory_is_not_served_as_file() {
        let dir = fixture();
        fs::create_dir_all(dir.path().join("odd/index.html")).unwrap();

        assert!(matches!(
            resolve(dir.path(), "/odd"),
            ResolvedTarget::ServeDirectoryListing { .. }
        ));
    }

    #[test]
    fn test_resolve_missing() {
        let dir = fixture();
        assert_eq!(resolve(dir.path(), "/nope.txt"), ResolvedTarget::NotFound);
        assert_eq!(resolve(dir.path(), "/docs/nope/deeper"), ResolvedTarget::NotFound);
    }

    #[test]
    fn test_dots_in_name_are_literal() {
        let dir = fixture();

        assert_eq!(
            resolve(dir.path(), "/docs/..hidden"),
            ResolvedTarget::ServeFile(concat_path(dir.path(), "/docs/..hidden"))
        );
    }

    #[test]
    fn test_non_utf8_name_is_resolved() {
        use std::os::unix::ffi::OsStringExt;

        let dir = fixture();
        let name = OsString::from_vec(b"caf\xe9.txt".to_vec());
        fs::write(dir.path().join(&name), "latin-1").unwrap();

        let decoded = crate::http::request::url_decode("/caf%E9.txt");
        assert_eq!(
            resolve(dir.path(), &decoded),
            ResolvedTarget::ServeFile(dir.path().join(&name))
        );
    }

    #[test]
    fn test_dot_dot_segments_are_not_normalized() {
        // Comportamiento conocido: el root no contiene los paths con `..`
        let outer = fixture();
        let root = outer.path().join("docs");

        assert_eq!(
            resolve(&root, "/../hello.txt"),
            ResolvedTarget::ServeFile(concat_path(&root, "/../hello.txt"))
        );
    }
}
