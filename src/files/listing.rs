//! # Listado de directorios
//! src/files/listing.rs
//!
//! Genera la página HTML con los hijos inmediatos de un directorio:
//! primero el link al padre (salvo en `/`), después los subdirectorios y
//! por último los archivos, cada grupo ordenado lexicográficamente.
//!
//! El body empieza con `\r\n` antes del documento HTML.

use percent_encoding::{percent_encode, AsciiSet, CONTROLS};
use std::ffi::{OsStr, OsString};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::Path;

/// Caracteres ASCII que se codifican en los href, además de todo byte no
/// ASCII. Son los que el decodificador de paths interpretaría distinto
/// (`%`, `+`) o que cortan la URL.
const HREF_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

const STYLE: &str = "html, body { height: 100%; margin: 0; }\
body { display: flex; flex-direction: column; margin: 0; }\
main { flex: 1; overflow-y: auto; padding: 10px; }\
ul { list-style-type: none; margin: 0; padding: 0; }\
li { padding-left: 20px; }\
li.directory::before { content: '\\1F4C1'; margin-right: 10px; }\
li.file::before { content: '\\1F4C4'; margin-right: 10px; }\
footer { background-color: #dddddd; padding: 7px; text-align: center; }";

/// Datos del pie de página
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    /// Descripción del sistema operativo del host
    pub os_description: String,

    /// Puerto en el que escucha el servidor
    pub port: u16,
}

impl std::fmt::Display for Footer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} on {} Serving port {}",
            crate::SERVER_NAME,
            crate::VERSION,
            self.os_description,
            self.port
        )
    }
}

/// Hijos de un directorio, separados y ordenados por bytes
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DirectoryEntries {
    pub directories: Vec<OsString>,
    pub files: Vec<OsString>,
}

/// Lee `dir` y separa subdirectorios de archivos
///
/// Se siguen los symlinks. Una entrada cuyo `stat` falla cuenta como archivo;
/// una entrada que `readdir` no puede entregar se omite.
pub fn scan_directory(dir: &Path) -> io::Result<DirectoryEntries> {
    let entries = fs::read_dir(dir)?.map(|entry| {
        entry.map(|entry| {
            let is_dir = fs::metadata(entry.path())
                .map(|m| m.is_dir())
                .unwrap_or(false);
            (entry.file_name(), is_dir)
        })
    });

    Ok(classify_entries(dir, entries))
}

/// Separa `(nombre, es_directorio)` en dos listas ordenadas, omitiendo las
/// entradas con error
fn classify_entries<I>(dir: &Path, entries: I) -> DirectoryEntries
where
    I: IntoIterator<Item = io::Result<(OsString, bool)>>,
{
    let mut classified = DirectoryEntries::default();

    for entry in entries {
        let (name, is_dir) = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if name == "." || name == ".." {
            continue;
        }

        if is_dir {
            classified.directories.push(name);
        } else {
            classified.files.push(name);
        }
    }

    classified.directories.sort();
    classified.files.sort();
    classified
}

/// Link al directorio padre; `None` para `/`
///
/// Se quita la `/` final y se corta en la última `/` que quede.
///
/// # Ejemplo
/// ```
/// use tinyhttpd::files::listing::parent_path;
///
/// assert_eq!(parent_path("/"), None);
/// assert_eq!(parent_path("/docs/").unwrap(), "/");
/// assert_eq!(parent_path("/docs/sub/").unwrap(), "/docs");
/// ```
pub fn parent_path(request_path: impl AsRef<OsStr>) -> Option<OsString> {
    let path = request_path.as_ref().as_bytes();
    if path == b"/" {
        return None;
    }

    let trimmed = path.strip_suffix(b"/").unwrap_or(path);
    let parent = match trimmed.iter().rposition(|&b| b == b'/') {
        Some(pos) => &trimmed[..pos],
        None => trimmed,
    };

    let parent = if parent.is_empty() { &b"/"[..] } else { parent };
    Some(OsString::from_vec(parent.to_vec()))
}

/// Genera el body HTML del listado de `dir`
///
/// Si el directorio no se puede leer, la lista lleva un mensaje de error
/// en lugar de las entradas.
pub fn render_listing(dir: &Path, request_path: impl AsRef<OsStr>, footer: &Footer) -> String {
    let request_path = request_path.as_ref();
    let mut page = String::with_capacity(2048);

    page.push_str("\r\n");
    let _ = write!(
        page,
        "<html><head><title>Directory Listing</title><style>{}</style></head><body>\r\n\
         <main>\r\n\
         <h1 style=\"background-color: #dddddd; padding: 10px;\">Index of {}</h1>\r\n\
         <ul>\r\n",
        STYLE,
        html_escape(&request_path.to_string_lossy())
    );

    if let Some(parent) = parent_path(request_path) {
        push_entry(&mut page, "directory", &parent, OsStr::new(".."));
    }

    match scan_directory(dir) {
        Ok(entries) => {
            for name in &entries.directories {
                push_entry(&mut page, "directory", &child_path(request_path, name), name);
            }
            for name in &entries.files {
                push_entry(&mut page, "file", &child_path(request_path, name), name);
            }
        }
        Err(e) => {
            tracing::debug!("Failed to read directory {}: {}", dir.display(), e);
            page.push_str("<p>Error reading directory.</p>\r\n");
        }
    }

    let _ = write!(
        page,
        "</ul>\r\n</main>\r\n<footer>{}</footer>\r\n</body></html>\r\n",
        html_escape(&footer.to_string())
    );

    page
}

fn child_path(request_path: &OsStr, name: &OsStr) -> OsString {
    let mut path = request_path.to_os_string();
    path.push(name);
    path
}

fn push_entry(page: &mut String, class: &str, href: &OsStr, label: &OsStr) {
    let _ = write!(
        page,
        "<li class=\"{}\"><a href=\"{}\">{}</a></li>\r\n",
        class,
        html_escape(&encode_href(href)),
        html_escape(&label.to_string_lossy())
    );
}

/// Codifica un path decodificado para usarlo en un href, byte a byte
pub fn encode_href(path: impl AsRef<OsStr>) -> String {
    percent_encode(path.as_ref().as_bytes(), HREF_ENCODE_SET).to_string()
}

/// Escapa caracteres especiales de HTML
fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
