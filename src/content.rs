//! # Resolución de Contenido
//! src/content.rs
//!
//! Traduce el target de un request a una ruta bajo el directorio raíz y
//! decide el `Content-Type` a partir de la extensión.
//!
//! La comparación de extensiones distingue mayúsculas: `logo.PNG` se sirve
//! como `text/plain`.

use std::path::{Component, Path, PathBuf};

/// Tabla de extensiones conocidas, en orden de evaluación
pub const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".png", "image/png"),
];

/// Tipo usado cuando ninguna extensión coincide
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Resultado de resolver un target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// El target contiene `..` o saldría de la raíz; no se debe tocar el
    /// filesystem
    Traversal,

    /// Target aceptado
    File(ResolvedTarget),
}

/// Target aceptado junto con la ruta candidata en disco
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Target después de reescribir `/` a `/index.html`
    pub target: String,

    /// Ruta candidata bajo la raíz (puede no existir)
    pub path: PathBuf,

    pub content_type: &'static str,
}

/// Content-Type según el sufijo del path
///
/// # Ejemplo
/// ```
/// use static_server::content::content_type_for;
///
/// assert_eq!(content_type_for("a.html"), "text/html");
/// assert_eq!(content_type_for("a.PNG"), "text/plain");
/// ```
pub fn content_type_for(path: &str) -> &'static str {
    CONTENT_TYPES
        .iter()
        .find(|(suffix, _)| path.ends_with(suffix))
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Resuelve un target contra el directorio raíz
///
/// Es una función pura: no consulta el filesystem.
pub fn resolve(root: &Path, target: &str) -> Resolution {
    if target.contains("..") {
        return Resolution::Traversal;
    }

    let target = if target == "/" { "/index.html" } else { target };

    // Sin el '/' inicial para que join no descarte la raíz
    let relative = Path::new(target.trim_start_matches('/'));

    // Un prefijo de unidad (`C:`) o una raíz haría que join reemplace la raíz
    let escapes = relative
        .components()
        .any(|c| matches!(c, Component::Prefix(_) | Component::RootDir | Component::ParentDir));
    if escapes {
        return Resolution::Traversal;
    }

    Resolution::File(ResolvedTarget {
        target: target.to_string(),
        path: root.join(relative),
        content_type: content_type_for(target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_table() {
        let cases = [
            ("a.html", "text/html"),
            ("/dir/page.html", "text/html"),
            ("site.css", "text/css"),
            ("app.js", "application/javascript"),
            ("photo.jpg", "image/jpeg"),
            ("photo.jpeg", "image/jpeg"),
            ("logo.png", "image/png"),
            ("a.PNG", "text/plain"),
            ("a.HTML", "text/plain"),
            ("notes.txt", "text/plain"),
            ("README", "text/plain"),
            ("archive.html.gz", "text/plain"),
            ("data.json", "text/plain"),
        ];

        for (path, expected) in cases {
            assert_eq!(content_type_for(path), expected, "path: {}", path);
        }
    }

    #[test]
    fn test_root_rewritten_to_index() {
        let root = Path::new("/srv/static");
        let resolved = resolve(root, "/");

        let expected = resolve(root, "/index.html");
        assert_eq!(resolved, expected);

        match resolved {
            Resolution::File(file) => {
                assert_eq!(file.target, "/index.html");
                assert_eq!(file.path, PathBuf::from("/srv/static/index.html"));
                assert_eq!(file.content_type, "text/html");
            }
            Resolution::Traversal => panic!("'/' is not a traversal"),
        }
    }

    #[test]
    fn test_traversal_rejected_anywhere() {
        let root = Path::new("./static");
        assert_eq!(resolve(root, "/../secret"), Resolution::Traversal);
        assert_eq!(resolve(root, "/a/../../b"), Resolution::Traversal);
        assert_eq!(resolve(root, "/file..txt"), Resolution::Traversal);
        assert_eq!(resolve(root, ".."), Resolution::Traversal);
    }

    #[test]
    fn test_path_stays_under_root() {
        let root = Path::new("./static");
        match resolve(root, "//etc/passwd") {
            Resolution::File(file) => assert_eq!(file.path, PathBuf::from("./static/etc/passwd")),
            Resolution::Traversal => panic!("not a traversal"),
        }
    }

    #[test]
    fn test_resolved_paths_never_leave_root() {
        let root = Path::new("./static");
        let targets = [
            "/C:/Windows/win.ini",
            "/C:",
            "//server/share/x.txt",
            "/a/./b.txt",
            "/\\evil\\x",
            "/index.html",
        ];

        for target in targets {
            if let Resolution::File(file) = resolve(root, target) {
                assert!(file.path.starts_with(root), "target: {}", target);
            }
        }
    }

    #[cfg(windows)]
    #[test]
    fn test_drive_prefix_is_traversal() {
        let root = Path::new("C:\\srv\\static");
        assert_eq!(resolve(root, "/C:/Windows/win.ini"), Resolution::Traversal);
        assert_eq!(resolve(root, "/\\\\host\\share\\f.txt"), Resolution::Traversal);
    }

    #[test]
    fn test_nested_path() {
        let root = Path::new("root");
        match resolve(root, "/css/site.css") {
            Resolution::File(file) => {
                assert_eq!(file.path, PathBuf::from("root/css/site.css"));
                assert_eq!(file.content_type, "text/css");
                assert_eq!(file.target, "/css/site.css");
            }
            Resolution::Traversal => panic!("not a traversal"),
        }
    }
}
