//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero, sirviendo un
//! directorio temporal, y lo apaga con el token al terminar.

use rcgen::{generate_simple_self_signed, CertifiedKey};
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::TempDir;
use tinyhttpd::config::ServerConfig;
use tinyhttpd::error::ServerError;
use tinyhttpd::server::{Server, ShutdownToken};

/// Servidor corriendo en background
struct TestServer {
    addr: SocketAddr,
    shutdown: ShutdownToken,
    handle: Option<JoinHandle<Result<(), ServerError>>>,
    _root: TempDir,
}

impl TestServer {
    fn start(root: TempDir) -> Self {
        Self::start_with_tls(root, None)
    }

    fn start_with_tls(root: TempDir, tls_cert: Option<PathBuf>) -> Self {
        let mut config = ServerConfig::new(root.path());
        config.host = "127.0.0.1".to_string();
        config.port = 0;
        config.tls_cert = tls_cert;
        config.grace_period = Duration::from_secs(2);

        let shutdown = ShutdownToken::new();
        let server = Server::bind(config, shutdown.clone()).expect("Failed to bind");
        let addr = server.local_addr().expect("No local address");
        let handle = thread::spawn(move || server.run());

        Self {
            addr,
            shutdown,
            handle: Some(handle),
            _root: root,
        }
    }

    /// Envía bytes crudos y retorna todo lo que el servidor conteste
    fn send_raw(&self, request: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(self.addr).expect("Failed to connect");
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        stream.write_all(request).unwrap();
        stream.flush().unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).unwrap();
        response
    }

    fn get(&self, path: &str) -> String {
        let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", path);
        String::from_utf8_lossy(&self.send_raw(request.as_bytes())).into_owned()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Árbol de prueba:
///
/// ```text
/// hello.txt  logo.png  zeta.txt  alpha.txt
/// site/index.html
/// docs/b/  docs/a/  docs/z.txt  docs/a.txt  docs/..hidden
/// ```
fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("hello.txt"), "hello world").unwrap();
    fs::write(dir.path().join("zeta.txt"), "z").unwrap();
    fs::write(dir.path().join("alpha.txt"), "a").unwrap();
    fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G', 0, 1, 2]).unwrap();

    fs::create_dir(dir.path().join("site")).unwrap();
    fs::write(dir.path().join("site/index.html"), "<h1>home</h1>").unwrap();

    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::create_dir(dir.path().join("docs/b")).unwrap();
    fs::create_dir(dir.path().join("docs/a")).unwrap();
    fs::write(dir.path().join("docs/z.txt"), "").unwrap();
    fs::write(dir.path().join("docs/a.txt"), "").unwrap();
    fs::write(dir.path().join("docs/..hidden"), "two dots").unwrap();
    dir
}

/// Certificado autofirmado para `localhost`, guardado junto con su clave
/// en un único PEM dentro de `dir`
fn write_test_pem(dir: &TempDir) -> (PathBuf, CertificateDer<'static>) {
    let CertifiedKey { cert, signing_key } =
        generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let path = dir.path().join("combined.pem");
    fs::write(&path, format!("{}{}", cert.pem(), signing_key.serialize_pem())).unwrap();
    (path, cert.der().clone())
}

/// GET sobre TLS confiando solo en `cert`
fn tls_get(addr: SocketAddr, cert: CertificateDer<'static>, path: &str) -> String {
    let mut roots = RootCertStore::empty();
    roots.add(cert).unwrap();

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let name = ServerName::try_from("localhost").unwrap();
    let conn = ClientConnection::new(Arc::new(config), name).unwrap();
    let mut tls = StreamOwned::new(conn, TcpStream::connect(addr).unwrap());
    tls.sock.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    tls.write_all(format!("GET {} HTTP/1.1\r\n\r\n", path).as_bytes())
        .unwrap();
    let mut response = Vec::new();
    tls.read_to_end(&mut response).unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

/// Separa headers y body de una response
fn split_response(response: &str) -> (&str, &str) {
    match response.find("\r\n\r\n") {
        Some(pos) => (&response[..pos], &response[pos + 4..]),
        None => (response, ""),
    }
}

// ==================== Archivos ====================

#[test]
fn test_serves_text_file() {
    let server = TestServer::start(fixture());
    let response = server.get("/hello.txt");

    assert_eq!(
        response,
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 11\r\n\r\nhello world"
    );
}

#[test]
fn test_serves_binary_file_as_attachment() {
    let server = TestServer::start(fixture());
    let response = server.send_raw(b"GET /logo.png HTTP/1.1\r\n\r\n");

    let expected_head = "HTTP/1.1 200 OK\r\n\
                         Content-Type: image/png\r\n\
                         Content-Length: 7\r\n\
                         Content-Disposition: attachment; filename=\"logo.png\"\r\n\r\n";
    assert!(response.starts_with(expected_head.as_bytes()));
    assert_eq!(&response[expected_head.len()..], &[0x89, b'P', b'N', b'G', 0, 1, 2]);
}

#[test]
fn test_directory_with_index_serves_index() {
    let server = TestServer::start(fixture());

    let via_directory = server.get("/site");
    let direct = server.get("/site/index.html");

    assert_eq!(via_directory, direct);
    assert!(via_directory.contains("Content-Type: text/html\r\n"));
    assert!(via_directory.ends_with("<h1>home</h1>"));
}

#[test]
fn test_url_encoded_path() {
    let dir = fixture();
    fs::write(dir.path().join("my file.txt"), "spaced").unwrap();
    let server = TestServer::start(dir);

    assert!(server.get("/my%20file.txt").ends_with("spaced"));
    assert!(server.get("/my+file.txt").ends_with("spaced"));
}

// ==================== Listados ====================

#[test]
fn test_directory_listing_order() {
    let server = TestServer::start(fixture());
    let response = server.get("/docs");
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\nContent-Type: text/html"));
    assert!(body.starts_with("\r\n"));
    assert!(body.contains("Index of /docs/</h1>"));

    let parent = body.find("<a href=\"/\">..</a>").expect("parent link");
    let dir_a = body.find("<a href=\"/docs/a\">a</a>").expect("dir a");
    let dir_b = body.find("<a href=\"/docs/b\">b</a>").expect("dir b");
    let file_a = body.find("<a href=\"/docs/a.txt\">a.txt</a>").expect("file a.txt");
    let file_z = body.find("<a href=\"/docs/z.txt\">z.txt</a>").expect("file z.txt");

    assert!(parent < dir_a);
    assert!(dir_a < dir_b);
    assert!(dir_b < file_a);
    assert!(file_a < file_z);
}

#[test]
fn test_root_listing_has_no_parent_and_footer() {
    let server = TestServer::start(fixture());
    let response = server.get("/");

    assert!(response.contains("Index of /</h1>"));
    assert!(!response.contains(">..</a>"));
    assert!(response.contains(&format!("Serving port {}", server.addr.port())));
    assert!(response.contains(tinyhttpd::SERVER_NAME));
}

#[test]
fn test_missing_path_falls_back_to_root_listing() {
    let server = TestServer::start(fixture());

    let missing = server.get("/does/not/exist");
    let root = server.get("/");

    assert!(missing.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(split_response(&missing).1, split_response(&root).1);
}

#[test]
fn test_encoded_dots_are_not_normalized() {
    let server = TestServer::start(fixture());
    let response = server.get("/docs/%2E%2Ehidden");

    assert_eq!(
        response,
        "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: 8\r\n\
         Content-Disposition: attachment; filename=\"..hidden\"\r\n\r\ntwo dots"
    );
}

#[test]
fn test_non_utf8_file_name_is_served() {
    use std::os::unix::ffi::OsStrExt;

    let dir = fixture();
    let name = std::ffi::OsStr::from_bytes(b"caf\xe9.txt");
    fs::write(dir.path().join(name), "latin-1").unwrap();
    let server = TestServer::start(dir);

    assert!(server.get("/").contains("<a href=\"/caf%E9.txt\">"));
    assert!(server.get("/caf%E9.txt").ends_with("\r\n\r\nlatin-1"));
}

// ==================== Requests inválidos ====================

#[test]
fn test_malformed_request_gets_no_response() {
    let server = TestServer::start(fixture());

    assert!(server.send_raw(b"GARBAGE\r\n\r\n").is_empty());
    assert!(server.send_raw(b"GET /hello.txt\r\n\r\n").is_empty());
}

#[test]
fn test_server_survives_bad_clients() {
    let server = TestServer::start(fixture());

    drop(TcpStream::connect(server.addr).unwrap());
    server.send_raw(b"NOPE");

    assert!(server.get("/hello.txt").ends_with("hello world"));
}

#[test]
fn test_forwarded_for_does_not_change_response() {
    let server = TestServer::start(fixture());
    let response = server.send_raw(
        b"GET /hello.txt HTTP/1.1\r\nX-Forwarded-For: 203.0.113.9\r\n\r\n",
    );

    assert!(String::from_utf8_lossy(&response).ends_with("hello world"));
}

// ==================== Concurrencia ====================

#[test]
fn test_concurrent_clients() {
    let dir = fixture();
    for i in 0..16 {
        fs::write(dir.path().join(format!("file{}.txt", i)), format!("content {}", i)).unwrap();
    }
    let server = TestServer::start(dir);
    let addr = server.addr;

    let clients: Vec<_> = (0..16)
        .map(|i| {
            thread::spawn(move || {
                let mut stream = TcpStream::connect(addr).unwrap();
                stream
                    .write_all(format!("GET /file{}.txt HTTP/1.1\r\n\r\n", i).as_bytes())
                    .unwrap();
                let mut response = String::new();
                stream.read_to_string(&mut response).unwrap();
                (i, response)
            })
        })
        .collect();

    for client in clients {
        let (i, response) = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with(&format!("\r\n\r\ncontent {}", i)));
    }
}

#[test]
fn test_idle_client_does_not_block_others() {
    let server = TestServer::start(fixture());

    // Conexión abierta sin enviar nada
    let _idle = TcpStream::connect(server.addr).unwrap();
    thread::sleep(Duration::from_millis(100));

    assert!(server.get("/hello.txt").ends_with("hello world"));
}

// ==================== TLS ====================

#[test]
fn test_serves_file_over_tls() {
    let dir = fixture();
    let (pem, cert) = write_test_pem(&dir);
    let server = TestServer::start_with_tls(dir, Some(pem));

    let response = tls_get(server.addr, cert, "/hello.txt");
    assert_eq!(
        response,
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 11\r\n\r\nhello world"
    );
}

#[test]
fn test_tls_server_survives_plaintext_client() {
    let dir = fixture();
    let (pem, cert) = write_test_pem(&dir);
    let server = TestServer::start_with_tls(dir, Some(pem));

    // Handshake fallido: la conexión se cierra sin respuesta HTTP
    let mut plain = TcpStream::connect(server.addr).unwrap();
    plain.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    plain.write_all(b"GET /hello.txt HTTP/1.1\r\n\r\n").unwrap();
    let mut reply = Vec::new();
    let _ = plain.read_to_end(&mut reply);
    assert!(!String::from_utf8_lossy(&reply).contains("HTTP/1.1 200 OK"));

    let response = tls_get(server.addr, cert, "/hello.txt");
    assert!(response.ends_with("\r\n\r\nhello world"));
}
