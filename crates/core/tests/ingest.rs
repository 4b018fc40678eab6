//! End-to-end ingestion: tabular source -> parsed rows -> deduplicated directory.

use std::io::Write;

use loaddesk_core::source::{self, TabularSource};
use loaddesk_core::{deduplicate, Carrier, Driver, Error};

const FEED: &str = "\
DRIVER ID,DRIVER NAME,TRAILER TYPE,CARRIER ID,CARRIER NAME
D1,Alice,Reefer,C1,Acme
D1,Alice B,,,
D2,Bob,Flatbed,C2,Bolt Freight

,Nameless,Van,C1,Acme Logistics
D3,,Van,,
";

fn feed_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(FEED.as_bytes()).expect("write feed");
    file
}

#[test]
fn test_documented_example() {
    let text = "\
DRIVER ID,DRIVER NAME,TRAILER TYPE,CARRIER ID,CARRIER NAME
D1,Alice,Reefer,C1,Acme
D1,Alice B,,,
";
    let rows = source::parse_str(text).unwrap();
    let dir = deduplicate(&rows);

    assert_eq!(
        dir.drivers,
        vec![Driver {
            id: "D1".into(),
            name: "Alice B".into(),
            trailer_type: "".into(),
        }]
    );
    assert_eq!(
        dir.carriers,
        vec![Carrier {
            id: "C1".into(),
            name: "Acme".into(),
        }]
    );
}

#[tokio::test]
async fn test_load_directory_from_file() {
    let file = feed_file();
    let src = TabularSource::File(file.path().to_path_buf());

    let dir = source::load_directory(&src).await;

    let drivers: Vec<_> = dir.drivers.iter().map(|d| (d.id.as_str(), d.name.as_str())).collect();
    assert_eq!(drivers, [("D1", "Alice B"), ("D2", "Bob")]);

    let carriers: Vec<_> = dir.carriers.iter().map(|c| (c.id.as_str(), c.name.as_str())).collect();
    assert_eq!(carriers, [("C1", "Acme Logistics"), ("C2", "Bolt Freight")]);
}

#[tokio::test]
async fn test_missing_source_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let src = TabularSource::File(dir.path().join("does-not-exist.csv"));

    assert!(source::fetch_records(&src).await.is_err());
    let directory = source::load_directory(&src).await;
    assert!(directory.is_empty());
}

#[test]
fn test_blocking_load() {
    let file = feed_file();
    let src = TabularSource::File(file.path().to_path_buf());

    let rows = source::blocking::fetch_records(&src).unwrap();
    assert_eq!(rows.len(), 5);

    let dir = source::blocking::load_directory(&src);
    assert_eq!(dir.drivers.len(), 2);
    assert_eq!(dir.carriers.len(), 2);
}

#[tokio::test]
async fn test_latin1_bytes_keep_the_rest_of_the_feed() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(b"DRIVER ID,DRIVER NAME,TRAILER TYPE,CARRIER ID,CARRIER NAME\n")
        .unwrap();
    file.write_all(b"D1,Alice,Reefer,C1,Acme\n").unwrap();
    file.write_all(b"D2,Jos\xe9,Van,C2,Bolt\n").unwrap();
    let src = TabularSource::File(file.path().to_path_buf());

    let dir = source::load_directory(&src).await;

    assert_eq!(dir.drivers.len(), 2);
    assert_eq!(dir.carriers.len(), 2);
    assert_eq!(dir.drivers[0].name, "Alice");
    assert!(dir.drivers[1].name.starts_with("Jos"));
    assert_eq!(dir.carrier("C2").map(|c| c.name.as_str()), Some("Bolt"));
}

#[tokio::test]
async fn test_unreachable_url_fails_open() {
    let src = TabularSource::from_str_or_url("http://127.0.0.1:1/db.csv");
    assert!(matches!(src, TabularSource::Url(_)));

    assert!(matches!(
        source::fetch_records(&src).await,
        Err(Error::Http(_))
    ));
    let directory = source::load_directory(&src).await;
    assert!(directory.is_empty());
}

/// Serve one canned HTTP response on a local port.
fn serve_once(response: &'static str) -> String {
    use std::io::Read;
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}/db.csv", addr)
}

#[tokio::test]
async fn test_http_error_status_is_a_source_fetch_error() {
    let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
    let src = TabularSource::from_str_or_url(&url);

    match source::fetch_records(&src).await {
        Err(Error::SourceFetch { source_name, reason }) => {
            assert_eq!(source_name, url);
            assert!(reason.contains("404"));
        }
        other => panic!("expected SourceFetch, got {:?}", other.map(|rows| rows.len())),
    }
}

#[tokio::test]
async fn test_load_directory_over_http() {
    let url = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: 83\r\nConnection: close\r\n\r\n\
         DRIVER ID,DRIVER NAME,TRAILER TYPE,CARRIER ID,CARRIER NAME\nD1,Alice,Reefer,C1,Acme\n",
    );
    let dir = source::load_directory(&TabularSource::from_str_or_url(&url)).await;

    assert_eq!(dir.drivers.len(), 1);
    assert_eq!(dir.carriers.len(), 1);
}
