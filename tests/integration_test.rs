use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use std::path::Path;
use tempfile::tempdir;

const CATALOG: &str = r#"{
  "name": "StikJIT Repo",
  "identifier": "com.stik.repo",
  "apps": [
    {
      "name": "StikJIT",
      "bundleIdentifier": "com.stik.sj",
      "version": "1.0.0",
      "versionDate": "2024-01-01",
      "versionDescription": "Initial release",
      "downloadURL": "https://example.com/StikJIT-1.0.0.ipa",
      "size": 100,
      "versions": [
        {
          "version": "1.0.0",
          "date": "2024-01-01",
          "localizedDescription": "Initial release",
          "downloadURL": "https://example.com/StikJIT-1.0.0.ipa",
          "size": 100,
          "minOSVersion": "17.4"
        }
      ]
    }
  ],
  "news": []
}
"#;

fn releases_body(tag: &str, asset_name: &str) -> String {
    format!(
        r###"[
            {{
                "tag_name": "{tag}",
                "published_at": "2024-03-01T12:30:00Z",
                "body": "## What's new\r\n\r\n- **Faster** pairing\r\n- Fixed a well-known crash",
                "assets": [
                    {{
                        "name": "{asset_name}",
                        "size": 12345678,
                        "browser_download_url": "https://example.com/{asset_name}"
                    }}
                ]
            }},
            {{
                "tag_name": "v1.0.0",
                "published_at": "2024-01-01T00:00:00Z",
                "body": null,
                "assets": []
            }}
        ]"###
    )
}

fn write_catalog(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("repo.json");
    std::fs::write(&path, CATALOG).unwrap();
    path
}

fn sync_cmd(api_url: &str, catalog: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("catalog-sync"));
    cmd.arg("--repo")
        .arg("owner/app")
        .arg("--catalog")
        .arg(catalog)
        .arg("--api-url")
        .arg(api_url);
    cmd
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_end_to_end_update() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body("v1.1.0", "App-1.1.0.ipa"))
        .create();

    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    sync_cmd(&url, &catalog)
        .assert()
        .success()
        .stdout(predicates::str::contains("updated owner/app 1.0.0 -> 1.1.0"));

    let doc = read_json(&catalog);
    let app = &doc["apps"][0];
    assert_eq!(app["version"], "1.1.0");
    assert_eq!(app["versionDate"], "2024-03-01");
    assert_eq!(
        app["versionDescription"],
        "What's new\r \n• Faster pairing\r\n• Fixed a well-known crash"
    );
    assert_eq!(app["downloadURL"], "https://example.com/App-1.1.0.ipa");
    assert_eq!(app["size"], 12345678);
    assert_eq!(app["bundleIdentifier"], "com.stik.sj");

    let versions = app["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["version"], "1.1.0");
    assert_eq!(versions[0]["date"], "2024-03-01");
    assert_eq!(versions[0]["minOSVersion"], "17.4");

    let news = doc["news"].as_array().unwrap();
    assert_eq!(news.len(), 1);
    assert_eq!(news[0]["identifier"], "release-v1.1.0");
    assert_eq!(news[0]["title"], "1.1.0 - StikJIT  01/03/24");
    assert_eq!(
        news[0]["url"],
        "https://github.com/owner/app/releases/tag/v1.1.0"
    );

    // The staging file does not outlive the write
    assert!(!dir.path().join("repo.json.tmp").exists());
}

#[test]
fn test_second_run_is_up_to_date() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body("v1.1.0", "App-1.1.0.ipa"))
        .expect(2)
        .create();

    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    sync_cmd(&url, &catalog).assert().success();
    let after_first = std::fs::read_to_string(&catalog).unwrap();

    sync_cmd(&url, &catalog)
        .assert()
        .success()
        .stdout(predicates::str::contains("up-to-date owner/app 1.1.0"));

    assert_eq!(std::fs::read_to_string(&catalog).unwrap(), after_first);
    let doc = read_json(&catalog);
    assert_eq!(doc["news"].as_array().unwrap().len(), 1);
}

#[test]
fn test_missing_ipa_is_reported_and_leaves_catalog() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body("v1.1.0", "App-1.1.0.zip"))
        .create();

    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    sync_cmd(&url, &catalog)
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "failed owner/app: No .ipa asset found in release v1.1.0",
        ));

    assert_eq!(std::fs::read_to_string(&catalog).unwrap(), CATALOG);
    assert!(!dir.path().join("repo.json.tmp").exists());
}

#[test]
fn test_fetch_failure_exits_with_one() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/app/releases")
        .with_status(500)
        .create();

    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    sync_cmd(&url, &catalog).assert().failure().code(1);
    assert_eq!(std::fs::read_to_string(&catalog).unwrap(), CATALOG);
}

#[test]
fn test_no_releases_exits_with_one() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();

    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    sync_cmd(&url, &catalog)
        .assert()
        .failure()
        .code(1)
        .stderr(predicates::str::contains("No releases found"));
}

#[test]
fn test_missing_catalog_is_reported() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body("v1.1.0", "App-1.1.0.ipa"))
        .create();

    let dir = tempdir().unwrap();
    let catalog = dir.path().join("missing.json");

    sync_cmd(&url, &catalog)
        .assert()
        .success()
        .stdout(predicates::str::contains("failed owner/app: Failed to read"));
    assert!(!catalog.exists());
}

#[test]
fn test_malformed_catalog_is_reported_and_left_alone() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body("v1.1.0", "App-1.1.0.ipa"))
        .create();

    let dir = tempdir().unwrap();
    let catalog = dir.path().join("repo.json");
    std::fs::write(&catalog, "{ not json").unwrap();

    sync_cmd(&url, &catalog)
        .assert()
        .success()
        .stdout(predicates::str::contains("failed owner/app: Invalid catalog"));
    assert_eq!(std::fs::read_to_string(&catalog).unwrap(), "{ not json");
}

#[test]
fn test_dry_run_leaves_catalog() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/app/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body("v1.1.0", "App-1.1.0.ipa"))
        .create();

    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    sync_cmd(&url, &catalog)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicates::str::contains("would update owner/app 1.0.0 -> 1.1.0"));

    assert_eq!(std::fs::read_to_string(&catalog).unwrap(), CATALOG);
}
