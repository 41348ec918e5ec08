use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn gavel_cmd() -> Command {
    Command::cargo_bin("gavel").unwrap()
}

fn write_pom(repo: &Path, coordinate: &str, body: &str) {
    let parts: Vec<&str> = coordinate.split(':').collect();
    let (group, artifact, version) = (parts[0], parts[1], parts[2]);
    let dir = repo
        .join(group.replace('.', "/"))
        .join(artifact)
        .join(version);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{artifact}-{version}.pom")),
        format!("<project xmlns=\"http://maven.apache.org/POM/4.0.0\">{body}</project>"),
    )
    .unwrap();
}

/// A project with a parent, a BOM and a test-scoped dependency.
fn setup() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");

    write_pom(
        &repo,
        "org.demo:parent:1",
        "<properties><slf4j.version>2.0.9</slf4j.version></properties>\
         <dependencyManagement><dependencies>\
         <dependency><groupId>org.slf4j</groupId><artifactId>slf4j-api</artifactId>\
         <version>${slf4j.version}</version></dependency>\
         </dependencies></dependencyManagement>",
    );
    write_pom(
        &repo,
        "org.demo:app:1.0",
        "<parent><groupId>org.demo</groupId><artifactId>parent</artifactId><version>1</version></parent>\
         <dependencies>\
         <dependency><groupId>org.slf4j</groupId><artifactId>slf4j-api</artifactId></dependency>\
         <dependency><groupId>junit</groupId><artifactId>junit</artifactId>\
         <version>4.13</version><scope>test</scope></dependency>\
         </dependencies>",
    );
    write_pom(&repo, "org.slf4j:slf4j-api:2.0.9", "");

    fs::write(
        tmp.path().join("config.txt"),
        format!("RepoUrl = file://{}/\nbogus = 1\n", repo.display()),
    )
    .unwrap();
    fs::write(tmp.path().join("input.txt"), "org.demo:app:1.0\norg.demo:app\n").unwrap();
    tmp
}

#[test]
fn test_resolve_writes_sorted_output() {
    let tmp = setup();

    gavel_cmd()
        .current_dir(tmp.path())
        .args(["resolve"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Fetching"))
        .stderr(predicate::str::contains("Invalid GAV coordinate: org.demo:app"))
        .stderr(predicate::str::contains("Unrecognized config property: bogus"));

    let output = fs::read_to_string(tmp.path().join("output.txt")).unwrap();
    assert_eq!(
        output,
        "org.demo:app:1.0\norg.demo:parent:1\norg.slf4j:slf4j-api:2.0.9\n"
    );
}

#[test]
fn test_resolve_to_stdout() {
    let tmp = setup();

    gavel_cmd()
        .current_dir(tmp.path())
        .args(["resolve", "--output", "-"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "org.demo:app:1.0\norg.demo:parent:1\norg.slf4j:slf4j-api:2.0.9\n",
        ));
}

#[test]
fn test_resolve_missing_descriptor_fails_with_partial_output() {
    let tmp = setup();
    fs::write(
        tmp.path().join("input.txt"),
        "org.demo:app:1.0\norg.demo:absent:3\n",
    )
    .unwrap();

    gavel_cmd()
        .current_dir(tmp.path())
        .args(["resolve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("org.demo:absent:3"));

    let output = fs::read_to_string(tmp.path().join("output.txt")).unwrap();
    assert!(output.contains("org.demo:app:1.0"));
    assert!(!output.contains("absent"));
}

#[test]
fn test_resolve_repo_url_from_env() {
    let tmp = setup();
    fs::write(tmp.path().join("config.txt"), "jobs = 1\n").unwrap();

    gavel_cmd()
        .current_dir(tmp.path())
        .env(
            "GAVEL_REPO_URL",
            format!("file://{}", tmp.path().join("repo").display()),
        )
        .args(["resolve", "--output", "nested/result.txt"])
        .assert()
        .success();

    assert!(tmp.path().join("nested/result.txt").is_file());
}

#[test]
fn test_resolve_without_config_fails() {
    let tmp = TempDir::new().unwrap();

    gavel_cmd()
        .current_dir(tmp.path())
        .args(["resolve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.txt"));
}

#[test]
fn test_path_prints_location() {
    let tmp = TempDir::new().unwrap();

    gavel_cmd()
        .current_dir(tmp.path())
        .env_remove("GAVEL_REPO_URL")
        .args([
            "path",
            "com.google.guava:guava:33.0.0-jre",
            "--repo-url",
            "https://repo.example.com/maven2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "com/google/guava/guava/33.0.0-jre/guava-33.0.0-jre.pom",
        ))
        .stdout(predicate::str::contains(
            "https://repo.example.com/maven2/com/google/guava/guava/33.0.0-jre/guava-33.0.0-jre.pom",
        ));
}

#[test]
fn test_path_rejects_malformed_coordinate() {
    gavel_cmd()
        .args(["path", "com.google.guava:guava"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed coordinate"));
}
