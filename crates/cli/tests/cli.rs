use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const ADMIN_EMAIL: &str = "admin@example.fr";

/// A command running against a fresh SQLite file inside `dir`
fn gazette(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("gazette");
    cmd.current_dir(dir.path())
        .env("GAZETTE__GATEWAY__KIND", "sqlite")
        .env("GAZETTE__GATEWAY__DB_PATH", dir.path().join("gazette.sqlite"))
        .env("GAZETTE__GENERATION__PROVIDER", "stub")
        .env("GAZETTE__ADMIN__EMAILS", ADMIN_EMAIL);
    cmd
}

fn as_admin(dir: &TempDir) -> Command {
    let mut cmd = gazette(dir);
    cmd.env("GAZETTE__SESSION__USER_ID", "admin-1")
        .env("GAZETTE__SESSION__EMAIL", ADMIN_EMAIL);
    cmd
}

fn as_reader(dir: &TempDir) -> Command {
    let mut cmd = gazette(dir);
    cmd.env("GAZETTE__SESSION__USER_ID", "reader-1")
        .env("GAZETTE__SESSION__EMAIL", "lecteur@example.fr");
    cmd
}

fn feed_json(dir: &TempDir) -> Vec<Value> {
    let output = gazette(dir)
        .args(["feed", "--json"])
        .output()
        .expect("run feed");
    assert!(output.status.success(), "feed failed: {:?}", output);
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    json.as_array().expect("feed is an array").clone()
}

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("gazette.toml");

    gazette(&dir)
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("[gateway]"));
    assert!(content.contains("[admin]"));

    gazette(&dir)
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn admin_generate_publishes_to_feed() {
    let dir = TempDir::new().expect("temp dir");

    as_admin(&dir)
        .args(["admin", "generate", "--topic", "Le futur de l'IA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("le-futur-de-l-ia"));

    let entries = feed_json(&dir);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["slug"], "le-futur-de-l-ia");
    assert_eq!(entries[0]["favorite"], false);
}

#[test]
fn admin_commands_require_admin_role() {
    let dir = TempDir::new().expect("temp dir");

    as_reader(&dir)
        .args(["admin", "recent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Admin access required"));
}

#[test]
fn favorites_require_sign_in() {
    let dir = TempDir::new().expect("temp dir");

    gazette(&dir)
        .arg("favorites")
        .assert()
        .failure()
        .stderr(predicate::str::contains("sign in"));
}

#[test]
fn unknown_article_slug_fails() {
    let dir = TempDir::new().expect("temp dir");

    gazette(&dir)
        .args(["article", "introuvable"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Article not found"));
}

#[test]
fn reader_can_comment_and_favorite() {
    let dir = TempDir::new().expect("temp dir");

    as_admin(&dir)
        .args(["admin", "generate", "--topic", "Cuisine durable"])
        .assert()
        .success();

    let entries = feed_json(&dir);
    let id = entries[0]["id"].as_str().expect("article id").to_string();

    as_reader(&dir)
        .args(["comment", &id, "--text", "Très intéressant"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Comment posted"));

    as_reader(&dir)
        .args(["favorite", &id])
        .assert()
        .success();

    let output = as_reader(&dir)
        .args(["article", "cuisine-durable", "--json"])
        .output()
        .expect("run article");
    assert!(output.status.success(), "article failed: {:?}", output);
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let comments = json["comments"].as_array().expect("comments array");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "Très intéressant");
    assert_eq!(json["favorite"], true);
}

#[test]
fn banner_lists_placeholder_without_articles() {
    let dir = TempDir::new().expect("temp dir");

    gazette(&dir)
        .arg("banner")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chargement..."));
}

#[test]
fn admin_edit_sets_and_clears_image() {
    let dir = TempDir::new().expect("temp dir");

    as_admin(&dir)
        .args(["admin", "generate", "--topic", "Voyage lent"])
        .assert()
        .success();
    let id = feed_json(&dir)[0]["id"]
        .as_str()
        .expect("article id")
        .to_string();

    as_admin(&dir)
        .args(["admin", "edit", &id, "--image-url", "https://images.example/3.png"])
        .assert()
        .success();
    assert_eq!(feed_json(&dir)[0]["image_url"], "https://images.example/3.png");

    as_admin(&dir)
        .args(["admin", "edit", &id, "--clear-image"])
        .assert()
        .success();
    assert!(feed_json(&dir)[0]["image_url"].is_null());
}
