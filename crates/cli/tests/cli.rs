use assert_cmd::Command;

#[test]
fn openapi_prints_book_paths() {
    let output = Command::cargo_bin("booklist-cli")
        .unwrap()
        .args(["openapi", "--compact"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let spec: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(spec["info"]["title"], "BookList API");
    assert!(spec["paths"]["/api/v1/books"].is_object());
    assert!(spec["paths"]["/api/v1/books/{id}"].is_object());
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("booklist-cli")
        .unwrap()
        .arg("migrate")
        .assert()
        .failure();
}
