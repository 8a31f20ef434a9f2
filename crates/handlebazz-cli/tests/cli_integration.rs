//! Runs the CLI end to end against files in a temporary directory.

use std::path::Path;

use handlebazz_cli::run_from;
use handlebazz_core::HandlebazzError;

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_cook_with_partials_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let page = write(dir.path(), "page.html", "{{> head}}<p>Hello {{person}}</p>{{&gt; end}}");
    let data = write(dir.path(), "page.json", r#"{"person": "James"}"#);
    let head = write(dir.path(), "head.html", "<h1>{{title}}</h1>");
    let head_data = write(dir.path(), "head.json", r#"{"title": "Welcome"}"#);
    let end = write(dir.path(), "end.html", "</body>");
    let output = dir.path().join("out.html");

    run_from([
        "handlebazz",
        "cook",
        page.as_str(),
        "--data",
        data.as_str(),
        "--partial",
        format!("head={head}:{head_data}").as_str(),
        "--partial",
        format!("end={end}").as_str(),
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(output).unwrap(),
        "<h1>Welcome</h1><p>Hello James</p></body>"
    );
}

#[test]
fn test_cook_with_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "page.html", "{{#for xs}}{{this}}{{/for}}");
    let data = write(dir.path(), "page.json", r#"{"xs": [1, 2, 3]}"#);
    let settings = write(
        dir.path(),
        "handlebazz.json",
        &format!(r#"{{"template_dirs": [{:?}]}}"#, dir.path().to_str().unwrap()),
    );
    let output = dir.path().join("out.txt");

    run_from([
        "handlebazz",
        "--settings",
        settings.as_str(),
        "cook",
        "page.html",
        "--data",
        data.as_str(),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(std::fs::read_to_string(output).unwrap(), "123");
}

#[test]
fn test_cook_reports_cook_errors() {
    let dir = tempfile::tempdir().unwrap();
    let page = write(dir.path(), "page.html", "{{missing}}");
    let output = dir.path().join("out.txt");

    let result = run_from(["handlebazz", "cook", page.as_str(), "-o", output.to_str().unwrap()]);
    assert!(matches!(result, Err(HandlebazzError::KeyNotFound { .. })));
    assert!(!output.exists());
}

#[test]
fn test_check_command() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.html", "{{#if a}}{{b}}{{/if}}");
    let bad = write(dir.path(), "bad.html", "{{#if a}}");

    assert!(run_from(["handlebazz", "check", good.as_str()]).is_ok());
    assert!(matches!(
        run_from(["handlebazz", "check", good.as_str(), bad.as_str()]),
        Err(HandlebazzError::ConfigurationError(_))
    ));
}

#[test]
fn test_bad_arguments() {
    assert!(matches!(
        run_from(["handlebazz", "cook"]),
        Err(HandlebazzError::ConfigurationError(_))
    ));
    assert!(matches!(
        run_from(["handlebazz", "cook", "x.html", "--partial", "nameonly"]),
        Err(HandlebazzError::ConfigurationError(_))
    ));
}
