use assert_cmd::Command;
use predicates::prelude::*;

const CATALOG: &str = "<catalog><book><title>A</title><price>10</price></book><book><title>B</title><price>20</price></book></catalog>";

fn xmlpick() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("xmlpick")?)
}

#[test]
fn test_show_lists_paths_and_labels() -> Result<(), Box<dyn std::error::Error>> {
    xmlpick()?
        .arg("show")
        .write_stdin(CATALOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("title: A {2}\tcatalog.book[0]"))
        .stdout(predicate::str::contains("catalog.book[1].title"))
        .stdout(predicate::str::contains("book [2]\tcatalog.book"));
    Ok(())
}

#[test]
fn test_show_depth_limit() -> Result<(), Box<dyn std::error::Error>> {
    xmlpick()?
        .args(["show", "--depth", "1"])
        .write_stdin(CATALOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("catalog {1}"))
        .stdout(predicate::str::contains("catalog.book").not());
    Ok(())
}

#[test]
fn test_extract_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let expected = "\
<root>
  <catalog>
    <book>
      <title>B</title>
    </book>
  </catalog>
</root>
";
    xmlpick()?
        .args(["extract", "-p", "catalog.book[1].title"])
        .write_stdin(CATALOG)
        .assert()
        .success()
        .stdout(expected);
    Ok(())
}

#[test]
fn test_extract_file_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("catalog.xml");
    let output = dir.path().join("picked.xml");
    std::fs::write(&input, CATALOG)?;

    xmlpick()?
        .arg("extract")
        .arg(&input)
        .args(["-p", "catalog.book[0].price", "--unwrap-root", "-o"])
        .arg(&output)
        .assert()
        .success();

    let written = std::fs::read_to_string(&output)?;
    assert_eq!(
        written,
        "<catalog>\n  <book>\n    <price>10</price>\n  </book>\n</catalog>"
    );
    Ok(())
}

#[test]
fn test_skipped_path_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    xmlpick()?
        .args(["extract", "-p", "catalog.book[5].title"])
        .write_stdin(CATALOG)
        .assert()
        .success()
        .stdout("<root/>\n")
        .stderr(predicate::str::contains("skipped"));
    Ok(())
}

#[test]
fn test_malformed_path_fails() -> Result<(), Box<dyn std::error::Error>> {
    xmlpick()?
        .args(["extract", "-p", "catalog..book"])
        .write_stdin(CATALOG)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed path"));
    Ok(())
}

#[test]
fn test_malformed_xml_fails() -> Result<(), Box<dyn std::error::Error>> {
    xmlpick()?
        .arg("show")
        .write_stdin("<catalog><book></catalog>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed xml"));
    Ok(())
}

#[test]
fn test_empty_stdin_fails() -> Result<(), Box<dyn std::error::Error>> {
    xmlpick()?
        .arg("show")
        .write_stdin("   ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input"));
    Ok(())
}

#[test]
fn test_show_dotted_name_has_no_path() -> Result<(), Box<dyn std::error::Error>> {
    xmlpick()?
        .arg("show")
        .write_stdin("<a><b.c>X</b.c><b><c>Y</c></b></a>")
        .assert()
        .success()
        .stdout(predicate::str::contains("b.c = X\t-\n"))
        .stdout(predicate::str::contains("c = Y\ta.b.c\n"));
    Ok(())
}
