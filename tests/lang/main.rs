use ppl::{errors, PplError};

fn captures<'a>(content: &'a str, pattern: &str) -> Vec<&'a str> {
    let re = regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(false)
        .build()
        .expect("regex should compile correctly");

    re.captures_iter(content)
        .map(|m| m.get(1).expect("expectation should have a value").as_str().trim_end())
        .collect()
}

fn run_file(path: &str) -> Result<(), PplError> {
    let content = std::fs::read(path).map_err(|e| errors::system(
        format!("Unable to read {}: {}", path, e),
        "Make sure that the test fixture exists and is readable.",
    ))?;
    let content = std::str::from_utf8(&content).map_err(|_e| errors::system(
        "The file you provided is not a valid UTF-8 file.",
        "Make sure that the file is a valid UTF-8 file.",
    ))?;

    let expected_values = captures(content, r"#\s*expect: (.*)");
    let expected_errors = captures(content, r"#\s*error: (.*)");

    match ppl::evaluate(content) {
        Ok(values) => {
            assert!(expected_errors.is_empty(), "{}: expected {:?}, got values {:?}", path, expected_errors, values);

            let actual = values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
            assert_eq!(expected_values, actual, "{}: unexpected values", path);
        }
        Err(err) => {
            let actual = err.to_string();
            assert_eq!(expected_errors, vec![actual.as_str()], "{}: unexpected error", path);
        }
    }

    Ok(())
}

include!(concat!(env!("OUT_DIR"), "/tests/lang.rs"));

#[test]
fn every_fixture_has_expectations() {
    let mut fixtures = 0;

    for test_file in walkdir::WalkDir::new("tests/lang").sort_by_file_name() {
        let test_file = test_file.expect("No issues opening the test file");
        if test_file.file_type().is_file() && test_file.path().extension().map(|e| e == "ppl").unwrap_or_default() {
            let path = test_file.path();
            let content = std::fs::read_to_string(path).expect("fixture should be readable");

            assert!(
                content.contains("# expect:") || content.contains("# error:"),
                "{} has no expectations",
                path.display()
            );
            fixtures += 1;
        }
    }

    assert!(fixtures > 0, "no fixtures found under tests/lang");
}
