use std::io::{Cursor, Read};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use zip::ZipArchive;

use crate::{FigureEightError, JobRow};

/// Job fields dropped by [`redact_job`].
pub(crate) const REDACTED_JOB_FIELDS: [&str; 4] = ["css", "js", "cml", "instructions"];

pub(crate) fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, FigureEightError> {
    serde_json::from_str(body).map_err(|err| {
        FigureEightError::Decode(format!("invalid response JSON: {err}; body: {body}"))
    })
}

/// Turns a units page (`{"<unit id>": {...}, ...}`) into rows, keeping page order.
pub(crate) fn decode_job_rows(page: Map<String, Value>) -> Vec<JobRow> {
    page.into_iter()
        .map(|(key, row)| JobRow { key, row })
        .collect()
}

/// Removes the bulky presentation fields from a job object.
///
/// Missing fields are ignored; non-object values pass through untouched.
pub(crate) fn redact_job(mut job: Value) -> Value {
    if let Some(fields) = job.as_object_mut() {
        for field in REDACTED_JOB_FIELDS {
            fields.shift_remove(field);
        }
    }
    job
}

pub(crate) fn has_support_email(job: &Value, support_email: &str) -> bool {
    job.get("support_email").and_then(Value::as_str) == Some(support_email)
}

/// Reads the first file of a result export archive as JSON lines.
///
/// Each non-blank line is parsed as one JSON document, in file order.
pub(crate) fn decode_json_lines_archive(bytes: &[u8]) -> Result<Vec<Value>, FigureEightError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(FigureEightError::Archive)?;
    if archive.is_empty() {
        return Err(FigureEightError::EmptyArchive);
    }

    let mut entry = archive.by_index(0).map_err(FigureEightError::Archive)?;
    let name = entry.name().to_owned();
    let mut raw = Vec::new();
    entry.read_to_end(&mut raw).map_err(|err| {
        FigureEightError::Decode(format!("could not read '{name}' from archive: {err}"))
    })?;

    let report = String::from_utf8(raw)
        .map_err(|err| FigureEightError::Decode(format!("'{name}' is not valid UTF-8: {err}")))?;

    report
        .split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|err| {
                FigureEightError::Decode(format!(
                    "invalid JSON on line {} of '{name}': {err}",
                    index + 1
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use serde_json::{json, Map, Value};
    use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

    use crate::{decode, FigureEightError};

    fn archive(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, contents) in files {
            writer.start_file(*name, options).expect("must start file");
            writer
                .write_all(contents.as_bytes())
                .expect("must write file");
        }
        writer.finish().expect("must finish archive").into_inner()
    }

    #[test]
    fn single_entry_archive_yields_one_document() {
        let bytes = archive(&[("asdf.csv", "{\"fake\":\"data\"}\n")]);
        let values = decode::decode_json_lines_archive(&bytes).expect("must decode");
        assert_eq!(values, vec![json!({"fake": "data"})]);
    }

    #[test]
    fn only_first_entry_is_read() {
        let bytes = archive(&[
            ("first.json", "{\"n\":1}\n\n{\"n\":2}\n"),
            ("second.json", "{\"n\":3}\n"),
        ]);
        let values = decode::decode_json_lines_archive(&bytes).expect("must decode");
        assert_eq!(values, vec![json!({"n": 1}), json!({"n": 2})]);
    }

    #[test]
    fn empty_archive_is_rejected() {
        let bytes = archive(&[]);
        let err = decode::decode_json_lines_archive(&bytes).expect_err("must fail");
        assert!(matches!(err, FigureEightError::EmptyArchive));
    }

    #[test]
    fn non_zip_body_is_archive_error() {
        let err = decode::decode_json_lines_archive(b"{\"not\":\"a zip\"}").expect_err("must fail");
        assert!(matches!(err, FigureEightError::Archive(_)));
    }

    #[test]
    fn bad_line_reports_line_number() {
        let bytes = archive(&[("r.json", "{\"ok\":true}\nnot json\n")]);
        let err = decode::decode_json_lines_archive(&bytes).expect_err("must fail");
        match err {
            FigureEightError::Decode(message) => assert!(message.contains("line 2")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn redact_removes_exactly_presentation_fields() {
        let job = json!({
            "id": 7,
            "title": "Label cats",
            "css": ".a{}",
            "js": "alert(1)",
            "cml": "<cml:text/>",
            "instructions": "Be nice",
            "support_email": "ops@example.com"
        });
        let redacted = decode::redact_job(job);
        assert_eq!(
            redacted,
            json!({"id": 7, "title": "Label cats", "support_email": "ops@example.com"})
        );
    }

    #[test]
    fn redact_tolerates_missing_fields() {
        let redacted = decode::redact_job(json!({"id": 1, "css": ""}));
        assert_eq!(redacted, json!({"id": 1}));
    }

    #[test]
    fn job_rows_keep_page_order() {
        let page: Map<String, Value> =
            decode::decode_json(r#"{"9": {"text": "b"}, "3": {"text": "a"}}"#).expect("must parse");
        let rows = decode::decode_job_rows(page);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "9");
        assert_eq!(rows[1].row, json!({"text": "a"}));
    }

    #[test]
    fn support_email_match_requires_equal_string() {
        let job = json!({"support_email": "ops@example.com"});
        assert!(decode::has_support_email(&job, "ops@example.com"));
        assert!(!decode::has_support_email(&job, "OPS@example.com"));
        assert!(!decode::has_support_email(&json!({"id": 1}), "ops@example.com"));
    }

    #[test]
    fn invalid_json_body_is_decode_error() {
        let err = decode::decode_json::<Value>("<html>").expect_err("must fail");
        assert!(matches!(err, FigureEightError::Decode(_)));
    }
}
