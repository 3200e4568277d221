// src/corpus/normalizer.rs

//! Turns raw record lines into `NormalizedQuestion`s.

use crate::{
    config::MAX_PARSE_DIAGNOSTICS,
    error::FetchError,
    models::question::{NormalizedQuestion, QuestionOption, QuestionType, RawRecord},
    utils::html::extract_list_items,
};

/// Where a record came from. Every field ends up in the question id or `source`.
#[derive(Debug, Clone)]
pub struct RecordContext<'a> {
    pub subject: &'a str,
    /// Chapter label as the user requested it.
    pub chapter: &'a str,
    /// Location of the record file, for attribution.
    pub location: &'a str,
}

/// Result of parsing one JSONL record file.
#[derive(Debug, Default)]
pub struct ParsedRecords {
    /// `(line number, record)`, 1-based line numbers.
    pub records: Vec<(usize, RawRecord)>,
    /// First few parse errors, formatted for diagnostics.
    pub errors: Vec<String>,
    pub error_count: usize,
}

/// Parses a JSONL record file. Bad lines are skipped and reported; the file
/// only fails as a whole when it has lines and none of them parse.
pub fn parse_record_file(body: &str) -> Result<ParsedRecords, FetchError> {
    let mut parsed = ParsedRecords::default();

    for (idx, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawRecord>(line) {
            Ok(record) => parsed.records.push((idx + 1, record)),
            Err(e) => {
                tracing::debug!("Skipping record line {}: {}", idx + 1, e);
                parsed.error_count += 1;
                if parsed.errors.len() < MAX_PARSE_DIAGNOSTICS {
                    parsed.errors.push(format!("line {}: {}", idx + 1, e));
                }
            }
        }
    }

    if parsed.records.is_empty() && parsed.error_count > 0 {
        return Err(FetchError::NoRecords {
            failed_lines: parsed.error_count,
        });
    }

    Ok(parsed)
}

/// Normalizes every question of one record.
///
/// The record part of each id is `<file>@<line>`, or `line<line>` when the
/// record carries no `file`. Several lines may share one `file`.
pub fn normalize_record(
    record: &RawRecord,
    line: usize,
    ctx: &RecordContext<'_>,
) -> Vec<NormalizedQuestion> {
    let record_file = match record.file.as_deref().map(str::trim) {
        Some(file) if !file.is_empty() => format!("{}@{}", file, line),
        _ => format!("line{}", line),
    };

    record
        .questions
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let options_markup = raw.options.as_deref().map(str::trim).unwrap_or("");
            let (question_type, options) = if options_markup.is_empty() {
                (QuestionType::Value, Vec::new())
            } else {
                (QuestionType::Mcq, extract_options(options_markup))
            };

            NormalizedQuestion {
                id: format!("{}::{}::{}::{}", ctx.subject, ctx.chapter, record_file, i),
                subject: ctx.subject.to_string(),
                chapter: ctx.chapter.to_string(),
                question_type,
                exam_html: raw.exam.as_deref().unwrap_or("").trim().to_string(),
                prompt_html: raw.question.as_deref().unwrap_or("").trim().to_string(),
                options,
                correct_answer: answer_at(record, i),
                source: format!("{}#{}", ctx.location, record_file),
            }
        })
        .collect()
}

/// Options keyed `A, B, C, …` in list order. Markup without list items is one option.
fn extract_options(markup: &str) -> Vec<QuestionOption> {
    let items = extract_list_items(markup);
    if items.is_empty() {
        return vec![QuestionOption {
            key: option_key(0),
            html: markup.to_string(),
        }];
    }
    items
        .into_iter()
        .enumerate()
        .map(|(i, html)| QuestionOption {
            key: option_key(i),
            html,
        })
        .collect()
}

/// `0 -> A`, `25 -> Z`, `26 -> AA`, spreadsheet style.
fn option_key(index: usize) -> String {
    let mut n = index + 1;
    let mut key = Vec::new();
    while n > 0 {
        n -= 1;
        key.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    key.reverse();
    String::from_utf8_lossy(&key).into_owned()
}

fn answer_at(record: &RawRecord, index: usize) -> Option<String> {
    let value = record.answers.as_ref()?.get(index)?;
    let text = match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: RecordContext<'static> = RecordContext {
        subject: "physics",
        chapter: "Motion in a Plane",
        location: "physics/Motion in a Plane.jsonl",
    };

    fn record(json: &str) -> RawRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn infers_types_and_extracts_options() {
        let rec = record(
            r#"{"file":"jee-2023","questions":[
                {"exam":" JEE 2023 ","question":" Range? ","options":"<ol><li>10 m</li><li>20 m</li></ol>"},
                {"question":"Speed in m/s?","options":"   "}
            ],"answers":["B", 42]}"#,
        );
        let qs = normalize_record(&rec, 1, &CTX);
        assert_eq!(qs.len(), 2);

        assert_eq!(qs[0].id, "physics::Motion in a Plane::jee-2023@1::0");
        assert_eq!(qs[0].question_type, QuestionType::Mcq);
        assert_eq!(qs[0].exam_html, "JEE 2023");
        assert_eq!(qs[0].prompt_html, "Range?");
        assert_eq!(
            qs[0].options,
            vec![
                QuestionOption { key: "A".into(), html: "10 m".into() },
                QuestionOption { key: "B".into(), html: "20 m".into() },
            ]
        );
        assert_eq!(qs[0].correct_answer.as_deref(), Some("B"));

        assert_eq!(qs[1].question_type, QuestionType::Value);
        assert!(qs[1].options.is_empty());
        assert_eq!(qs[1].correct_answer.as_deref(), Some("42"));
    }

    #[test]
    fn unlisted_options_become_single_option() {
        let rec = record(r#"{"questions":[{"question":"q","options":"(1) 2 (2) 4"}]}"#);
        let qs = normalize_record(&rec, 7, &CTX);
        assert_eq!(qs[0].id, "physics::Motion in a Plane::line7::0");
        assert_eq!(
            qs[0].options,
            vec![QuestionOption { key: "A".into(), html: "(1) 2 (2) 4".into() }]
        );
    }

    #[test]
    fn missing_or_blank_answers_are_undefined() {
        let rec = record(
            r#"{"questions":[{"question":"a"},{"question":"b"},{"question":"c"}],"answers":["  ", null]}"#,
        );
        let qs = normalize_record(&rec, 1, &CTX);
        assert!(qs.iter().all(|q| q.correct_answer.is_none()));
    }

    #[test]
    fn records_sharing_a_file_keep_distinct_ids() {
        let body = concat!(
            r#"{"file":"jee-2023","questions":[{"question":"a"},{"question":"b"}]}"#,
            "\n",
            r#"{"file":"jee-2023","questions":[{"question":"c"},{"question":"d"}]}"#,
        );
        let parsed = parse_record_file(body).unwrap();
        let mut pool: Vec<_> = parsed
            .records
            .iter()
            .flat_map(|(line, rec)| normalize_record(rec, *line, &CTX))
            .collect();
        crate::corpus::sampler::dedup_pool(&mut pool);

        let prompts: Vec<_> = pool.iter().map(|q| q.prompt_html.as_str()).collect();
        assert_eq!(prompts, vec!["a", "b", "c", "d"]);
        assert_eq!(pool[2].id, "physics::Motion in a Plane::jee-2023@2::0");
        assert_eq!(pool[2].source, "physics/Motion in a Plane.jsonl#jee-2023@2");
    }

    #[test]
    fn option_keys_are_letters() {
        assert_eq!(option_key(0), "A");
        assert_eq!(option_key(3), "D");
        assert_eq!(option_key(25), "Z");
        assert_eq!(option_key(26), "AA");
    }

    #[test]
    fn bad_lines_are_skipped_and_counted() {
        let body = "{\"questions\":[{\"question\":\"ok\"}]}\nnot json\n\n{\"questions\":7}\n";
        let parsed = parse_record_file(body).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].0, 1);
        assert_eq!(parsed.error_count, 2);
        assert!(parsed.errors[0].starts_with("line 2:"));
    }

    #[test]
    fn file_with_no_good_lines_fails() {
        assert_eq!(
            parse_record_file("oops\n{broken").unwrap_err(),
            FetchError::NoRecords { failed_lines: 2 }
        );
    }

    #[test]
    fn blank_file_is_empty_not_error() {
        assert!(parse_record_file("\n\n").unwrap().records.is_empty());
    }
}
