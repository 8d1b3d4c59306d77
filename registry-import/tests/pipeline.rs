use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;

use registry_catalog::*;
use registry_import::*;
use tempfile::TempDir;

fn run(source: &str, schema: &EntitySchema) -> Generated {
    generate(source, "test.csv", schema, &ImportOptions::default(), &SilentProgress).unwrap()
}

fn run_with(source: &str, schema: &EntitySchema, options: ImportOptions) -> Generated {
    generate(source, "test.csv", schema, &options, &SilentProgress).unwrap()
}

/// Values between the parentheses after VALUES, split on top-level commas.
fn values_of(statement: &str) -> Vec<String> {
    let start = statement.find("VALUES (").unwrap() + "VALUES (".len();
    let body = &statement[start..statement.len() - 2];
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in body.chars() {
        match c {
            '\'' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => out.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    out.push(current);
    out
}

fn unquote(literal: &str) -> &str {
    literal.trim_start_matches('\'').trim_end_matches('\'')
}

fn is_uuid(s: &str) -> bool {
    s.len() == 36
        && s.chars().enumerate().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit() && !c.is_ascii_uppercase(),
        })
}

const CAR_HEADER: &str = "vin,color,edition_id,sequence,destroyed,manufacture_date,shipping_date,shipping_location,shipping_vessel,sale_date,sale_location,sale_dealer,sale_msrp,current_owner_id";

#[test]
fn owner_row_becomes_one_statement() {
    let out = run("name,country,state,city\nJohn Doe,US,CA,Los Angeles\n", &owners());
    assert_eq!(out.statements.len(), 1);

    let stmt = &out.statements[0];
    let prefix = "INSERT INTO owners (id,name,country,state,city) VALUES ('";
    let suffix = "','John Doe','US','CA','Los Angeles');";
    assert!(stmt.starts_with(prefix), "{stmt}");
    assert!(stmt.ends_with(suffix), "{stmt}");
    let id = &stmt[prefix.len()..stmt.len() - suffix.len()];
    assert!(is_uuid(id), "bad id {id}");
}

#[test]
fn empty_vin_is_null_and_absent_destroyed_is_false() {
    let source = format!("{CAR_HEADER}\n,red,ed-1,4\n");
    let out = run(&source, &cars());
    let values = values_of(&out.statements[0]);

    assert_eq!(values.len(), cars().output_columns().len());
    assert_eq!(values[1], "NULL"); // vin
    assert_eq!(values[2], "'red'");
    assert_eq!(values[4], "4"); // sequence
    assert_eq!(values[5], "0"); // destroyed
    assert!(values[6..].iter().all(|v| v == "NULL"));
}

#[test]
fn destroyed_true_in_any_case_is_one() {
    let source = format!("{CAR_HEADER}\nVIN1,,,,TRUE,,,,,,,,,\nVIN2,,,,yes,,,,,,,,,\n");
    let out = run(&source, &cars());
    assert_eq!(values_of(&out.statements[0])[5], "1");
    assert_eq!(values_of(&out.statements[1])[5], "0");
}

#[test]
fn car_row_renders_every_kind() {
    let source = format!(
        "{CAR_HEADER}\n1HGCM82633A004352,Guards Red,ed-9,17,false,1973-03-02,04/01/1973,Hamburg,MV Atlantic,1973-06-15 10:30:00,New York,Brumos,\"41,500.00\",own-1\n"
    );
    let err = generate(&source, "cars.csv", &cars(), &ImportOptions::default(), &SilentProgress)
        .unwrap_err();
    // Thousands separators are not numbers
    assert!(err.to_string().contains("column sale_msrp"), "{err}");

    let source = source.replace("\"41,500.00\"", "41500.00");
    let out = run(&source, &cars());
    let values = values_of(&out.statements[0]);
    assert_eq!(
        &values[1..],
        &[
            "'1HGCM82633A004352'",
            "'Guards Red'",
            "'ed-9'",
            "17",
            "0",
            "'1973-03-02T00:00:00.000Z'",
            "'1973-04-01T00:00:00.000Z'",
            "'Hamburg'",
            "'MV Atlantic'",
            "'1973-06-15T10:30:00.000Z'",
            "'New York'",
            "'Brumos'",
            "41500.00",
            "'own-1'",
        ]
    );
}

#[test]
fn apostrophes_are_escaped() {
    let out = run("name,country,state,city\nO'Brien,IE,,Cork\n", &owners());
    let values = values_of(&out.statements[0]);
    assert_eq!(values[1], "'O''Brien'");
    assert_eq!(values[3], "NULL");
}

#[test]
fn header_only_source_yields_nothing() {
    let out = run("name,country,state,city\n", &owners());
    assert!(out.statements.is_empty());
    assert_eq!(out.stats, ImportStats::default());
    assert_eq!(out.to_sql(), "");
}

#[test]
fn statement_count_matches_non_empty_rows() {
    let source = "name,country,state,city\nA,US,,\n\nB,US,,\n\n\nC,US,,\n";
    let out = run(source, &owners());
    assert_eq!(out.statements.len(), 3);
    assert_eq!(out.stats.rows_read, 3);
    assert_eq!(out.stats.statements_written, 3);
    assert_eq!(out.to_sql().lines().count(), 3);
    assert!(!out.to_sql().ends_with('\n'));
}

#[test]
fn whitespace_only_rows_are_skipped() {
    let source = "name,country,state,city\n   \nA,US,,\n , ,\t,\n,,,\n";
    let out = run(source, &owners());
    assert_eq!(out.statements.len(), 1);
    assert_eq!(out.stats.rows_read, 1);
    assert!(out.statements[0].ends_with("','A','US',NULL,NULL);"));
}

#[test]
fn ten_thousand_rows_get_distinct_ids() {
    let mut source = String::from("name,country,state,city\n");
    for _ in 0..10_000 {
        source.push_str("Same Person,US,CA,Fresno\n");
    }
    let out = run(&source, &owners());
    assert_eq!(out.statements.len(), 10_000);

    let ids: HashSet<String> = out
        .statements
        .iter()
        .map(|s| values_of(s)[0].clone())
        .collect();
    assert_eq!(ids.len(), 10_000);
}

#[test]
fn stable_ids_are_reproducible() {
    let source = "name,country,state,city\nAnn,US,TX,Austin\nBob,US,TX,Austin\n";
    let options = ImportOptions {
        id_mode: IdMode::Stable,
        ..Default::default()
    };
    let first = run_with(source, &owners(), options);
    let second = run_with(source, &owners(), options);
    assert_eq!(first.statements, second.statements);
    assert_ne!(
        values_of(&first.statements[0])[0],
        values_of(&first.statements[1])[0]
    );
}

#[test]
fn stable_ids_reject_duplicate_rows() {
    let source = "name,country,state,city\nAnn,US,TX,Austin\nAnn,US,TX,Austin\n";
    let options = ImportOptions {
        id_mode: IdMode::Stable,
        ..Default::default()
    };
    let err = generate(source, "dup.csv", &owners(), &options, &SilentProgress).unwrap_err();
    match err {
        ImportError::Record(e) => {
            assert_eq!(e.row, 3);
            assert!(matches!(e.cause, RecordErrorCause::DuplicateId(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn abort_policy_names_the_row() {
    let source = "car_id,owner_id,date_start,date_end\nc1,o1,2001-01-01,\nc2,o2,31/31/2001,\n";
    let err = generate(
        source,
        "history.csv",
        &car_owners(),
        &ImportOptions::default(),
        &SilentProgress,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "row 3: column date_start: invalid timestamp value '31/31/2001'"
    );
}

#[test]
fn skip_policy_drops_and_counts_rows() {
    let source = "car_id,owner_id,date_start,date_end\nc1,o1,2001-01-01,\nc2,o2,bogus,\nc3,o3,,\n";
    let options = ImportOptions {
        on_invalid: InvalidValuePolicy::Skip,
        ..Default::default()
    };
    let out = run_with(source, &car_owners(), options);
    assert_eq!(out.statements.len(), 2);
    assert_eq!(out.stats.rows_read, 3);
    assert_eq!(out.stats.rows_skipped, 1);
    assert!(out.statements[1].contains("'c3'"));
}

#[test]
fn null_policy_keeps_rows() {
    let source = "car_id,owner_id,date_start,date_end\nc2,o2,bogus,\n";
    let options = ImportOptions {
        on_invalid: InvalidValuePolicy::Null,
        ..Default::default()
    };
    let out = run_with(source, &car_owners(), options);
    assert_eq!(
        out.statements,
        vec!["INSERT INTO car_owners (car_id,owner_id,date_start,date_end) VALUES ('c2','o2',NULL,NULL);"]
    );
    assert_eq!(out.stats.values_nulled, 1);
}

#[test]
fn other_delimiters() {
    let options = ImportOptions {
        delimiter: b';',
        ..Default::default()
    };
    let out = run_with("name;country;state;city\nDe Vries, Jan;NL;;Delft\n", &owners(), options);
    let values = values_of(&out.statements[0]);
    assert_eq!(unquote(&values[1]), "De Vries, Jan");
    assert_eq!(values[4], "'Delft'");
}

#[test]
fn quoted_fields_keep_delimiters_and_quotes() {
    let out = run(
        "name,country,state,city\n\"Smith, \"\"Bud\"\"\",US,,\"Paris, TX\"\n",
        &owners(),
    );
    let values = values_of(&out.statements[0]);
    assert_eq!(values[1], "'Smith, \"Bud\"'");
    assert_eq!(values[4], "'Paris, TX'");
}

#[test]
fn missing_header_field_fails_before_rows() {
    let err = generate(
        "name,country\nAnn,US\n",
        "owners.csv",
        &owners(),
        &ImportOptions::default(),
        &SilentProgress,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Source header is missing field(s) required by owners: state, city"
    );
}

#[test]
fn overlong_row_is_a_parse_error() {
    let err = generate(
        "name,country,state,city\nAnn,US,TX,Austin,extra\n",
        "owners.csv",
        &owners(),
        &ImportOptions::default(),
        &SilentProgress,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ImportError::RowTooLong {
            line: 2,
            found: 5,
            expected: 4
        }
    ));
}

#[test]
fn invalid_schema_is_rejected() {
    let mut schema = owners();
    schema.columns.clear();
    let err = generate(
        "name\nAnn\n",
        "owners.csv",
        &schema,
        &ImportOptions::default(),
        &SilentProgress,
    )
    .unwrap_err();
    assert!(matches!(err, ImportError::Schema(_)));
}

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<String>>,
}

impl ImportProgress for Recorder {
    fn on_start(&self, table: &str, _source: &str, total: usize) {
        self.events.borrow_mut().push(format!("start {table} {total}"));
    }
    fn on_record(&self, _current: usize, _total: usize) {}
    fn on_record_error(&self, error: &RecordError) {
        self.events.borrow_mut().push(format!("error {}", error.row));
    }
    fn on_complete(&self, stats: &ImportStats) {
        self.events
            .borrow_mut()
            .push(format!("complete {}", stats.statements_written));
    }
}

#[test]
fn progress_sees_start_errors_and_completion() {
    let recorder = Recorder::default();
    let options = ImportOptions {
        on_invalid: InvalidValuePolicy::Skip,
        ..Default::default()
    };
    let source = "car_id,owner_id,date_start,date_end\nc1,o1,,\nc2,o2,nope,\n";
    generate(source, "h.csv", &car_owners(), &options, &recorder).unwrap();
    assert_eq!(
        *recorder.events.borrow(),
        vec!["start car_owners 2", "error 3", "complete 1"]
    );
}

#[test]
fn import_file_writes_derived_output() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("owners.csv");
    fs::write(&source, "name,country,state,city\nAnn,US,TX,Austin\nBob,,,\n").unwrap();
    let output = default_output_path(&source);

    let stats = import_file(
        &source,
        &output,
        &owners(),
        &ImportOptions::default(),
        &SilentProgress,
    )
    .unwrap();
    assert_eq!(stats.statements_written, 2);
    assert_eq!(output, tmp.path().join("owners.sql"));

    let sql = fs::read_to_string(&output).unwrap();
    assert_eq!(sql.lines().count(), 2);
    assert!(sql.lines().all(|l| l.starts_with("INSERT INTO owners ")));
    assert!(!tmp.path().join("owners.sql.tmp").exists());
}

#[test]
fn failed_import_leaves_no_output() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("history.csv");
    fs::write(
        &source,
        "car_id,owner_id,date_start,date_end\nc1,o1,,\nc2,o2,garbage,\n",
    )
    .unwrap();
    let output = tmp.path().join("history.sql");

    let result = import_file(
        &source,
        &output,
        &car_owners(),
        &ImportOptions::default(),
        &SilentProgress,
    );
    assert!(matches!(result, Err(ImportError::Record(_))));
    assert!(!output.exists());
}

#[test]
fn unwritable_output_leaves_no_temp_file() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("owners.csv");
    fs::write(&source, "name,country,state,city\nAnn,US,TX,Austin\n").unwrap();
    // A directory cannot be replaced by the finished file.
    let output = tmp.path().join("owners.sql");
    fs::create_dir(&output).unwrap();

    let result = import_file(
        &source,
        &output,
        &owners(),
        &ImportOptions::default(),
        &SilentProgress,
    );
    assert!(matches!(result, Err(ImportError::Io { .. })));
    assert!(output.is_dir());
    assert!(!tmp.path().join("owners.sql.tmp").exists());
}

#[test]
fn unreadable_source_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let result = import_file(
        &tmp.path().join("missing.csv"),
        &tmp.path().join("missing.sql"),
        &owners(),
        &ImportOptions::default(),
        &SilentProgress,
    );
    assert!(matches!(result, Err(ImportError::Io { .. })));
}
