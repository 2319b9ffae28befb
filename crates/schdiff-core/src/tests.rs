//! Tests for the schema model and `.sch` parsing

use indoc::indoc;

use super::*;

const SAMPLE: &str = indoc! {"
    customer^id^INT^4^1^
    customer^name^VARCHAR^64^2^
    customer^age^INT^4^3^

    orders^order_id^INT^8^1^
    orders^customer_id^INT^4^2^
"};

#[cfg(test)]
mod parse_line_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_line_with_trailing_caret() {
        let (table, column) = parse_line("customer^email^VARCHAR^255^4^").unwrap();
        assert_eq!(table, "customer");
        assert_eq!(column, ColumnDef::new("email", "VARCHAR", "255", "4"));
    }

    #[test]
    fn test_parse_line_without_trailing_caret_is_malformed() {
        let err = parse_line("customer^email^VARCHAR^255^4").unwrap_err();
        assert!(err.contains("found 5"));
    }

    #[test]
    fn test_parse_line_with_extra_fields_is_malformed() {
        assert!(parse_line("a^b^c^d^e^f^").is_err());
    }

    #[test]
    fn test_parse_line_keeps_text_after_last_caret_ignored() {
        let (_, column) = parse_line("t^c^CHAR^1^9^comment").unwrap();
        assert_eq!(column.position, "9");
    }

    #[test]
    fn test_parse_line_empty_names_are_malformed() {
        assert_eq!(parse_line("^c^INT^4^1^").unwrap_err(), "table name is empty");
        assert_eq!(parse_line("t^^INT^4^1^").unwrap_err(), "column name is empty");
    }

    #[test]
    fn test_parse_line_keeps_field_whitespace() {
        let (_, column) = parse_line("t^c^ INT^4^1^").unwrap();
        assert_eq!(column.type_id, " INT");
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_sample_tables_in_file_order() {
        let parsed = SchParser::new().parse_str(SAMPLE).unwrap();
        let names: Vec<&str> = parsed.schema.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["customer", "orders"]);
        assert_eq!(parsed.schema.column_count(), 5);
        assert_eq!(parsed.report.lines_read, 5);
        assert_eq!(parsed.report.columns, 5);
        assert!(!parsed.report.has_skipped());
    }

    #[test]
    fn test_parse_columns_in_declaration_order() {
        let parsed = SchParser::new().parse_str(SAMPLE).unwrap();
        let customer = parsed.schema.table("customer").unwrap();
        let columns: Vec<&str> = customer.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(columns, vec!["id", "name", "age"]);
        assert_eq!(
            parsed.schema.column("customer", "age"),
            Some(&ColumnDef::new("age", "INT", "4", "3"))
        );
    }

    #[test]
    fn test_lenient_parse_skips_malformed_lines() {
        let input = "t^a^INT^4^1^\nnot a column\nt^b^INT^4^2^\nt^c^INT^4\n";
        let parsed = SchParser::new().parse_str(input).unwrap();
        assert_eq!(parsed.schema.column_count(), 2);
        assert_eq!(parsed.report.skipped_lines, vec![2, 4]);
        assert_eq!(parsed.report.lines_read, 4);
    }

    #[test]
    fn test_strict_parse_fails_on_malformed_line() {
        let input = "t^a^INT^4^1^\n\nbroken\n";
        let err = SchParser::strict().parse_str(input).unwrap_err();
        match err {
            SchError::MalformedLine { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_column_is_rejected() {
        let input = "t^a^INT^4^1^\nt^a^INT^8^2^\n";
        let err = SchParser::new().parse_str(input).unwrap_err();
        match err {
            SchError::DuplicateColumn {
                table,
                column,
                line,
            } => {
                assert_eq!(table, "t");
                assert_eq!(column, "a");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strict_parse_rejects_repeated_position() {
        let input = "t^a^INT^4^1^\nt^b^INT^4^1^\n";
        let err = SchParser::strict().parse_str(input).unwrap_err();
        match err {
            SchError::DuplicatePosition {
                table,
                column,
                existing,
                position,
                line,
            } => {
                assert_eq!(table, "t");
                assert_eq!(column, "b");
                assert_eq!(existing, "a");
                assert_eq!(position, "1");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lenient_parse_skips_repeated_position() {
        let input = "t^a^INT^4^1^\nt^b^INT^4^01^\nt^c^INT^4^2^\nu^d^INT^4^1^\n";
        let parsed = SchParser::new().parse_str(input).unwrap();
        let columns: Vec<&str> = parsed
            .schema
            .table("t")
            .unwrap()
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(columns, vec!["a", "c"]);
        assert!(parsed.schema.column("u", "d").is_some());
        assert_eq!(parsed.report.skipped_lines, vec![2]);
        assert_eq!(parsed.report.columns, 3);
    }

    #[test]
    fn test_same_column_name_in_different_tables_is_allowed() {
        let input = "a^id^INT^4^1^\nb^id^INT^4^1^\n";
        let parsed = SchParser::new().parse_str(input).unwrap();
        assert_eq!(parsed.schema.table_count(), 2);
    }

    #[test]
    fn test_crlf_and_surrounding_whitespace_are_trimmed() {
        let input = "  t^a^INT^4^1^  \r\n\t\r\nt^b^CHAR^2^2^\r\n";
        let parsed = SchParser::new().parse_str(input).unwrap();
        assert_eq!(parsed.schema.column("t", "a").unwrap().position, "1");
        assert_eq!(parsed.schema.column("t", "b").unwrap().type_id, "CHAR");
    }

    #[test]
    fn test_parse_file_missing_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SchParser::new()
            .parse_file(dir.path().join("missing.sch"))
            .unwrap_err();
        assert!(matches!(err, SchError::NotFound(_)));
    }

    #[test]
    fn test_parse_file_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin.sch");
        std::fs::write(&path, b"t^caf\xe9^CHAR^4^1^\n").unwrap();

        let parsed = SchParser::new().parse_file(&path).unwrap();
        let column = &parsed.schema.table("t").unwrap().columns[0];
        assert_eq!(column.name, "caf\u{FFFD}");
    }
}

#[cfg(test)]
mod schema_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_column_rejects_duplicates() {
        let mut schema = Schema::new();
        assert!(schema.add_column("t", ColumnDef::new("a", "INT", "4", "1")));
        assert!(!schema.add_column("t", ColumnDef::new("a", "INT", "8", "1")));
        assert_eq!(schema.column("t", "a").unwrap().size, "4");
    }

    #[test]
    fn test_table_names_are_sorted() {
        let schema: Schema = [
            ("zeta", ColumnDef::new("a", "INT", "4", "1")),
            ("alpha", ColumnDef::new("a", "INT", "4", "1")),
        ]
        .into_iter()
        .collect();
        assert_eq!(schema.table_names(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_ordinal_parses_numeric_positions() {
        assert_eq!(ColumnDef::new("a", "INT", "4", " 12").ordinal(), Some(12));
        assert_eq!(ColumnDef::new("a", "INT", "4", "x").ordinal(), None);
    }

    #[test]
    fn test_schema_serializes_as_table_map() {
        let parsed = SchParser::new().parse_str("t^a^INT^4^1^\n").unwrap();
        let json = serde_json::to_value(&parsed.schema).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "t": [{"column": "a", "type": "INT", "size": "4", "position": "1"}]
            })
        );
    }

    #[test]
    fn test_shares_position_compares_numbers_by_value() {
        let first = ColumnDef::new("a", "INT", "4", "1");
        assert!(first.shares_position(&ColumnDef::new("b", "INT", "4", "01")));
        assert!(!first.shares_position(&ColumnDef::new("b", "INT", "4", "2")));
        let named = ColumnDef::new("a", "INT", "4", "x");
        assert!(named.shares_position(&ColumnDef::new("b", "INT", "4", "x")));
        assert!(!ColumnDef::new("a", "INT", "4", "").shares_position(&first));
    }
}
