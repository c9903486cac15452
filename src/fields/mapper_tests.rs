#[cfg(test)]
mod tests {
    use super::super::field_config::{CompositeRule, FieldConfig};
    use super::super::mapper::*;
    use super::super::value::FieldValue;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_flatten_returns_child_value() {
        let raw = json!({"Parent": {"Child": "value123", "Other": "other_value"}});
        assert_eq!(flatten(&raw, "Parent.Child"), Some(&json!("value123")));
    }

    #[test]
    fn test_flatten_missing_segments_are_none() {
        let raw = json!({"Parent": {"OtherChild": "value"}, "Scalar": "text", "Empty": null});
        assert_eq!(flatten(&raw, "Parent.Child"), None);
        assert_eq!(flatten(&raw, "Missing.Child"), None);
        assert_eq!(flatten(&raw, "Scalar.Child"), None);
        assert_eq!(flatten(&raw, "Empty.Child"), None);
    }

    #[test]
    fn test_flatten_walks_several_levels() {
        let raw = json!({"A": {"B": {"C": 42}}});
        assert_eq!(flatten(&raw, "A.B.C"), Some(&json!(42)));
        assert_eq!(flatten(&raw, "A.B"), Some(&json!({"C": 42})));
    }

    #[test]
    fn test_basic_field_renaming() {
        let raw = json!({"sf_field1": "a", "sf_field2": 1});
        let configs = vec![
            FieldConfig::text("agol_field1", "sf_field1", "Alias1"),
            FieldConfig::integer("agol_field2", "sf_field2", "Alias2"),
        ];

        let record = map_record(&raw, &configs);

        assert_eq!(record["agol_field1"], FieldValue::Text("a".to_string()));
        assert_eq!(record["agol_field2"], FieldValue::Integer(1));
        assert!(!record.contains_key("sf_field1"));
    }

    #[test]
    fn test_every_configured_field_is_present() {
        let raw = json!({"Unrelated": 5});
        let configs = vec![
            FieldConfig::text("A", "Missing_A", "A"),
            FieldConfig::integer("B", "Missing_B", "B"),
            FieldConfig::date("C", "Missing_C", "C"),
            FieldConfig::text("D", "Rel__r.Name", "D").flattened(),
        ];

        let record = map_record(&raw, &configs);

        assert_eq!(record.len(), 4);
        assert!(record.values().all(FieldValue::is_null));
    }

    #[test]
    fn test_flatten_transformation() {
        let raws = vec![
            json!({"Parent": {"Child": "value1"}, "OtherField": "a"}),
            json!({"Parent": {"Child": "value2"}, "OtherField": "b"}),
            json!({"Parent": null, "OtherField": "c"}),
        ];
        let configs = vec![
            FieldConfig::text("nested_field", "Parent.Child", "Nested Field").flattened(),
            FieldConfig::text("other_field", "OtherField", "Other"),
        ];

        let records = map_records(&raws, &configs);

        let nested: Vec<_> = records.iter().map(|r| r["nested_field"].clone()).collect();
        assert_eq!(
            nested,
            vec![
                FieldValue::Text("value1".to_string()),
                FieldValue::Text("value2".to_string()),
                FieldValue::Null,
            ]
        );
        assert!(records.iter().all(|r| !r.contains_key("Parent")));
    }

    #[test]
    fn test_static_field_ignores_source() {
        let configs = vec![
            FieldConfig::text("agol_field", "sf_field", "Field"),
            FieldConfig::fixed("static_field", "Static", "constant"),
        ];

        for raw in [json!({"sf_field": "a"}), json!({"static_field": "other"}), json!({})] {
            let record = map_record(&raw, &configs);
            assert_eq!(record["static_field"], FieldValue::Text("constant".to_string()));
        }
    }

    #[test]
    fn test_integer_conversion() {
        let configs = vec![FieldConfig::integer("COUNT", "Count__c", "Count")];

        let cases = [
            (json!({"Count__c": "12"}), FieldValue::Integer(12)),
            (json!({"Count__c": "abc"}), FieldValue::Null),
            (json!({"Count__c": ""}), FieldValue::Null),
            (json!({"Count__c": 1000.0}), FieldValue::Integer(1000)),
            (json!({"Count__c": 12.7}), FieldValue::Integer(12)),
            (json!({"Count__c": " 7 "}), FieldValue::Integer(7)),
            (json!({"Count__c": null}), FieldValue::Null),
            (json!({"Count__c": true}), FieldValue::Null),
        ];

        for (raw, expected) in cases {
            assert_eq!(map_record(&raw, &configs)["COUNT"], expected, "input {}", raw);
        }
    }

    #[test]
    fn test_float_conversion() {
        assert_eq!(to_float(&json!("2.5")), Some(2.5));
        assert_eq!(to_float(&json!(3)), Some(3.0));
        assert_eq!(to_float(&json!("NaN")), None);
        assert_eq!(to_float(&json!("deep")), None);
    }

    #[test]
    fn test_date_conversion() {
        let midnight = Utc.with_ymd_and_hms(2021, 3, 4, 0, 0, 0).unwrap();
        assert_eq!(to_date(&json!("2021-03-04")), Some(midnight));

        let datetime = Utc.with_ymd_and_hms(2021, 3, 4, 17, 30, 0).unwrap();
        assert_eq!(to_date(&json!("2021-03-04T17:30:00.000+0000")), Some(datetime));
        assert_eq!(to_date(&json!("2021-03-04T10:30:00-07:00")), Some(datetime));
        assert_eq!(to_date(&json!(1614816000000i64)), Some(midnight));

        assert_eq!(to_date(&json!("03/04/2021")), None);
        assert_eq!(to_date(&json!(false)), None);
    }

    #[test]
    fn test_text_conversion() {
        assert_eq!(to_text(&json!(123)), "123");
        assert_eq!(to_text(&json!("text")), "text");
        assert_eq!(to_text(&json!(true)), "True");
        assert_eq!(to_text(&json!(1000.0)), "1000.0");

        let configs = vec![FieldConfig::text("text_field", "mixed_field", "Text")];
        let record = map_record(&json!({"mixed_field": null}), &configs);
        assert_eq!(record["text_field"], FieldValue::Null);
    }

    #[test]
    fn test_composite_field_creation() {
        let configs = vec![
            FieldConfig::text("first", "First__c", "First"),
            FieldConfig::text("last", "Last__c", "Last"),
            FieldConfig::composite(
                "full_name",
                "Full Name",
                CompositeRule::Template("{first} {last}".to_string()),
            ),
        ];

        let raws = vec![
            json!({"First__c": "John", "Last__c": "Doe"}),
            json!({"First__c": "Jane", "Last__c": "Smith"}),
        ];
        let names: Vec<_> = map_records(&raws, &configs)
            .into_iter()
            .map(|r| r["full_name"].clone())
            .collect();

        assert_eq!(
            names,
            vec![
                FieldValue::Text("John Doe".to_string()),
                FieldValue::Text("Jane Smith".to_string()),
            ]
        );
    }

    #[test]
    fn test_composite_unknown_placeholder_is_null() {
        let configs = vec![FieldConfig::composite(
            "label",
            "Label",
            CompositeRule::Template("{nope}".to_string()),
        )];
        assert_eq!(map_record(&json!({}), &configs)["label"], FieldValue::Null);
    }

    #[test]
    fn test_render_template_falls_back_to_raw_and_escapes() {
        let mapped = Default::default();
        let raw = json!({"Name": "T-1", "Blank": null});
        assert_eq!(
            render_template("{{{Name}}}{Blank}", &mapped, &raw),
            Some("{T-1}".to_string())
        );
        assert_eq!(render_template("{Name", &mapped, &raw), None);
    }

    #[test]
    fn test_unmatched_closing_brace_is_rejected() {
        let mapped = Default::default();
        let raw = json!({"Name": "T-1"});
        assert_eq!(render_template("a}b", &mapped, &raw), None);
        assert_eq!(render_template("{Name}}", &mapped, &raw), None);

        let configs = vec![FieldConfig::composite(
            "label",
            "Label",
            CompositeRule::Template("{Name} }".to_string()),
        )];
        assert_eq!(map_record(&raw, &configs)["label"], FieldValue::Null);
    }

    #[test]
    fn test_column_ordering_matches_field_configs() {
        let raw = json!({"field_z": 1, "field_a": 2, "field_m": 3});
        let configs = vec![
            FieldConfig::integer("a", "field_a", "A"),
            FieldConfig::integer("m", "field_m", "M"),
            FieldConfig::integer("z", "field_z", "Z"),
        ];

        let record = map_record(&raw, &configs);

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "m", "z"]);
    }
}
