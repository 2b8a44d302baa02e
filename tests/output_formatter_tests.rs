use dynapart::{
    cli::{JsonHighlighter, OutputFormatter, ResultPrinter},
    engine::PageSink,
    utils::{
        config::RunConfig,
        error::DynapartError,
        types::{AttributeValue, Item},
    },
};
use std::collections::BTreeMap;
use std::time::Duration;

fn user(id: &str, age: &str) -> Item {
    let mut item = Item::new();
    item.insert("pk".to_string(), AttributeValue::S(id.to_string()));
    item.insert("age".to_string(), AttributeValue::N(age.to_string()));
    item
}

fn output(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_items_print_as_json_lines() {
    let config = RunConfig::for_statement("SELECT * FROM users");
    let mut printer = ResultPrinter::new(Vec::new(), Vec::new(), &config);

    printer.print_item(&user("u1", "30")).unwrap();
    printer.print_item(&user("u2", "41.5")).unwrap();

    assert_eq!(printer.item_count(), 2);
    let (out, err) = printer.into_inner();
    assert_eq!(
        output(out),
        "{\"age\":30,\"pk\":\"u1\"}\n{\"age\":41.5,\"pk\":\"u2\"}\n"
    );
    assert!(err.is_empty());
}

#[test]
fn test_nested_values_are_rendered() {
    let mut address = BTreeMap::new();
    address.insert("city".to_string(), AttributeValue::S("Oslo".to_string()));

    let mut item = Item::new();
    item.insert("address".to_string(), AttributeValue::M(address));
    item.insert(
        "tags".to_string(),
        AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]),
    );
    item.insert("photo".to_string(), AttributeValue::B(vec![1, 2, 3]));
    item.insert("active".to_string(), AttributeValue::Bool(true));
    item.insert("note".to_string(), AttributeValue::Null);

    let config = RunConfig::for_statement("SELECT * FROM users");
    let printer = ResultPrinter::new(Vec::new(), Vec::new(), &config);
    assert_eq!(
        printer.render_item(&item).unwrap(),
        r#"{"active":true,"address":{"city":"Oslo"},"note":null,"photo":"AQID","tags":["a","b"]}"#
    );
}

#[test]
fn test_verbose_numbers_items_on_stderr() {
    let config = RunConfig::for_statement("SELECT * FROM users").with_verbose(true);
    let mut printer = ResultPrinter::new(Vec::new(), Vec::new(), &config);

    printer.on_page(1, &[user("u1", "1"), user("u2", "2")]).unwrap();

    let (out, err) = printer.into_inner();
    assert_eq!(output(out).lines().count(), 2);
    assert_eq!(output(err), "[#1] [#2] ");
}

#[test]
fn test_numbering_can_be_disabled_in_verbose_mode() {
    let mut config = RunConfig::for_statement("SELECT * FROM users").with_verbose(true);
    config.number_items = false;
    let mut printer = ResultPrinter::new(Vec::new(), Vec::new(), &config);

    printer.print_item(&user("u1", "1")).unwrap();
    printer.print_info("execute statement: SELECT * FROM users").unwrap();

    let (_, err) = printer.into_inner();
    let err = output(err);
    assert!(!err.contains("[#1]"));
    assert!(err.contains("execute statement: SELECT * FROM users"));
}

#[test]
fn test_progress_is_silent_without_verbose() {
    let config = RunConfig::for_statement("SELECT * FROM users");
    let mut printer = ResultPrinter::new(Vec::new(), Vec::new(), &config);

    printer.on_progress("no more items").unwrap();

    let (_, err) = printer.into_inner();
    assert!(err.is_empty());
}

#[test]
fn test_highlighted_output_matches_highlighter() {
    let mut config = RunConfig::for_statement("SELECT * FROM users");
    config.colors = true;
    let mut printer = ResultPrinter::new(Vec::new(), Vec::new(), &config);

    printer.print_item(&user("u1", "7")).unwrap();

    let (out, _) = printer.into_inner();
    let expected = JsonHighlighter::new().highlight(r#"{"age":7,"pk":"u1"}"#);
    assert_eq!(output(out), format!("{}\n", expected));
}

#[test]
fn test_table_names_print_plain() {
    let mut config = RunConfig::for_statement("SHOW TABLES");
    config.colors = true;
    let mut printer = ResultPrinter::new(Vec::new(), Vec::new(), &config);

    printer
        .on_table_names(&["orders".to_string(), "users".to_string()])
        .unwrap();

    assert_eq!(printer.item_count(), 2);
    let (out, _) = printer.into_inner();
    assert_eq!(output(out), "orders\nusers\n");
}

#[test]
fn test_summary_goes_to_stderr() {
    let config = RunConfig::for_statement("SELECT * FROM users");
    let mut printer = ResultPrinter::new(Vec::new(), Vec::new(), &config);

    printer.print_item(&user("u1", "1")).unwrap();
    printer.print_summary(Duration::from_millis(250), false).unwrap();

    let (out, err) = printer.into_inner();
    assert_eq!(output(out).lines().count(), 1);
    assert_eq!(output(err), "returned 1 item in 250.00ms\n");
}

#[test]
fn test_unrenderable_number_fails_and_is_not_counted() {
    let config = RunConfig::for_statement("SELECT * FROM users");
    let mut printer = ResultPrinter::new(Vec::new(), Vec::new(), &config);

    let result = printer.print_item(&user("u1", "not-a-number"));

    assert!(matches!(result, Err(DynapartError::Conversion(_))));
    assert_eq!(printer.item_count(), 0);
}

#[test]
fn test_format_info_carries_message() {
    let line = OutputFormatter::format_info("hit max page 2");
    assert!(line.contains(">>>"));
    assert!(line.ends_with("hit max page 2"));
}
