use ariadne::Fmt;
use disc_attrs::ErrorKind;
use disc_error::{Error, ErrorKind, EXPR};

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a momentum operator", name),
    labels = ["this symbol"],
    help = format!("use one of {}", "k_x, k_y, k_z".fg(EXPR)),
)]
struct NotAnOperator {
    name: String,
}

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "something went wrong")]
struct Plain;

fn render(error: &Error, source: &str) -> String {
    let rendered = error.render("input", source);
    String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap()
}

#[test]
fn message_uses_fields() {
    let error = Error::new(vec![4..7], NotAnOperator { name: "k_w".to_string() });
    assert_eq!(error.to_string(), "`k_w` is not a momentum operator");
}

#[test]
fn report_contains_label_and_help() {
    let error = Error::new(vec![4..7], NotAnOperator { name: "k_w".to_string() });
    let report = render(&error, "2 * k_w");
    assert!(report.contains("`k_w` is not a momentum operator"));
    assert!(report.contains("this symbol"));
    assert!(report.contains("k_x, k_y, k_z"));
}

#[test]
fn report_without_spans() {
    let error = Error::without_span(Plain);
    let report = render(&error, "k_x");
    assert!(report.contains("something went wrong"));
}

#[test]
fn downcast_kind() {
    let error = Error::without_span(Plain).or_span(0..3);
    assert_eq!(error.spans, vec![0..3]);
    assert!(error.is::<Plain>());
    assert!(!error.is::<NotAnOperator>());
    assert_eq!(error.downcast_ref::<Plain>(), Some(&Plain));
}
