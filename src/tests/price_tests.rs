use crate::core::price::{evaluate, parse_price};

#[test]
fn test_plain_numbers() {
    assert_eq!(parse_price("12.50"), 12.5);
    assert_eq!(parse_price(" $7 "), 7.0);
}

#[test]
fn test_arithmetic_expressions() {
    assert_eq!(parse_price("3*4.5"), 13.5);
    assert_eq!(parse_price("(10 + 2) / 4"), 3.0);
    assert_eq!(parse_price("2+3*4"), 14.0);
    assert_eq!(evaluate("-(2+3)"), Some(-5.0));
}

#[test]
fn test_invalid_input_becomes_zero() {
    assert_eq!(parse_price("abc"), 0.0);
    assert_eq!(parse_price(""), 0.0);
    assert_eq!(parse_price("3+"), 0.0);
    assert_eq!(parse_price("1/0"), 0.0);
    assert_eq!(parse_price("2-5"), 0.0);
}

#[test]
fn test_deeply_nested_input_becomes_zero() {
    assert_eq!(parse_price(&"(".repeat(30_000)), 0.0);
    assert_eq!(parse_price(&format!("{}1", "-".repeat(200_000))), 0.0);
    assert_eq!(parse_price(&format!("{}5{}", "(".repeat(100), ")".repeat(100))), 0.0);
}

#[test]
fn test_moderate_nesting_still_evaluates() {
    assert_eq!(parse_price("((((2))))"), 2.0);
    assert_eq!(parse_price("--3"), 3.0);
    assert_eq!(parse_price(&format!("{}5{}", "(".repeat(60), ")".repeat(60))), 5.0);
}
