use std::collections::BTreeMap;

use crate::core::models::{ExpenseRequest, RawPrice, RemoteExpense, RemoteExpenseUser, round_cents};

fn request(splits: &[(&str, f64)], total: f64, payer: &str) -> ExpenseRequest {
    ExpenseRequest {
        splits: splits.iter().map(|(m, a)| (m.to_string(), *a)).collect::<BTreeMap<_, _>>(),
        paid_user: payer.to_string(),
        total_amt: total,
        group_id: "Flatmates".to_string(),
        description: "Dinner".to_string(),
        comment: String::new(),
    }
}

#[test]
fn test_shares_put_payer_first_and_skip_zero() {
    let shares = request(&[("Alice", 21.0), ("Bob", 15.0), ("John", 0.0)], 36.0, "Bob").shares();

    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].member, "Bob");
    assert_eq!(shares[0].paid_share, 36.0);
    assert_eq!(shares[0].owed_share, 15.0);
    assert_eq!(shares[1].member, "Alice");
    assert_eq!(shares[1].paid_share, 0.0);
    assert_eq!(shares[1].owed_share, 21.0);
}

#[test]
fn test_rounding_difference_goes_to_payer() {
    let third = 10.0 / 3.0;
    let shares = request(&[("Alice", third), ("Bob", third), ("John", third)], 10.0, "Alice").shares();

    let owed: f64 = shares.iter().map(|s| s.owed_share).sum();
    assert!((owed - 10.0).abs() < 1e-9);
    assert_eq!(shares[0].member, "Alice");
    assert!((shares[0].owed_share - 3.34).abs() < 1e-9);
    assert_eq!(round_cents(shares[1].owed_share), 3.33);
}

#[test]
fn test_payer_with_nothing_owed_still_listed() {
    let shares = request(&[("Alice", 5.0)], 5.0, "John").shares();
    assert_eq!(shares[0].member, "John");
    assert_eq!(shares[0].paid_share, 5.0);
    assert_eq!(shares[0].owed_share, 0.0);
    assert_eq!(shares.len(), 2);
}

#[test]
fn test_remote_expense_payer() {
    let expense = RemoteExpense {
        description: "Dinner".to_string(),
        cost: "36.00".to_string(),
        comment: None,
        group_name: None,
        users: vec![
            RemoteExpenseUser {
                first_name: "Alice".to_string(),
                paid_share: "0.0".to_string(),
                owed_share: "21.0".to_string(),
            },
            RemoteExpenseUser {
                first_name: "Bob".to_string(),
                paid_share: "36.0".to_string(),
                owed_share: "15.0".to_string(),
            },
        ],
    };
    assert_eq!(expense.payer(), Some("Bob"));
}

#[test]
fn test_raw_price_accepts_numbers_and_text() {
    assert_eq!(RawPrice::Amount(4.5).amount(), 4.5);
    assert_eq!(RawPrice::Amount(-1.0).amount(), 0.0);
    assert_eq!(RawPrice::Text("$12.50".to_string()).amount(), 12.5);
    assert_eq!(RawPrice::Text("two".to_string()).amount(), 0.0);

    let parsed: RawPrice = serde_json::from_str("\"3*2\"").unwrap();
    assert_eq!(parsed.amount(), 6.0);
}
