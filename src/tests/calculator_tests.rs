use super::{item, roster};
use crate::core::calculator::calculate_splits;
use crate::core::models::Item;

#[test]
fn test_pizza_and_soda_split() {
    let _ = env_logger::try_init();
    let items = vec![item("Pizza", 30.0, &["Alice", "Bob"]), item("Soda", 6.0, &["Alice"])];

    let split = calculate_splits(&items, &roster());

    assert_eq!(split.total_bill, 36.0);
    assert_eq!(split.total_for("Alice"), Some(21.0));
    assert_eq!(split.total_for("Bob"), Some(15.0));
    assert_eq!(split.total_for("John"), Some(0.0));
    assert!(split.is_balanced());

    let alice = &split.members[0];
    assert_eq!(alice.member, "Alice");
    assert_eq!(alice.item_splits, "Pizza=$15.00, Soda=$6.00");
    assert_eq!(split.members[2].item_splits, "");

    assert_eq!(split.itemized[0].split_price, 15.0);
    assert_eq!(split.itemized[0].members, vec!["Alice", "Bob"]);
}

#[test]
fn test_every_roster_member_has_an_entry() {
    let split = calculate_splits(&[], &roster());
    assert_eq!(split.members.len(), 3);
    assert_eq!(split.total_bill, 0.0);
    assert!(split.members.iter().all(|m| m.total == 0.0));
}

#[test]
fn test_unassigned_item_counts_toward_bill_only() {
    let items = vec![item("Salad", 9.0, &[]), item("Tea", 3.0, &["John"])];

    let split = calculate_splits(&items, &roster());

    assert_eq!(split.total_bill, 12.0);
    assert_eq!(split.unassigned_total, 9.0);
    assert_eq!(split.members_total(), 3.0);
    assert_eq!(split.discrepancy(), 9.0);
    assert!(!split.is_balanced());
    assert_eq!(split.itemized[0].split_price, 9.0);
    assert!(split.itemized[0].members.is_empty());
}

#[test]
fn test_member_totals_sum_to_bill_when_all_assigned() {
    let items = vec![
        item("Wine", 47.0, &["Alice", "Bob", "John"]),
        item("Fries", 7.3, &["Bob", "John"]),
        item("Cake", 11.11, &["Alice"]),
    ];

    let split = calculate_splits(&items, &roster());

    assert!((split.members_total() - split.total_bill).abs() < 0.01);
    assert_eq!(split.unassigned_total, 0.0);
}

#[test]
fn test_assignee_outside_roster_is_appended() {
    let mut guest = Item::new("Beer", 10.0, &roster());
    guest.members.insert("Guest".to_string(), true);
    guest.members.insert("Bob".to_string(), true);

    let split = calculate_splits(&[guest], &roster());

    assert_eq!(split.members.len(), 4);
    assert_eq!(split.members[3].member, "Guest");
    assert_eq!(split.total_for("Guest"), Some(5.0));
    assert_eq!(split.total_for("Bob"), Some(5.0));
}

#[test]
fn test_negative_and_non_finite_prices_count_as_zero() {
    let refund = Item {
        name: "Refund".to_string(),
        price: -12.0,
        members: [("Alice".to_string(), true)].into_iter().collect(),
    };
    let broken = Item {
        name: "Broken".to_string(),
        price: f64::INFINITY,
        members: Default::default(),
    };
    let items = vec![refund, broken, item("Tea", 3.0, &["Bob"])];

    let split = calculate_splits(&items, &roster());

    assert_eq!(split.total_bill, 3.0);
    assert_eq!(split.unassigned_total, 0.0);
    assert_eq!(split.total_for("Alice"), Some(0.0));
    assert_eq!(split.total_for("Bob"), Some(3.0));
    assert!(split.itemized.iter().all(|i| i.price >= 0.0 && i.split_price >= 0.0));
}
