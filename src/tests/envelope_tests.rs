use crate::core::envelope::{CommentEnvelope, EnvelopeItem, LEGACY_MARKER, decode, encode};

fn sample_items() -> Vec<EnvelopeItem> {
    vec![
        EnvelopeItem {
            name: "Pizza".to_string(),
            price: 30.0,
            members: vec!["Alice".to_string(), "Bob".to_string()],
        },
        EnvelopeItem {
            name: "Soda".to_string(),
            price: 6.5,
            members: vec!["Alice".to_string()],
        },
    ]
}

#[test]
fn test_encode_then_decode_recovers_note_and_items() {
    let _ = env_logger::try_init();
    let comment = encode("Dinner at Luigi's", &sample_items()).unwrap();

    let decoded = decode(&comment);

    assert_eq!(decoded.note, "Dinner at Luigi's");
    assert_eq!(decoded.items, sample_items());
}

#[test]
fn test_note_containing_markers_survives() {
    let note = "see ---ITEMDATA--- and\n---ITEMDATA:3---\nabc in here";
    let comment = encode(note, &sample_items()).unwrap();

    let decoded = decode(&comment);

    assert_eq!(decoded.note, note);
    assert_eq!(decoded.items, sample_items());
}

#[test]
fn test_empty_item_list_round_trips() {
    let comment = encode("", &[]).unwrap();
    assert_eq!(
        decode(&comment),
        CommentEnvelope {
            note: String::new(),
            items: vec![],
        }
    );
}

#[test]
fn test_non_finite_price_is_rejected() {
    let items = vec![EnvelopeItem {
        name: "Broken".to_string(),
        price: f64::NAN,
        members: vec![],
    }];
    assert!(encode("note", &items).is_err());
}

#[test]
fn test_legacy_marker_is_decoded() {
    let comment = format!(
        "Lunch\n{}\n[{{\"name\":\"Soup\",\"price\":4.5,\"members\":[\"John\"]}}]",
        LEGACY_MARKER
    );

    let decoded = decode(&comment);

    assert_eq!(decoded.note, "Lunch");
    assert_eq!(decoded.items.len(), 1);
    assert_eq!(decoded.items[0].name, "Soup");
    assert_eq!(decoded.items[0].members, vec!["John"]);
}

#[test]
fn test_malformed_payload_keeps_note_and_drops_items() {
    let comment = format!("Lunch\n{}\n[{{not json", LEGACY_MARKER);

    let decoded = decode(&comment);

    assert_eq!(decoded.note, "Lunch");
    assert!(decoded.items.is_empty());
}

#[test]
fn test_plain_comment_is_all_note() {
    let decoded = decode("Just a note");
    assert_eq!(decoded.note, "Just a note");
    assert!(decoded.items.is_empty());
}

#[test]
fn test_tag_with_wrong_length_is_not_trusted() {
    let comment = "Note\n---ITEMDATA:99---\n[]";
    let decoded = decode(comment);
    assert_eq!(decoded.note, comment);
    assert!(decoded.items.is_empty());
}

#[test]
fn test_negative_price_is_rejected_on_encode() {
    let items = vec![EnvelopeItem {
        name: "Refund".to_string(),
        price: -3.0,
        members: vec![],
    }];
    assert!(encode("note", &items).is_err());
}

#[test]
fn test_negative_price_in_comment_decodes_as_zero() {
    let comment = format!(
        "Lunch\n{}\n[{{\"name\":\"Soup\",\"price\":-3,\"members\":[\"John\"]}}]",
        LEGACY_MARKER
    );

    let decoded = decode(&comment);
    assert_eq!(decoded.items[0].price, 0.0);

    let roster = vec!["John".to_string()];
    let tampered = EnvelopeItem {
        name: "Soup".to_string(),
        price: -3.0,
        members: vec!["John".to_string()],
    };
    let item = tampered.to_item(&roster);
    assert_eq!(item.price, 0.0);
    assert!(item.is_assigned("John"));
}
