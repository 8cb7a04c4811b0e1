use super::*;

fn assign_vocabulary() -> Vocabulary {
    Vocabulary::new(
        vec![None, Some("'='".into()), Some("';'".into()), None, None],
        vec![None, None, None, Some("ID".into()), Some("INT".into())],
    )
}

#[test]
fn max_token_type_counts_named_slots() {
    assert_eq!(assign_vocabulary().max_token_type(), 4);
    assert_eq!(Vocabulary::default().max_token_type(), 0);
    assert_eq!(Vocabulary::new(vec![], vec![]).max_token_type(), 0);
}

#[test]
fn display_name_prefers_literal() {
    let v = assign_vocabulary();
    assert_eq!(v.display_name(1), "'='");
    assert_eq!(v.display_name(3), "ID");
    assert_eq!(v.display_name(EOF), "EOF");
    assert_eq!(v.display_name(42), "42");
}

#[test]
fn lookup_by_either_name() {
    let v = assign_vocabulary();
    assert_eq!(v.token_type("INT"), Some(4));
    assert_eq!(v.token_type("';'"), Some(2));
    assert_eq!(v.token_type("EOF"), Some(EOF));
    assert_eq!(v.token_type("nope"), None);
}

#[test]
fn negative_types_have_no_literal() {
    let v = assign_vocabulary();
    assert_eq!(v.literal_name(-5), None);
    assert_eq!(v.symbolic_name(EOF), Some("EOF"));
}

#[test]
fn uneven_tables_are_padded() {
    let v = Vocabulary::new(vec![None, Some("'x'".into())], vec![None, None, Some("B".into())]);
    assert_eq!(v.max_token_type(), 2);
    assert_eq!(v.display_name(2), "B");
}
