use insta::assert_snapshot;
use rstest::rstest;

use fluxml::output::Parameters;
use fluxml::{Attribute, Document, ErrorKind};

fn compact(doc: &Document) -> String {
    doc.root().to_text(&Parameters::compact())
}

#[test]
fn test_set_attr_replaces_in_place() {
    let doc = Document::parse(r#"<a x="1" y="2"/>"#).unwrap();
    doc.root().set_attr("x", 3).unwrap().set_attr("z", true).unwrap();
    assert_snapshot!(compact(&doc), @r###"<a x="3" y="2" z="true" />"###);
}

#[test]
fn test_set_attribute() {
    let doc = Document::new("a").unwrap();
    doc.root()
        .set_attribute(&Attribute::new("ratio", 0.5f64))
        .unwrap();
    assert_eq!(doc.root().attr("ratio").value().as_f64().unwrap(), 0.5);
}

#[test]
fn test_set_attr_invalid_arguments() {
    let doc = Document::new("a").unwrap();
    let root = doc.root();
    assert_eq!(
        root.set_attr("", "x").unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        root.set_attr("x", None::<String>).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        root.try_child("missing").set_attr("x", 1).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn test_remove_attrs() {
    let doc = Document::parse(r#"<a p="1" q="2" r="3" s="4"/>"#).unwrap();
    let root = doc.root();
    root.remove_attr("p")
        .remove_attr("missing")
        .remove_attrs_named(&["q", "nope"])
        .remove_attribute(&Attribute::new("s", "whatever"));
    assert_eq!(root.attr_names(), vec!["r"]);
    root.remove_attrs_where(|a| a.name() == "r");
    assert!(root.attrs().is_empty());
}

#[test]
fn test_placeholder_removals_are_noops() {
    let doc = Document::new("a").unwrap();
    let missing = doc.root().try_child("missing");
    assert_eq!(missing.remove_attr("x"), missing);
    assert_eq!(missing.remove_children().unwrap(), missing);
}

#[test]
fn test_append_copies_and_returns_copy() {
    let doc = Document::parse(r#"<r><a k="1"><b/></a><c/></r>"#).unwrap();
    let root = doc.root();
    let a = root.child("a").unwrap();
    let c = root.child("c").unwrap();
    let copy = c.append(&a).unwrap();
    assert_ne!(copy, a);
    assert_eq!(copy.parent().unwrap(), c);
    assert_snapshot!(compact(&doc), @r###"<r><a k="1"><b /></a><c><a k="1"><b /></a></c></r>"###);
}

#[test]
fn test_append_placeholder_is_noop() {
    let doc = Document::parse("<r><a/></r>").unwrap();
    let root = doc.root();
    let result = root.append(&root.try_child("missing")).unwrap();
    assert_eq!(result, root);
    assert_eq!(root.children().len(), 1);
}

#[test]
fn test_append_to_placeholder_fails() {
    let doc = Document::parse("<r><a/></r>").unwrap();
    let root = doc.root();
    let a = root.child("a").unwrap();
    let err = root.try_child("missing").append(&a).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_append_from_other_document() {
    let source = Document::parse(r#"<s><x:item x:n="1">text</x:item></s>"#).unwrap();
    let target = Document::new("t").unwrap();
    let item = source.root().child("x:item").unwrap();
    target.root().append(&item).unwrap();
    assert_snapshot!(compact(&target), @r###"<t><x:item x:n="1">text</x:item></t>"###);
    // the source is untouched
    assert!(source.root().child("x:item").is_ok());
}

#[test]
fn test_append_root_to_itself() {
    let doc = Document::parse("<r><a/></r>").unwrap();
    let root = doc.root();
    root.append(&root).unwrap();
    assert_snapshot!(compact(&doc), @"<r><a /><r><a /></r></r>");
}

#[test]
fn test_add_child() {
    let doc = Document::new("r").unwrap();
    let child = doc.root().add_child("a").unwrap();
    child.set_text("x").unwrap();
    assert_snapshot!(compact(&doc), @"<r><a>x</a></r>");
    assert_eq!(
        doc.root().add_child("").unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn test_copy_to_returns_self() {
    let doc = Document::parse("<r><a/><b/></r>").unwrap();
    let a = doc.root().child("a").unwrap();
    let b = doc.root().child("b").unwrap();
    let result = a.copy_to(&b).unwrap();
    assert_eq!(result, a);
    assert_snapshot!(compact(&doc), @"<r><a /><b><a /></b></r>");
}

#[test]
fn test_copy_to_placeholders() {
    let doc = Document::parse("<r><a/></r>").unwrap();
    let a = doc.root().child("a").unwrap();
    let missing = doc.root().try_child("missing");
    assert_eq!(
        missing.copy_to(&a).unwrap_err().kind(),
        ErrorKind::UnsupportedOperation
    );
    assert_eq!(
        a.copy_to(&missing).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn test_move_to_keeps_identity() {
    let doc = Document::parse("<r><a><x/></a><b/></r>").unwrap();
    let a = doc.root().child("a").unwrap();
    let b = doc.root().child("b").unwrap();
    let moved = a.move_to(&b).unwrap();
    assert_eq!(moved, a);
    assert_eq!(a.parent().unwrap(), b);
    assert_snapshot!(compact(&doc), @"<r><b><a><x /></a></b></r>");
}

#[test]
fn test_move_to_other_document() {
    let source = Document::parse("<s><a>1</a><b/></s>").unwrap();
    let target = Document::new("t").unwrap();
    let a = source.root().child("a").unwrap();
    let moved = a.move_to(&target.root()).unwrap();
    assert_eq!(moved.parent().unwrap(), target.root());
    assert_snapshot!(compact(&source), @"<s><b /></s>");
    assert_snapshot!(compact(&target), @"<t><a>1</a></t>");
}

#[test]
fn test_move_to_invalid() {
    let doc = Document::parse("<r><a><b/></a></r>").unwrap();
    let root = doc.root();
    let a = root.child("a").unwrap();
    let b = a.child("b").unwrap();
    assert_eq!(
        root.move_to(&b).unwrap_err().kind(),
        ErrorKind::UnsupportedOperation
    );
    assert_eq!(
        a.move_to(&b).unwrap_err().kind(),
        ErrorKind::UnsupportedOperation
    );
    assert_eq!(
        root.try_child("missing").move_to(&a).unwrap_err().kind(),
        ErrorKind::UnsupportedOperation
    );
    assert_eq!(
        b.move_to(&root.try_child("missing")).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    // nothing changed
    assert_snapshot!(compact(&doc), @"<r><a><b /></a></r>");
}

#[test]
fn test_remove_returns_parent() {
    let doc = Document::parse("<r><a><b/></a></r>").unwrap();
    let a = doc.root().child("a").unwrap();
    let b = a.child("b").unwrap();
    let parent = b.remove().unwrap();
    assert_eq!(parent, a);
    assert!(a.children().is_empty());
}

#[test]
fn test_remove_root_fails() {
    let doc = Document::parse("<r><a/></r>").unwrap();
    let err = doc.root().remove().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}

#[test]
fn test_remove_twice_fails() {
    let doc = Document::parse("<r><a/></r>").unwrap();
    let a = doc.root().child("a").unwrap();
    a.remove().unwrap();
    assert_eq!(a.remove().unwrap_err().kind(), ErrorKind::UnsupportedOperation);
    assert_eq!(a.parent().unwrap_err().kind(), ErrorKind::UnsupportedOperation);
}

#[test]
fn test_remove_merges_text() {
    let doc = Document::parse("<r>one <b>two</b> three</r>").unwrap();
    doc.root().child("b").unwrap().remove().unwrap();
    assert_eq!(doc.root().text().as_str().unwrap(), "one three");
}

#[test]
fn test_remove_children_keeps_text() {
    let doc = Document::parse("<r>t<a/><b/><!--c--><a/></r>").unwrap();
    doc.root().remove_children().unwrap();
    assert_snapshot!(compact(&doc), @"<r>t<!--c--></r>");
}

#[test]
fn test_remove_children_named() {
    let doc = Document::parse("<r><a/><b/><a/></r>").unwrap();
    doc.root().remove_children_named("a").unwrap();
    assert_snapshot!(compact(&doc), @"<r><b /></r>");
}

#[test]
fn test_remove_children_where_removes_name_groups() {
    let doc = Document::parse(r#"<r><a/><b/><a drop="yes"/><c/></r>"#).unwrap();
    doc.root()
        .remove_children_where(|n| n.attr("drop").exists())
        .unwrap();
    assert_snapshot!(compact(&doc), @"<r><b /><c /></r>");
}

#[test]
fn test_set_text_replaces_content() {
    let doc = Document::parse("<r>old<a/>more</r>").unwrap();
    doc.root().set_text("new & improved").unwrap();
    assert_snapshot!(compact(&doc), @"<r>new &amp; improved</r>");
    doc.root().set_text("").unwrap();
    assert_snapshot!(compact(&doc), @"<r />");
}

#[test]
fn test_set_text_invalid() {
    let doc = Document::new("r").unwrap();
    assert_eq!(
        doc.root().set_text(None::<&str>).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        doc.root().try_child("x").set_text("a").unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[rstest]
#[case("b c")]
#[case("1<x")]
#[case("a=b")]
#[case("-a")]
fn test_invalid_names_rejected(#[case] name: &str) {
    let doc = Document::new("a").unwrap();
    let root = doc.root();
    assert_eq!(
        root.set_attr(name, "1").unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        root.add_child(name).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        Document::new(name).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    insta::allow_duplicates! {
        assert_snapshot!(compact(&doc), @"<a />");
    }
}

#[test]
fn test_non_xml_characters_rejected() {
    let doc = Document::new("a").unwrap();
    let root = doc.root();
    assert_eq!(
        root.set_text("x\u{1}y").unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        root.set_attr("b", "\u{FFFF}").unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_snapshot!(compact(&doc), @"<a />");
}

#[test]
fn test_edits_serialize_to_parseable_markup() {
    let doc = Document::new("x:a").unwrap();
    let root = doc.root();
    root.set_attr("x:b", "<\"&\">\t\r\n").unwrap();
    root.add_child("\u{e9}l\u{e9}ment")
        .unwrap()
        .set_text("a\r\nb & c")
        .unwrap();

    let reparsed = Document::parse(&doc.to_text(&Parameters::compact())).unwrap();
    let root = reparsed.root();
    assert_eq!(
        root.attr("x:b").value().as_str().unwrap(),
        "<\"&\">\t\r\n"
    );
    assert_eq!(
        root.child("\u{e9}l\u{e9}ment").unwrap().text().as_str().unwrap(),
        "a b & c"
    );
}
