use rstest::rstest;

use fluxml::output::Parameters;
use fluxml::Document;

fn compact(xml: &str) -> String {
    Document::parse(xml)
        .unwrap()
        .root()
        .to_text(&Parameters::compact())
}

#[rstest]
#[case("<a />")]
#[case(r#"<a z="1" b="2" m="3" />"#)]
#[case("<a>text</a>")]
#[case("<a><b /><c>x</c></a>")]
#[case("<a>t &lt; &amp; &gt;</a>")]
#[case(r#"<a q="&quot;x&quot; &lt;y&gt;" />"#)]
#[case("<a><!--note--><?target data?></a>")]
#[case("<x:a x:b=\"1\"><x:c /></x:a>")]
fn test_compact_round_trip(#[case] xml: &str) {
    assert_eq!(compact(xml), xml);
}

#[rstest]
#[case("<a/>", "<a />")]
#[case("<a></a>", "<a />")]
#[case("<a>  </a>", "<a />")]
#[case("<a>\n  <b/>\n</a>", "<a><b /></a>")]
#[case("<a><![CDATA[<raw>]]></a>", "<a>&lt;raw&gt;</a>")]
#[case("<a>&#65;&#x42;</a>", "<a>AB</a>")]
#[case("<a b='single'/>", r#"<a b="single" />"#)]
fn test_compact_normalizes(#[case] xml: &str, #[case] expected: &str) {
    assert_eq!(compact(xml), expected);
}

#[test]
fn test_standard_output_reparses_equal() {
    let xml = r#"<config><db host="h"><pool size="4"/></db><name>svc</name></config>"#;
    let doc = Document::parse(xml).unwrap();
    let standard = doc.to_text(&Parameters::default());
    let reparsed = Document::parse(&standard).unwrap();
    assert_eq!(
        reparsed.root().to_text(&Parameters::compact()),
        doc.root().to_text(&Parameters::compact())
    );
}

#[test]
fn test_edit_then_round_trip() {
    let doc = Document::parse(r#"<settings><user name="a"/></settings>"#).unwrap();
    let root = doc.root();
    root.child("user").unwrap().set_attr("admin", true).unwrap();
    root.add_child("theme").unwrap().set_text("dark").unwrap();

    let reparsed = Document::parse(&doc.to_text(&Parameters::default())).unwrap();
    let reparsed_root = reparsed.root();
    assert!(reparsed_root
        .child("user")
        .unwrap()
        .attr("admin")
        .value()
        .as_bool()
        .unwrap());
    assert_eq!(
        reparsed_root.child("theme").unwrap().text().as_str().unwrap(),
        "dark"
    );
}

#[test]
fn test_carriage_return_reference_round_trips() {
    let xml = "<a xml:space=\"preserve\">x&#13;y\r\nz</a>";
    let serialized = compact(xml);
    assert_eq!(serialized, "<a xml:space=\"preserve\">x&#xD;y\nz</a>");
    assert_eq!(compact(&serialized), serialized);
}

#[test]
fn test_attribute_line_ends() {
    let doc = Document::parse("<a b=\"x\r\ny\" c=\"x&#13;&#10;y\"/>").unwrap();
    assert_eq!(doc.root().attr("b").value().as_str().unwrap(), "x y");
    assert_eq!(doc.root().attr("c").value().as_str().unwrap(), "x\r\ny");
}
