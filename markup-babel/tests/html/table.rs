use markup_babel::format::Format;
use markup_babel::formats::html::HtmlFormat;
use markup_babel::formats::markdown::MarkdownFormat;
use markup_babel::NodeKind;

#[test]
fn test_markdown_table_to_html() {
    let md = "| Header 1 | Header 2 |\n| :--- | :---: |\n| Cell 1 | Cell 2 |\n";

    let doc = MarkdownFormat::default()
        .parse(md)
        .expect("Failed to parse markdown");
    let html = HtmlFormat::default()
        .serialize(&doc)
        .expect("Failed to serialize html");

    assert!(html.starts_with("<table><tbody><tr><th><p>Header 1</p></th>"));
    assert!(html.contains("<td><p>Cell 2</p></td>"));
    assert!(!html.contains("colspan"));
}

#[test]
fn test_spanning_cells_survive() {
    let html = "<table><tr><td colspan=\"2\">wide</td></tr><tr><td>a</td><td>b</td></tr></table>";
    let doc = HtmlFormat::default().parse(html).unwrap();

    let table = &doc.content[0];
    assert_eq!(table.kind, NodeKind::Table);
    let wide = &table.content[0].content[0];
    assert_eq!(wide.attr_string("colspan").as_deref(), Some("2"));
    assert_eq!(wide.content[0].kind, NodeKind::Paragraph);

    let output = HtmlFormat::default().serialize(&doc).unwrap();
    assert!(output.contains("<td colspan=\"2\"><p>wide</p></td>"));
}
