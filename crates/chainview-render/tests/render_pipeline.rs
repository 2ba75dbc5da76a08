use chainview_core::chain::Blockchain;
use chainview_render::{render_document, BlockRecord, HtmlContainer};

#[test]
fn built_chain_renders_end_to_end() {
    let mut chain = Blockchain::new(1);
    chain.add_transaction("Alice", "Bob", 50);
    chain.add_transaction("Bob", "Charlie", 30);
    chain.add_block();
    chain.add_transaction("Charlie", "Alice", 20);
    chain.add_block();

    let exported = chain.to_json().unwrap();
    let records: Vec<BlockRecord> = serde_json::from_str(&exported).unwrap();
    let mut container = HtmlContainer::new("blockchain");
    render_document(&records, &mut container);

    assert_eq!(container.fragment_count(), 3);
    for (i, fragment) in container.fragments().iter().enumerate() {
        assert!(fragment.contains(&format!("<h3>Block #{i}</h3>")));
    }

    // Hashes display exactly as exported, and linkage text matches the chain.
    assert!(container.fragments()[2].contains(&format!(
        "<p><strong>Hash:</strong> {}</p>",
        chain.blocks()[2].hash
    )));
    assert!(container.fragments()[2].contains(&format!(
        "<p><strong>Previous Hash:</strong> {}</p>",
        chain.blocks()[1].hash
    )));

    // Transactions appear as their structural JSON text, keys in source order.
    assert!(container.fragments()[1]
        .contains(r#"{"sender":"Alice","recipient":"Bob","amount":50}"#));

    let page = container.into_page();
    assert!(page.contains(r#"<div id="blockchain">"#));
    assert!(page.contains("<h3>Block #2</h3>"));
}
