use xmlpick::{decode, encode, extract, extract_with_report, label, Mapping, Node, Path, SelectionSet};

fn catalog() -> Node {
    let book = |title: &str, price: &str| -> Node {
        Node::Mapping([("title", Node::from(title)), ("price", Node::from(price))].into_iter().collect())
    };
    let books = Node::from(vec![book("A", "10"), book("B", "20")]);
    let catalog: Mapping = [("book", books)].into_iter().collect();
    Node::Mapping([("catalog", Node::Mapping(catalog))].into_iter().collect())
}

fn select(paths: &[&str]) -> Result<SelectionSet, xmlpick::Error> {
    SelectionSet::parse_all(paths.iter().copied())
}

#[test]
fn test_single_indexed_leaf_keeps_position() -> Result<(), Box<dyn std::error::Error>> {
    let tree = catalog();
    let picked = extract(&tree, &select(&["catalog.book[1].title"])?);

    let books = picked
        .as_mapping()
        .and_then(|m| m.get("catalog"))
        .and_then(Node::as_mapping)
        .and_then(|m| m.get("book"))
        .and_then(Node::as_sequence)
        .ok_or("book sequence missing")?;

    assert_eq!(books.len(), 2);
    assert_eq!(books.present_len(), 1);
    assert_eq!(books.get(0), None);
    let title: Mapping = [("title", Node::from("B"))].into_iter().collect();
    assert_eq!(books.get(1), Some(&Node::Mapping(title)));
    Ok(())
}

#[test]
fn test_label_of_source_item() -> Result<(), Box<dyn std::error::Error>> {
    let tree = catalog();
    let first = tree
        .as_mapping()
        .and_then(|m| m.get("catalog"))
        .and_then(Node::as_mapping)
        .and_then(|m| m.get("book"))
        .and_then(Node::as_sequence)
        .and_then(|s| s.get(0))
        .ok_or("first book missing")?;
    assert_eq!(label(first, 0), "title: A");
    Ok(())
}

#[test]
fn test_out_of_range_index_fabricates_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let tree = catalog();
    let selection = select(&["catalog.book[5].title"])?;
    let report = extract_with_report(&tree, &selection);

    assert_eq!(report.tree, Node::default());
    assert!(report.resolved.is_empty());
    assert_eq!(report.skipped, vec![Path::parse("catalog.book[5].title")?]);
    Ok(())
}

#[test]
fn test_container_selection_is_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let tree = catalog();
    let picked = extract(&tree, &select(&["catalog"])?);
    assert_eq!(picked, tree);

    let picked = extract(&tree, &select(&["catalog.book"])?);
    assert_eq!(picked, tree);
    Ok(())
}

#[test]
fn test_unresolved_path_leaves_others_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let tree = catalog();
    let alone = extract(&tree, &select(&["catalog.book[0].price"])?);
    let mixed = extract(
        &tree,
        &select(&["catalog.book[0].price", "catalog.missing", "catalog.book[0].price.deeper", "nowhere"])?,
    );
    assert_eq!(alone, mixed);
    Ok(())
}

#[test]
fn test_decode_extract_encode() -> Result<(), Box<dyn std::error::Error>> {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<catalog>
  <!-- two books -->
  <book id="b1"><title>A</title><price>10</price></book>
  <book id="b2"><title>B</title><price>20</price></book>
</catalog>"#;
    let tree = decode(xml)?;
    let picked = extract(&tree, &select(&["catalog.book[1].price", "catalog.book[0].id"])?);

    let expected = "\
<root>
  <catalog>
    <book>
      <id>b1</id>
    </book>
    <book>
      <price>20</price>
    </book>
  </catalog>
</root>";
    assert_eq!(encode(&picked), expected);
    Ok(())
}

#[test]
fn test_exported_text_decodes_again() -> Result<(), Box<dyn std::error::Error>> {
    let tree = decode("<shop><item><ad>Çay</ad><fiyat>5 &amp; 6</fiyat></item></shop>")?;
    let picked = extract(&tree, &select(&["shop.item.fiyat"])?);
    let again = decode(&encode(&picked))?;

    let fiyat = again
        .as_mapping()
        .and_then(|m| m.get("root"))
        .and_then(Node::as_mapping)
        .and_then(|m| m.get("shop"))
        .and_then(Node::as_mapping)
        .and_then(|m| m.get("item"))
        .and_then(Node::as_mapping)
        .and_then(|m| m.get("fiyat"));
    assert_eq!(fiyat, Some(&Node::from("5 & 6")));
    Ok(())
}
