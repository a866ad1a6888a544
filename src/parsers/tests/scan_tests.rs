use crate::classifier::{LinkCategory, LinkClassifier};
use crate::parsers::{PageLinks, scan_page};

const LISTING: &str = "https://encheres.example.fr/ventes";

#[test]
fn test_listing_scan_collects_sales_and_next() {
    let html = r##"
        <nav><a href="/ventes">Toutes les ventes</a></nav>
        <a href="/vente/1">Vente 1</a>
        <a href="/vente/1#lots">Vente 1 (lots)</a>
        <a href="https://encheres.example.fr/vente/2">Vente 2</a>
        <a href="/lot/9">Lot</a>
        <a href="">vide</a>
        <a rel="next" href="?page=2">Suivant</a>
    "##;
    let page = scan_page(html, LISTING, LinkCategory::Sale, &LinkClassifier::default(), true);

    assert_eq!(
        page.links,
        vec![
            "https://encheres.example.fr/vente/1",
            "https://encheres.example.fr/vente/1",
            "https://encheres.example.fr/vente/2",
        ]
    );
    assert_eq!(
        page.next.as_deref(),
        Some("https://encheres.example.fr/ventes?page=2")
    );
}

#[test]
fn test_sale_scan_collects_lots() {
    let html = r#"
        <a href="/lot/1">A</a>
        <a href="/lots/2">B</a>
        <a href="/catalogue/detail/lot-3">C</a>
        <a href="/vente/5">Autre vente</a>
    "#;
    let page = scan_page(
        html,
        "https://encheres.example.fr/vente/5",
        LinkCategory::Lot,
        &LinkClassifier::default(),
        true,
    );
    assert_eq!(
        page.links,
        vec![
            "https://encheres.example.fr/lot/1",
            "https://encheres.example.fr/lots/2",
            "https://encheres.example.fr/catalogue/detail/lot-3",
        ]
    );
    assert_eq!(page.next, None);
}

#[test]
fn test_malformed_html_is_tolerated() {
    let html = r#"<div><a href="/vente/1">Vente<p><a href="/vente/2"</div"#;
    let page = scan_page(html, LISTING, LinkCategory::Sale, &LinkClassifier::default(), true);
    assert!(
        page.links
            .contains(&"https://encheres.example.fr/vente/1".to_string())
    );
}

#[test]
fn test_empty_page() {
    let page = scan_page("", LISTING, LinkCategory::Sale, &LinkClassifier::default(), true);
    assert_eq!(page, PageLinks::default());
}

#[test]
fn test_next_link_skipped_when_not_followed() {
    let html = r#"<a href="/lot/1">A</a><a rel="next" href="/vente/5?page=2">Suivant</a>"#;
    let sale = "https://encheres.example.fr/vente/5";
    let classifier = LinkClassifier::default();

    let page = scan_page(html, sale, LinkCategory::Lot, &classifier, false);
    assert_eq!(page.links, vec!["https://encheres.example.fr/lot/1"]);
    assert_eq!(page.next, None);

    let page = scan_page(html, sale, LinkCategory::Lot, &classifier, true);
    assert_eq!(
        page.next.as_deref(),
        Some("https://encheres.example.fr/vente/5?page=2")
    );
}
