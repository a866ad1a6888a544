use crate::parsers::lot::{KeywordFilter, LotParser, TITLE_PLACEHOLDER};

const LOT_URL: &str = "https://encheres.example.fr/lot/42";

fn parser() -> LotParser {
    LotParser::new(KeywordFilter::new(r"\b(montre|montres|horlogerie)\b").unwrap())
}

#[cfg(test)]
mod keyword_tests {
    use super::*;

    #[test]
    fn test_title_alone_can_match() {
        let keywords = KeywordFilter::new(r"\b(montre|montres|horlogerie)\b").unwrap();
        assert!(keywords.matches("Montre Cartier", ""));
    }

    #[test]
    fn test_unrelated_lot_is_dropped() {
        let keywords = KeywordFilter::new(r"\b(montre|montres|horlogerie)\b").unwrap();
        assert!(!keywords.matches("Tableau", "peinture à l'huile"));
    }

    #[test]
    fn test_word_boundaries() {
        let keywords = KeywordFilter::new(r"\b(montre|montres|horlogerie)\b").unwrap();
        assert!(!keywords.matches("Démontrer", "remontrer"));
        assert!(keywords.matches("Lot divers", "Pièces d'HORLOGERIE anciennes"));
    }

    #[test]
    fn test_keyword_in_parsed_record() {
        let record = parser().parse(
            "<html><head><title>Site</title></head><body><h1>Montre Cartier</h1></body></html>",
            LOT_URL,
        );
        assert!(record.keep);
        assert_eq!(record.description, "");

        let record = parser().parse(
            r#"<h1>Tableau</h1><div class="description">peinture à l'huile</div>"#,
            LOT_URL,
        );
        assert!(!record.keep);
        assert_eq!(record.description, "peinture à l'huile");
    }
}

#[cfg(test)]
mod title_tests {
    use super::*;

    #[test]
    fn test_heading_priority() {
        let record = parser().parse(
            r#"<div class="lot-title">Class title</div><h2>Sub</h2><h1>Main</h1>"#,
            LOT_URL,
        );
        assert_eq!(record.title, "Main");
    }

    #[test]
    fn test_falls_back_to_document_title() {
        let record = parser().parse(
            "<html><head><title> Lot 42 | Enchères </title></head><body><h1>  </h1></body></html>",
            LOT_URL,
        );
        assert_eq!(record.title, "Lot 42 | Enchères");
    }

    #[test]
    fn test_placeholder_when_nothing_found() {
        let record = parser().parse("<html><body><p>rien</p></body></html>", LOT_URL);
        assert_eq!(record.title, TITLE_PLACEHOLDER);
        assert!(!record.keep);
    }
}

#[cfg(test)]
mod description_tests {
    use super::*;

    #[test]
    fn test_known_container_wins_over_paragraphs() {
        let long = "Un très long paragraphe de présentation qui dépasse largement le seuil fixé.";
        let html = format!(
            r#"<p>{long}</p><div class="lot-description"> Boîtier acier </div>"#
        );
        let record = parser().parse(&html, LOT_URL);
        assert_eq!(record.description, "Boîtier acier");
    }

    #[test]
    fn test_container_priority() {
        let record = parser().parse(
            r#"<div id="description">From id</div><div class="product-description">From class</div>"#,
            LOT_URL,
        );
        assert_eq!(record.description, "From class");
    }

    #[test]
    fn test_long_paragraph_fallback() {
        let long = "a".repeat(80);
        let short = "b".repeat(10);
        let html = format!("<h1>Lot</h1><p>{short}</p><p>{long}</p>");
        let record = parser().parse(&html, LOT_URL);
        assert_eq!(record.description, long);
    }

    #[test]
    fn test_description_keeps_line_breaks() {
        let record = parser().parse(
            "<h1>Lot</h1><div class=\"description\">\n Boîtier acier\n\nBracelet cuir \n</div>",
            LOT_URL,
        );
        assert_eq!(record.description, "Boîtier acier\n\nBracelet cuir");
    }

    #[test]
    fn test_paragraph_length_counts_inner_spaces() {
        let text = format!("{}{}{}", "a".repeat(30), " ".repeat(10), "b".repeat(25));
        let html = format!("<h1>Lot</h1><p>{text}</p>");
        let record = parser().parse(&html, LOT_URL);
        assert_eq!(record.description, text);
    }

    #[test]
    fn test_paragraph_at_threshold_is_ignored() {
        let html = format!("<h1>Lot</h1><p>{}</p>", "c".repeat(60));
        let record = parser().parse(&html, LOT_URL);
        assert_eq!(record.description, "");
    }
}

#[cfg(test)]
mod image_tests {
    use super::*;

    #[test]
    fn test_image_resolved_against_lot_url() {
        let record = parser().parse(
            r#"<div class="gallery"><img src="/media/catalog/42.jpg"></div>"#,
            LOT_URL,
        );
        assert_eq!(record.image, "https://encheres.example.fr/media/catalog/42.jpg");
    }

    #[test]
    fn test_image_selector_priority() {
        let record = parser().parse(
            r#"<figure><img src="fig.jpg"></figure><img class="product-image-photo" src="main.jpg">"#,
            LOT_URL,
        );
        assert_eq!(record.image, "https://encheres.example.fr/lot/main.jpg");
    }

    #[test]
    fn test_image_without_source_is_skipped() {
        let record = parser().parse(
            r#"<img class="product-image-photo"><figure><img src="https://cdn.example.fr/x.png"></figure>"#,
            LOT_URL,
        );
        assert_eq!(record.image, "https://cdn.example.fr/x.png");
    }

    #[test]
    fn test_lazy_image() {
        let record = parser().parse(
            r#"<figure><img data-src="/media/lazy.jpg"></figure>"#,
            LOT_URL,
        );
        assert_eq!(record.image, "https://encheres.example.fr/media/lazy.jpg");
    }

    #[test]
    fn test_no_image() {
        let record = parser().parse(r#"<img src="/logo.png">"#, LOT_URL);
        assert_eq!(record.image, "");
        assert_eq!(record.url, LOT_URL);
    }
}
