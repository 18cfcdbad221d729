use folio_core::dom::{Document, NodeId};

/// Plain-text rendering of the repository container for the terminal.
pub fn render_container(doc: &Document, container: NodeId) -> String {
    let mut out = String::new();
    for child in doc.element_children(container) {
        if doc.tag(child) == Some("article") {
            render_card(doc, child, &mut out);
        } else if doc.has_class(child, "skeleton") {
            out.push_str("…\n");
        } else {
            out.push_str(doc.text_content(child).trim());
            out.push('\n');
        }
    }
    out
}

fn render_card(doc: &Document, card: NodeId, out: &mut String) {
    if let Some(link) = doc.select_by_tag(card, "a").first() {
        out.push_str(&doc.text_content(*link));
        out.push('\n');
        if let Some(href) = doc.attr(*link, "href") {
            out.push_str(&format!("  {href}\n"));
        }
    }
    for class in ["muted", "meta"] {
        if let Some(node) = doc.find_by_class(card, class) {
            out.push_str(&format!("  {}\n", doc.text_content(node)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::feed::{self, CardFormat, FeedError};
    use folio_core::model::RepositorySummary;
    use time::OffsetDateTime;

    fn container() -> (Document, NodeId) {
        let mut doc = Document::new();
        let container = doc.element_with_id(doc.body(), "div", feed::CONTAINER_ID);
        (doc, container)
    }

    #[test]
    fn cards_render_as_blocks() {
        let (mut doc, container) = container();
        let repo = RepositorySummary {
            name: "folio".to_string(),
            url: "https://github.com/me/folio".to_string(),
            description: None,
            language: Some("Rust".to_string()),
            updated_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        };
        feed::render_result(&mut doc, container, Ok(vec![repo]), &CardFormat::default());
        assert_eq!(
            render_container(&doc, container),
            "folio\n  https://github.com/me/folio\n  No description\n  Rust · 11/14/2023\n"
        );
    }

    #[test]
    fn messages_render_as_single_line() {
        let (mut doc, container) = container();
        let err = FeedError::EndpointUnavailable {
            status: 403,
            reason: "Forbidden".to_string(),
        };
        feed::render_result(&mut doc, container, Err(err), &CardFormat::default());
        assert_eq!(
            render_container(&doc, container),
            "GitHub API error: 403 Forbidden\n"
        );
    }

    #[test]
    fn skeletons_render_as_placeholders() {
        let (mut doc, container) = container();
        feed::render_skeletons(&mut doc, container);
        assert_eq!(render_container(&doc, container), "…\n".repeat(feed::SKELETON_COUNT));
    }
}
