use scraper::{ElementRef, Html, Selector};

/// A parsed page with the handful of structural queries the checks need.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    fn selector(css: &str) -> anyhow::Result<Selector> {
        Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector {css:?}: {e}"))
    }

    fn select(&self, css: &str) -> anyhow::Result<Vec<ElementRef<'_>>> {
        let selector = Self::selector(css)?;
        Ok(self.html.select(&selector).collect())
    }

    /// Element children of every element matching `css`, counted together.
    pub fn children_count(&self, css: &str) -> anyhow::Result<usize> {
        Ok(self.select(css)?.iter().map(element_children).sum())
    }

    /// Element children of the first element matching `css`, zero if nothing matches.
    pub fn first_children_count(&self, css: &str) -> anyhow::Result<usize> {
        Ok(self
            .select(css)?
            .first()
            .map(element_children)
            .unwrap_or(0))
    }

    /// Element children of everything matching `inner` inside the first match for `outer`.
    pub fn nested_children_count(&self, outer: &str, inner: &str) -> anyhow::Result<usize> {
        let inner = Self::selector(inner)?;
        Ok(self
            .select(outer)?
            .first()
            .map(|outer| outer.select(&inner).map(|e| element_children(&e)).sum::<usize>())
            .unwrap_or(0))
    }

    /// An attribute of the `n`th element matching `css`, in document order.
    pub fn nth_attr(&self, css: &str, n: usize, attr: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .select(css)?
            .get(n)
            .and_then(|e| e.value().attr(attr))
            .map(|v| v.to_string()))
    }

    /// The text content of the `n`th element matching `css`, whitespace included.
    pub fn nth_text(&self, css: &str, n: usize) -> anyhow::Result<Option<String>> {
        Ok(self.select(css)?.get(n).map(|e| e.text().collect::<String>()))
    }
}

fn element_children(element: &ElementRef<'_>) -> usize {
    element
        .children()
        .filter(|child| child.value().is_element())
        .count()
}
