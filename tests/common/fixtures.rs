use std::fmt::Write;

/// Named synthetic documents covering the shapes the renderer cares about.
pub fn markup_fixtures() -> Vec<(&'static str, String)> {
    vec![
        ("article", article_markup(40)),
        ("lists", list_markup(12, 8)),
        ("nested-inline", nested_inline_markup(64)),
        ("entities", entity_markup(200)),
        ("table", table_markup(30, 4)),
    ]
}

/// Headings and paragraphs with inline styling and links.
pub fn article_markup(sections: usize) -> String {
    let mut out = String::with_capacity(sections * 512);
    for idx in 0..sections {
        let _ = write!(
            out,
            "<h2>Section {idx}</h2>\
             <p style=\"line-height: 22px\">Paragraph {idx} has <b>bold</b>, <i>italic</i> \
             and <span style=\"font-size: 1.5em; color: #333\">large</span> words, \
             plus <a href=\"https://example.com/{idx}\">a link</a>.</p>\
             <p><small>fine print</small><br/>second line</p><hr/>"
        );
    }
    out
}

/// Alternating ordered and unordered lists.
pub fn list_markup(lists: usize, items: usize) -> String {
    let mut out = String::with_capacity(lists * items * 32);
    for list in 0..lists {
        let tag = if list % 2 == 0 { "ol" } else { "ul" };
        let _ = write!(out, "<{tag}>");
        for item in 0..items {
            let _ = write!(out, "<li>item {list}.{item}</li>");
        }
        let _ = write!(out, "</{tag}>");
    }
    out
}

/// `depth` levels of nested spans with em font sizes.
pub fn nested_inline_markup(depth: usize) -> String {
    let mut out = String::with_capacity(depth * 48);
    for _ in 0..depth {
        out.push_str("<span style=\"font-size: 1.01em\">x");
    }
    for _ in 0..depth {
        out.push_str("</span>");
    }
    out
}

/// Text dense with named and numeric character references.
pub fn entity_markup(repeats: usize) -> String {
    let mut out = String::with_capacity(repeats * 48);
    out.push_str("<p>");
    for _ in 0..repeats {
        out.push_str("caf&eacute; &amp; &#169; &#x2014; &nbsp;&lt;tag&gt; ");
    }
    out.push_str("</p>");
    out
}

/// A table with styled header cells.
pub fn table_markup(rows: usize, cols: usize) -> String {
    let mut out = String::with_capacity(rows * cols * 40);
    out.push_str("<table><tr>");
    for col in 0..cols {
        let _ = write!(out, "<th style=\"font-size: 12pt\">h{col}</th>");
    }
    out.push_str("</tr>");
    for row in 0..rows {
        out.push_str("<tr>");
        for col in 0..cols {
            let _ = write!(out, "<td>{row}x{col}</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
    out
}
