//! # Page Fragments
//!
//! The fragment library and layout composer. Every page except the
//! plain-text 404 goes through [`layout`], which wraps a content fragment in
//! the fixed document skeleton: head, header, nav, content slot, footer.
//! Dynamic text enters through `push_text` and is escaped there; the
//! surrounding markup is trusted literals.

use roster_core::Fragment;

/// Heading fragment with the escaped page title
pub fn header(title: &str) -> Fragment {
    let mut f = Fragment::raw("<header><h1>");
    f.push_text(title);
    f.push_raw("</h1></header>");
    f
}

/// Fixed navigation links; no dynamic input
pub fn nav() -> Fragment {
    Fragment::raw(concat!(
        "<nav>",
        "<a href=\"/\">Home</a> ",
        "<a href=\"/hello\">Hello</a> ",
        "<a href=\"/users\">Users</a>",
        "</nav>"
    ))
}

/// Fixed copyright fragment; no dynamic input
pub fn footer() -> Fragment {
    Fragment::raw("<footer>&copy; 2024</footer>")
}

/// Compose a complete HTML document.
///
/// The escaped `title` appears in the document head and again in the
/// header heading. `content` is inserted verbatim between nav and footer;
/// callers are responsible for anything dynamic inside it. An empty
/// fragment yields a layout with an empty body section there.
pub fn layout(title: &str, content: Fragment) -> Fragment {
    let mut doc = Fragment::raw("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>");
    doc.push_text(title);
    doc.push_raw("</title>\n</head>\n<body>\n");
    doc.push(header(title));
    doc.push_raw("\n");
    doc.push(nav());
    doc.push_raw("\n");
    doc.push(content);
    doc.push_raw("\n");
    doc.push(footer());
    doc.push_raw("\n</body>\n</html>");
    doc
}
