//! Turns a page into a flat stream of start tag, text and end tag events.

use ego_tree::iter::Edge;
use scraper::{Html, Node};

/// Receiver for markup events, in document order.
pub trait MarkupSink {
    /// `attrs` holds `(name, value)` pairs in source order.
    fn start_tag(&mut self, name: &str, attrs: &[(&str, &str)]);
    fn end_tag(&mut self, name: &str);
    fn text(&mut self, data: &str);
}

/// Parses `html` and replays it into `sink` as a depth-first event stream.
/// The tree is traversed iteratively, so nesting depth is not bounded by the
/// call stack.
///
/// Parsing is lenient: broken markup is repaired the way a browser would, so
/// this never fails.
pub fn feed<S: MarkupSink + ?Sized>(html: &str, sink: &mut S) {
    let document = Html::parse_document(html);
    for edge in document.root_element().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(element) => {
                    let attrs: Vec<(&str, &str)> = element.attrs().collect();
                    sink.start_tag(element.name(), &attrs);
                }
                Node::Text(text) => sink.text(text),
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(element) = node.value() {
                    sink.end_tag(element.name());
                }
            }
        }
    }
}
