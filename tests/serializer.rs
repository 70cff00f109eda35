// Copyright 2015 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use html_transformer::dom::{parse_document, Attribute, Dom, NodeData, NodeId};
use html_transformer::{print, print_to_string, RenderError};

fn parse_and_print(input: &str) -> String {
    let dom = parse_document(input);
    print_to_string(&dom, dom.document()).unwrap()
}

macro_rules! test {
    ($name:ident, $input:expr, $output:expr) => {
        #[test]
        fn $name() {
            let printed = parse_and_print($input);
            assert!(
                printed.contains($output),
                "\nprinted:  {:?}\nexpected: {:?}",
                printed,
                $output
            );
        }
    };

    // Shorthand for $output = $input
    ($name:ident, $input:expr) => {
        test!($name, $input, $input);
    };
}

test!(
    drops_unnecessary_quotes,
    r#"<div class="content" id="content">"#,
    "<div class=content id=content></div>"
);
test!(
    keeps_needed_quotes,
    r#"<p class="normal text" style="font-size: 12pt;">Hello World!</p>"#
);
test!(
    some_quotes_stripped,
    r#"<IMG src="http://www.google.com/a.jpg" alt="This is a image.">"#,
    r#"<img alt="This is a image." src=http://www.google.com/a.jpg>"#
);
test!(space_is_quoted, r#"<lemur x=" ">"#);
test!(double_quote_is_escaped, "<lemur x='\"'>", "<lemur x=&#34;>");
test!(equals_is_quoted, "<lemur x='a=b'>", r#"<lemur x="a=b">"#);
test!(less_than_is_escaped, "<lemur x='a<b'>", "<lemur x=a&lt;b>");
test!(greater_than_is_escaped, "<lemur x='a>b'>", "<lemur x=a&gt;b>");
test!(utf8_symbol_is_unquoted, r#"<lemur x="❄">"#, "<lemur x=❄>");
test!(utf8_turkish_is_unquoted, r#"<lemur x="Beşiktaş">"#, "<lemur x=Beşiktaş>");
test!(utf8_russian_is_unquoted, r#"<lemur x="Вконтакте">"#, "<lemur x=Вконтакте>");
test!(empty_value_is_dropped, r#"<lemur hidden="">"#, "<lemur hidden></lemur>");

test!(doctype_noop, "<!doctype html>");
test!(
    doctype_drops_identifiers,
    r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    "<!doctype html>"
);
test!(doctype_bogus_identifiers, r#"<!DOCTYPE HTML PUBLIC "bogus" "notreal">"#, "<!doctype html>");
test!(doctype_keeps_name, r#"<!DOCTYPE document SYSTEM "subjects.dtd">"#, "<!doctype document>");

test!(
    adds_required_tags,
    "<!doctype html><script async src=https://cdn.ampproject.org/v0.js></script><link href=https://example.com/favicon.ico rel=icon>hello world",
    "<!doctype html><html><head><script async src=https://cdn.ampproject.org/v0.js></script><link href=https://example.com/favicon.ico rel=icon></head><body>hello world</body></html>"
);

test!(
    whitespace_before_doctype,
    "\n\n\t\t    <!doctype html>",
    "<!doctype html><html><head></head><body></body></html>"
);
test!(intra_tag_whitespace, r#"<lemur   lemur = "lemur" ></lemur>"#, "<lemur lemur=lemur></lemur>");
test!(pre_whitespace, "<pre>   foo   </pre>");

test!(
    strips_comments,
    "<!-- comment --><!doctype html><html ⚡><foo><!-- comment --></foo>",
    "<!doctype html><html ⚡><head></head><body><foo></foo></body></html>"
);
test!(
    strips_comments_within_text,
    concat!(
        "<!-- All comments --><!doctype html><!-- are --><html ⚡><head>",
        "</head><body>are <!-- belong --><p><!-- to --> us!</p></body>",
        "</html>"
    ),
    "<!doctype html><html ⚡><head></head><body>are <p> us!</p></body></html>"
);

test!(closes_tags, "<lemur>", "<lemur></lemur>");

test!(void_noop, "<br>");
test!(void_drops_self_closing, "<br/>", "<br>");
test!(void_end_tag_without_start, "</br>", "<br>");
test!(void_with_spacing, "<img src  = 'lemur.png' />", "<img src=lemur.png>");

test!(self_closed_gets_end_tag, "<lemur />foo", "<lemur>foo</lemur>");
test!(self_closed_no_space, "<lemur/>foo", "<lemur>foo</lemur>");
test!(redundant_end_tag, "<lemur/>foo</lemur>bar", "<lemur>foo</lemur>bar");
test!(
    self_closed_style,
    "<html><head></head><body><style />foo</body></html>",
    "<style>foo</body></html></style>"
);
test!(self_closed_in_svg, "<svg><lemur />foo</svg>", "<svg><lemur></lemur>foo</svg>");
test!(foreign_void_element, "<svg><link href=x /></svg>", "<svg><link href=x /></svg>");
test!(
    void_in_foreign_object,
    "<svg><foreignObject><br/></foreignObject></svg>",
    "<svg><foreignobject><br></foreignobject></svg>"
);

test!(escape_attr_value, r#"<lemur lemur="<>'">"#, "<lemur lemur=&lt;&gt;&#39;></lemur>");
test!(escape_quote, r#"<lemur koala='"'>"#, "<lemur koala=&#34;></lemur>");
test!(escape_noop, "&lt;script&gt;");
test!(escape_ampersand, "<p>a &amp; b</p>");
test!(
    script_text_is_raw,
    r#"<script type="application/json">{ "AmpBind": true }</script>"#,
    r#"<script type=application/json>{ "AmpBind": true }</script>"#
);
test!(style_text_is_raw, "<style>a > b { content: '&'; }</style>");

test!(attr_order, "<lemur x=3 y=4 b=5 />", "<lemur b=5 x=3 y=4></lemur>");
test!(attr_order_is_stable, "<lemur x=4 x=3 b=5 />", "<lemur b=5 x=4></lemur>");
test!(
    svg_attr_order,
    r#"<svg version="1.0" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="640" height="480"></svg>"#,
    "<svg height=480 version=1.0 width=640 xmlns=http://www.w3.org/2000/svg xmlns:xlink=http://www.w3.org/1999/xlink></svg>"
);
test!(colon_in_name, "<lemur x:foo y a>", "<lemur a x:foo y></lemur>");
test!(colons_sort_bytewise, "<lemur x foob:az foo:bar a>", "<lemur a foo:bar foob:az x></lemur>");

test!(
    svg_attr_names_lowercase,
    r#"<svg height=296 viewBox="1400 500 3000 2500" width=400></svg>"#,
    r#"<svg height=296 viewbox="1400 500 3000 2500" width=400></svg>"#
);
test!(svg_tag_names_lowercase, "<svg><linearGradient>", "<svg><lineargradient>");

test!(pre_leading_newline, "<pre>\n\nfoo</pre>");
test!(textarea_leading_newline, "<textarea>\n\nfoo</textarea>");
test!(pre_single_newline_dropped, "<pre>\nfoo</pre>", "<pre>foo</pre>");

#[test]
fn printing_is_idempotent() {
    let inputs = [
        "<pre>\n\n\nfoo</pre>",
        "<textarea>\r\nx</textarea>",
        "<svg><desc><br/></desc><path d='M 0 0'/></svg>",
        "<math><annotation-xml encoding=text/html><img src=x></annotation-xml></math>",
        "<p title='a \"b\" c'>&lt;x&gt; &amp;</p>",
    ];
    for input in inputs.iter() {
        let once = parse_and_print(input);
        let twice = parse_and_print(&once);
        assert_eq!(once, twice, "input: {:?}", input);
    }
}

#[test]
fn duplicate_keys_keep_source_order() {
    let mut dom = Dom::new();
    let doc = dom.document();
    let lemur = dom.create_element(
        "lemur",
        vec![
            Attribute::new("x", "4"),
            Attribute::new("x", "3"),
            Attribute::new("b", "5"),
        ],
    );
    dom.append(doc, lemur);
    assert_eq!(
        print_to_string(&dom, doc).unwrap(),
        "<lemur b=5 x=4 x=3></lemur>"
    );
}

#[test]
fn prints_subtree() {
    let dom = parse_document("<p>one<b>two</b></p>");
    let b = dom.find_element(dom.document(), "b").unwrap();
    let mut out = Vec::new();
    print(&mut out, &dom, b).unwrap();
    assert_eq!(out, b"<b>two</b>");
}

#[test]
fn error_node_fails() {
    let mut dom = parse_document("<p>x</p>");
    let p = dom.find_element(dom.document(), "p").unwrap();
    let bad = dom.create(NodeData::Error);
    dom.append(p, bad);
    match print_to_string(&dom, dom.document()) {
        Err(RenderError::ErrorNode) => (),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn void_element_with_children_fails() {
    let mut dom = Dom::new();
    let doc = dom.document();
    let br = dom.create_element("br", vec![]);
    let text = dom.create_text("x");
    dom.append(doc, br);
    dom.append(br, text);
    let err = print_to_string(&dom, doc).unwrap_err();
    assert_eq!(err.to_string(), "void element <br> has child nodes");
}

/// Element names, attributes and text of a tree, in document order.
/// Comments are skipped and the text on either side of them joined, the
/// way printing joins it.
fn structure(dom: &Dom) -> Vec<String> {
    fn walk(dom: &Dom, id: NodeId, out: &mut Vec<String>) {
        let is_element = match dom.data(id) {
            NodeData::Comment { .. } => return,
            NodeData::Text { contents } => {
                match out.last_mut() {
                    Some(last) if last.starts_with("text ") => last.push_str(contents),
                    _ => out.push(format!("text {}", contents)),
                }
                return;
            },
            NodeData::Doctype { name } => {
                out.push(format!("doctype {}", name));
                false
            },
            NodeData::Element { name, attrs, .. } => {
                let mut attrs: Vec<String> = attrs
                    .iter()
                    .map(|a| format!("{}={:?}", a.sort_key(), a.value))
                    .collect();
                attrs.sort();
                out.push(format!("<{} {} {}>", name.ns, name.local, attrs.join(" ")));
                true
            },
            _ => false,
        };
        for child in dom.children(id) {
            walk(dom, child, out);
        }
        if is_element {
            out.push("</>".to_owned());
        }
    }

    let mut out = Vec::new();
    walk(dom, dom.document(), &mut out);
    out
}

#[test]
fn reparsing_gives_the_same_tree() {
    let inputs = [
        concat!(
            "<!-- lead --><!doctype html><html ⚡ lang=en><head>",
            "<title>a &amp; b</title>",
            "<style>a > b { content: \"&\" }</style>",
            "<script>if (a < b && c) {}</script>",
            "</head><body>one<!-- c -->two",
            "<p class=\"x y\" hidden>t&lt;'\"</p>",
            "<pre>\n\nfoo</pre><textarea>\r\nx</textarea>",
            "<svg viewBox=\"0 0 1 1\"><linearGradient/><a xlink:href=\"#x\"/>",
            "<foreignObject><br/></foreignObject></svg>",
            "<table><tr><td>x</td></tr></table>",
            "<template><b>t</b></template>",
            "</body></html>"
        ),
        "<math><annotation-xml encoding=text/html><img src=x></annotation-xml><mi>x</mi></math>",
        "<DIV ID=a Data-X=\"1 2\">Beşiktaş<br>❄</DIV>",
    ];
    for input in inputs.iter() {
        let first = parse_document(input);
        let printed = print_to_string(&first, first.document()).unwrap();
        let second = parse_document(&printed);
        assert_eq!(structure(&first), structure(&second), "printed: {:?}", printed);
    }
}

#[test]
fn pre_text_starting_with_carriage_return() {
    let mut dom = Dom::new();
    let doc = dom.document();
    let pre = dom.create_element("pre", vec![]);
    let text = dom.create_text("\rfoo");
    dom.append(doc, pre);
    dom.append(pre, text);

    let printed = print_to_string(&dom, doc).unwrap();
    assert_eq!(printed, "<pre>\n&#13;foo</pre>");

    let reparsed = parse_document(&printed);
    let pre = reparsed.find_element(reparsed.document(), "pre").unwrap();
    let text = reparsed.first_child(pre).unwrap();
    assert_eq!(reparsed.text(text), Some("\rfoo"));
}
