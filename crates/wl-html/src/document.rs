//! Full-page and embedded document assembly.

use std::fmt::Write;
use std::path::Path;

use wl_document::Node;

use crate::attrs::{escape_html, escape_text, id_attr};
use crate::chrome::{self, FONT_AWESOME_VERSION, HEAD_ASSETS, STEM_ASSETS};
use crate::converter::{Render, join_asset};
use crate::highlighter::DocinfoContext;
use crate::xref::XrefGuard;

/// Converter version reported in the generator meta tag.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// MIME type of a favicon, derived from its extension.
fn favicon_type(href: &str) -> String {
    match Path::new(href).extension().and_then(|e| e.to_str()) {
        Some("ico") | None => "image/x-icon".to_owned(),
        Some(ext) => format!("image/{ext}"),
    }
}

impl Render<'_> {
    /// Document body: top-level blocks joined by newlines.
    fn body_content(&mut self) -> String {
        let doc = self.doc;
        self.render_blocks(&doc.root.blocks, Some(&doc.root))
    }

    /// Body content with an optional leading `<h1>` document title.
    pub(crate) fn embedded(&mut self) -> String {
        let doc = self.doc;
        let mut lines = Vec::new();
        if let Some(title) = doc.title()
            && self.has_doc_attr("showtitle")
            && !self.has_doc_attr("notitle")
        {
            let title = self.render_inlines(title, XrefGuard::Idle);
            lines.push(format!("<h1{}>{title}</h1>", id_attr(doc.root.id.as_deref())));
        }
        lines.push(self.body_content());
        lines.join("\n")
    }

    /// Complete HTML page.
    pub(crate) fn standalone(&mut self) -> String {
        let doc = self.doc;
        let cdn_base_url = self.cdn_base_url();
        let linkcss = self.has_doc_attr("linkcss");
        let shownav = self.has_doc_attr("shownav");
        let lang = self.doc_attr("lang").unwrap_or("en");
        let max_width = self
            .doc_attr("max-width")
            .map(|w| format!(r#" style="max-width: {};""#, escape_html(w)))
            .unwrap_or_default();

        let mut lines = vec!["<!DOCTYPE html>".to_owned()];
        if self.has_doc_attr("nolang") {
            lines.push("<html>".to_owned());
        } else {
            lines.push(format!(r#"<html lang="{}">"#, escape_html(lang)));
        }
        lines.push("<head>".to_owned());
        lines.push(r#"<meta charset="utf-8">"#.to_owned());
        lines.push(HEAD_ASSETS.to_owned());
        if self.has_doc_attr("stem") {
            lines.push(STEM_ASSETS.to_owned());
        }
        lines.push(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#.to_owned());
        lines.push(format!(
            r#"<meta name="generator" content="Waterlens HTML Backend {VERSION}">"#
        ));
        for name in ["description", "keywords", "author"] {
            if let Some(value) = self.doc_attr(name) {
                lines.push(format!(
                    r#"<meta name="{name}" content="{}">"#,
                    escape_html(value)
                ));
            }
        }
        if let Some(favicon) = self.doc_attr("favicon") {
            let href = if favicon.is_empty() { "favicon.ico" } else { favicon };
            lines.push(format!(
                r#"<link rel="icon" type="{}" href="{}">"#,
                favicon_type(href),
                escape_html(href)
            ));
        }
        lines.push(format!("<title>{}</title>", self.page_title()));
        lines.extend(self.stylesheet(linkcss));
        if self.font_icons() {
            lines.push(self.iconfont_stylesheet(&cdn_base_url));
        }

        let highlighter_slot = self.highlighter.map(|_| {
            lines.push(String::new());
            lines.len() - 1
        });

        lines.push("</head>".to_owned());
        lines.push(format!("<body{}>", id_attr(doc.root.id.as_deref())));
        if !shownav {
            lines.push("<article>".to_owned());
        }
        if !self.has_doc_attr("noheader") {
            lines.push(self.page_header(shownav, lang));
        }
        lines.push("<hr>".to_owned());
        let content = self.body_content();
        lines.push(format!("<div id=\"content\"{max_width}>\n{content}\n</div>"));
        lines.push("<hr>".to_owned());

        if doc.has_footnotes() && !self.has_doc_attr("nofootnotes") {
            lines.push(format!(r#"<div id="footnotes"{max_width}>"#));
            for footnote in &doc.catalog.footnotes {
                let text = self.render_inlines(&footnote.text, XrefGuard::Idle);
                let index = footnote.index;
                lines.push(format!(
                    "<div class=\"footnote\" id=\"_footnotedef_{index}\">\n<a href=\"#_footnoteref_{index}\">{index}</a>. {text}\n</div>"
                ));
            }
            lines.push("</div>".to_owned());
        }

        if !self.has_doc_attr("nofooter") {
            lines.push(chrome::footer(self.options.chrome.footer_for(lang), lang));
        }

        if let Some(highlighter) = self.highlighter {
            let ctx = DocinfoContext {
                cdn_base_url,
                linkcss,
            };
            if let Some(slot) = highlighter_slot {
                let head = highlighter
                    .has_head_contribution()
                    .then(|| highlighter.head_contribution(doc, &ctx))
                    .flatten();
                match head {
                    Some(head) => lines[slot] = head,
                    None => {
                        lines.remove(slot);
                    }
                }
            }
            if highlighter.has_footer_contribution() {
                lines.push(highlighter.footer_contribution(doc, &ctx));
            }
        }

        if !shownav {
            lines.push("</article>".to_owned());
        }
        lines.push("</body>".to_owned());
        lines.push("</html>".to_owned());
        lines.join("\n")
    }

    /// `pagetitle`, else the document title without markup, else `Untitled`.
    fn page_title(&self) -> String {
        if let Some(title) = self.doc_attr("pagetitle") {
            return escape_text(title);
        }
        self.doc
            .title()
            .map(|t| Node::plain_text(t))
            .filter(|t| !t.is_empty())
            .map_or_else(|| "Untitled".to_owned(), |t| escape_text(&t))
    }

    fn stylesheet(&mut self, linkcss: bool) -> Option<String> {
        match self.doc_attr("stylesheet") {
            None | Some("" | "DEFAULT") => self
                .doc_attr("webfonts")
                .filter(|w| !w.is_empty())
                .map(|webfonts| {
                    format!(
                        r#"<link rel="stylesheet" href="{}//fonts.googleapis.com/css?family={}">"#,
                        self.asset_uri_scheme(),
                        escape_html(webfonts)
                    )
                }),
            Some(stylesheet) => {
                let path = join_asset(self.doc_attr("stylesdir"), stylesheet);
                if linkcss {
                    Some(format!(r#"<link rel="stylesheet" href="{}">"#, escape_html(&path)))
                } else {
                    let css = self.read_stylesheet(&path);
                    Some(format!("<style>\n{css}\n</style>"))
                }
            }
        }
    }

    fn iconfont_stylesheet(&self, cdn_base_url: &str) -> String {
        let href = if self.has_doc_attr("iconfont-remote") {
            self.doc_attr("iconfont-cdn").map_or_else(
                || format!("{cdn_base_url}/font-awesome/{FONT_AWESOME_VERSION}/css/font-awesome.min.css"),
                str::to_owned,
            )
        } else {
            let name = self.doc_attr("iconfont-name").unwrap_or("font-awesome");
            join_asset(self.doc_attr("stylesdir"), &format!("{name}.css"))
        };
        format!(r#"<link rel="stylesheet" href="{}">"#, escape_html(&href))
    }

    fn page_header(&mut self, shownav: bool, lang: &str) -> String {
        let doc = self.doc;
        let mut html = String::from("<header>");
        let header = doc.header.as_ref();
        if !self.has_doc_attr("notitle") {
            let title = match doc.title() {
                Some(title) => self.render_inlines(title, XrefGuard::Idle),
                None => "Untitled".to_owned(),
            };
            let _ = write!(html, "\n<h1>{title}</h1>");
        }
        if let Some(subtitle) = header.and_then(|h| h.subtitle.as_ref()).filter(|s| !s.is_empty()) {
            let subtitle = self.render_inlines(subtitle, XrefGuard::Idle);
            let _ = write!(html, "\n<h2 class=\"subtitle\">{subtitle}</h2>");
        }
        let authors = header.map(|h| h.authors.as_slice()).unwrap_or_default();
        if !authors.is_empty() {
            html.push_str("\n<div class=\"details\">");
            for (i, author) in authors.iter().enumerate() {
                let suffix = if i == 0 { String::new() } else { (i + 1).to_string() };
                let _ = write!(
                    html,
                    "\n<span id=\"author{suffix}\" class=\"author\">{}</span><br>",
                    escape_text(&author.name)
                );
                if let Some(email) = &author.email {
                    let _ = write!(
                        html,
                        "\n<span id=\"email{suffix}\" class=\"email\"><a href=\"mailto:{}\">{}</a></span><br>",
                        escape_html(email),
                        escape_text(email)
                    );
                }
            }
            html.push_str("\n</div>");
        }
        if shownav {
            let _ = write!(
                html,
                "\n{}",
                chrome::navigation(self.options.chrome.navigation_for(lang), lang)
            );
        }
        html.push_str("\n</header>");
        html
    }
}
