//! Block node rendering.
//!
//! Every routine returns the element without a trailing newline; siblings are
//! joined with `\n` by [`Render::render_blocks`].

use std::fmt::Write;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use wl_document::{Node, NodeKind};

use crate::attrs::{ClassList, escape_html, escape_text, id_attr, link_constraint_attrs, opt_attr, role_attr};
use crate::converter::Render;
use crate::highlighter::FormatOptions;
use crate::inline::{image_alt, is_svg};
use crate::xref::XrefGuard;

/// Line breaks inside an AsciiMath block that split it into equations.
static STEM_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *\\\n(?:\\?\n)*|\n\n+").unwrap());

fn boolean_attr(name: &str, present: bool) -> String {
    if present { format!(" {name}") } else { String::new() }
}

/// `#t=START,END` media fragment.
fn time_anchor(node: &Node) -> String {
    match (node.attr("start"), node.attr("end")) {
        (None, None) => String::new(),
        (start, end) => format!(
            "#t={}{}",
            escape_html(start.unwrap_or_default()),
            end.map(|e| format!(",{}", escape_html(e))).unwrap_or_default()
        ),
    }
}

/// ` width=`/` height=` attributes; `rem` values share one inline style.
fn dimension_attrs(node: &Node) -> String {
    let mut attrs = String::new();
    let mut style = Vec::new();
    for name in ["width", "height"] {
        match node.attr(name) {
            Some(value) if value.ends_with("rem") => {
                style.push(format!("{name}: {};", escape_html(value)));
            }
            value => attrs.push_str(&opt_attr(name, value)),
        }
    }
    if !style.is_empty() {
        let _ = write!(attrs, r#" style="{}""#, style.join(" "));
    }
    attrs
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl Render<'_> {
    /// Render sibling blocks, joined by newlines.
    pub(crate) fn render_blocks(&mut self, blocks: &[Node], parent: Option<&Node>) -> String {
        let rendered: Vec<String> = blocks
            .iter()
            .map(|block| self.render_block(block, parent))
            .collect();
        rendered.join("\n")
    }

    pub(crate) fn render_block(&mut self, node: &Node, parent: Option<&Node>) -> String {
        self.render_block_as(node.kind, node, parent)
    }

    /// Render `node` with the routine for `kind`.
    pub(crate) fn render_block_as(&mut self, kind: NodeKind, node: &Node, parent: Option<&Node>) -> String {
        match kind {
            NodeKind::Document | NodeKind::Preamble => self.content(node),
            NodeKind::Section => self.section(node),
            NodeKind::Paragraph => self.paragraph(node),
            NodeKind::Admonition => self.admonition(node),
            NodeKind::Audio => self.audio(node),
            NodeKind::Colist => self.colist(node),
            NodeKind::Dlist => self.dlist(node),
            NodeKind::Example => self.example(node),
            NodeKind::FloatingTitle => self.floating_title(node),
            NodeKind::Image => self.image(node),
            NodeKind::Listing => self.listing(node),
            NodeKind::Literal => self.literal(node),
            NodeKind::Stem => self.stem(node),
            NodeKind::Olist => self.olist(node),
            NodeKind::Open => self.open(node, parent),
            NodeKind::PageBreak => r#"<div style="page-break-after: always;"></div>"#.to_owned(),
            NodeKind::Pass => match &node.source {
                Some(source) if node.blocks.is_empty() => source.clone(),
                _ => self.content(node),
            },
            NodeKind::Quote => self.quote(node),
            NodeKind::Sidebar => self.sidebar(node),
            NodeKind::Table => self.table(node),
            NodeKind::ThematicBreak => "<hr>".to_owned(),
            NodeKind::Ulist => self.ulist(node),
            NodeKind::Verse => self.verse(node),
            NodeKind::Video => self.video(node),
            NodeKind::ListItem => self.list_item_body(node),
            NodeKind::Text
            | NodeKind::InlineAnchor
            | NodeKind::InlineBreak
            | NodeKind::InlineButton
            | NodeKind::InlineCallout
            | NodeKind::InlineFootnote
            | NodeKind::InlineImage
            | NodeKind::InlineIndexterm
            | NodeKind::InlineKbd
            | NodeKind::InlineMenu
            | NodeKind::InlineQuoted => {
                tracing::warn!(kind = %kind, "Inline node in block position, skipping");
                self.warn(format!("inline node `{kind}` in block position was skipped"));
                String::new()
            }
        }
    }

    /// Child blocks joined by newlines; otherwise the text inlines; otherwise
    /// the escaped source.
    pub(crate) fn content(&mut self, node: &Node) -> String {
        if !node.blocks.is_empty() {
            self.render_blocks(&node.blocks, Some(node))
        } else {
            self.inline_content(node, XrefGuard::Idle)
        }
    }

    /// Verbatim content: the escaped source, or text inlines when present.
    fn verbatim(&mut self, node: &Node) -> String {
        match (&node.text, &node.source) {
            (Some(text), _) => self.render_inlines(text, XrefGuard::Idle),
            (None, Some(source)) => escape_text(source),
            (None, None) => String::new(),
        }
    }

    pub(crate) fn title(&mut self, node: &Node) -> String {
        match &node.title {
            Some(title) => self.render_inlines(title, XrefGuard::Idle),
            None => String::new(),
        }
    }

    /// Title prefixed with the node's caption (`Table 1. `).
    pub(crate) fn captioned_title(&mut self, node: &Node) -> String {
        let title = self.title(node);
        match node.caption.as_deref() {
            Some(caption) => format!("{}{title}", escape_text(caption)),
            None => title,
        }
    }

    /// `<div class="title">…</div>` followed by a newline, or nothing.
    fn title_div(&mut self, node: &Node, captioned: bool) -> String {
        if !node.has_title() {
            return String::new();
        }
        let title = if captioned {
            self.captioned_title(node)
        } else {
            self.title(node)
        };
        format!("<div class=\"title\">{title}</div>\n")
    }

    fn section(&mut self, node: &Node) -> String {
        let level = node.level;
        let sectnumlevels = self
            .doc_attr("sectnumlevels")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(3);
        let mut title = if node.caption.is_some() {
            self.captioned_title(node)
        } else {
            match node.sectnum.as_deref() {
                Some(sectnum) if node.numbered && level <= sectnumlevels => {
                    format!("{sectnum} {}", self.title(node))
                }
                _ => self.title(node),
            }
        };
        if let Some(id) = node.id.as_deref() {
            let id = escape_html(id);
            if self.has_doc_attr("sectlinks") {
                title = format!(r##"<a class="link" href="#{id}">{title}</a>"##);
            }
            if self.has_doc_attr("sectanchors") {
                let anchor = format!(r##"<a class="anchor" href="#{id}"></a>"##);
                title = if self.doc_attr_is("sectanchors", "after") {
                    format!("{title}{anchor}")
                } else {
                    format!("{anchor}{title}")
                };
            }
        }
        let id = id_attr(node.id.as_deref());
        let content = self.content(node);
        if level == 0 {
            let classes = ClassList::base("sect0").with(node.role());
            format!("<h1{id}{}>{title}</h1>\n{content}", classes.attr())
        } else {
            let classes = ClassList::base(&format!("sect{level}")).with(node.role());
            let h = level + 1;
            format!("<section{}>\n<h{h}{id}>{title}</h{h}>\n{content}\n</section>", classes.attr())
        }
    }

    fn paragraph(&mut self, node: &Node) -> String {
        let id = id_attr(node.id.as_deref());
        let content = self.content(node);
        if node.has_title() {
            let classes = ClassList::base("paragraph").with(node.role());
            let title = self.title(node);
            format!(
                "<div{id}{}>\n<div class=\"title\">{title}</div>\n<p>{content}</p>\n</div>",
                classes.attr()
            )
        } else {
            format!("<p{id}{}>{content}</p>", role_attr(node))
        }
    }

    fn admonition(&mut self, node: &Node) -> String {
        let name = node
            .attr("name")
            .map(str::to_owned)
            .or_else(|| node.style.as_deref().map(str::to_lowercase))
            .unwrap_or_else(|| "note".to_owned());
        let textlabel = node
            .attr("textlabel")
            .map_or_else(|| capitalize(&name), str::to_owned);
        let label = if self.icons_enabled() {
            if self.font_icons() && !node.has_attr("icon") {
                format!(
                    r#"<i class="fa icon-{}" title="{}"></i>"#,
                    escape_html(&name),
                    escape_html(&textlabel)
                )
            } else {
                format!(
                    r#"<img src="{}" alt="{}">"#,
                    escape_html(&self.icon_uri(Some(node), &name)),
                    escape_html(&textlabel)
                )
            }
        } else {
            format!(r#"<div class="title">{}</div>"#, escape_text(&textlabel))
        };
        let classes = ClassList::base("admonition").with(Some(&name)).with(node.role());
        let title = self.title_div(node, false);
        let content = self.content(node);
        format!(
            "<div{}{}>\n<table>\n<tr>\n<td class=\"icon\">\n{label}\n</td>\n<td class=\"content\">\n{title}{content}\n</td>\n</tr>\n</table>\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr()
        )
    }

    fn audio(&mut self, node: &Node) -> String {
        let classes = ClassList::base("audio").with(node.role());
        let title = self.title_div(node, false);
        let src = self.media_uri(node.target.as_deref().unwrap_or_default());
        format!(
            "<div{}{}>\n{title}<div class=\"content\">\n<audio src=\"{}{}\"{}{}{}>\nYour browser does not support the audio tag.\n</audio>\n</div>\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr(),
            escape_html(&src),
            time_anchor(node),
            boolean_attr("autoplay", node.has_option("autoplay")),
            boolean_attr("controls", !node.has_option("nocontrols")),
            boolean_attr("loop", node.has_option("loop")),
        )
    }

    fn example(&mut self, node: &Node) -> String {
        let id = id_attr(node.id.as_deref());
        let content = self.content(node);
        if node.has_option("collapsible") {
            let summary = if node.has_title() {
                self.title(node)
            } else {
                "Details".to_owned()
            };
            format!(
                "<details{id}{}{}>\n<summary class=\"title\">{summary}</summary>\n<div class=\"content\">\n{content}\n</div>\n</details>",
                role_attr(node),
                boolean_attr("open", node.has_option("open"))
            )
        } else {
            let classes = ClassList::base("example").with(node.role());
            let title = self.title_div(node, true);
            format!(
                "<div{id}{}>\n{title}<div class=\"content\">\n{content}\n</div>\n</div>",
                classes.attr()
            )
        }
    }

    fn floating_title(&mut self, node: &Node) -> String {
        let h = node.level + 1;
        let classes = ClassList::new().with(node.style.as_deref()).with(node.role());
        let title = self.title(node);
        format!("<h{h}{}{}>{title}</h{h}>", id_attr(node.id.as_deref()), classes.attr())
    }

    fn image(&mut self, node: &Node) -> String {
        let target = node.target.as_deref().unwrap_or_default();
        let alt = image_alt(node);
        let dimensions = dimension_attrs(node);
        let plain_img = |uri: String| {
            format!(r#"<img src="{}" alt="{}"{dimensions}>"#, escape_html(&uri), escape_html(&alt))
        };
        let alt_span = format!(r#"<span class="alt">{}</span>"#, escape_text(&alt));
        let img = if is_svg(node, target) && node.has_option("inline") {
            self.read_svg(node, target).unwrap_or(alt_span)
        } else if is_svg(node, target) && node.has_option("interactive") {
            let fallback = match node.attr("fallback") {
                Some(fallback) => plain_img(self.image_uri(fallback)),
                None => alt_span,
            };
            format!(
                r#"<object type="image/svg+xml" data="{}"{dimensions}>{fallback}</object>"#,
                escape_html(&self.image_uri(target))
            )
        } else {
            plain_img(self.image_uri(target))
        };
        let img = match node.attr("link") {
            Some(link) => format!(
                r#"<a class="image" href="{}"{}>{img}</a>"#,
                escape_html(link),
                link_constraint_attrs(node)
            ),
            None => img,
        };
        let classes = ClassList::base("imageblock")
            .with(node.attr("float"))
            .with(node.attr("align").map(|a| format!("text-{a}")))
            .with(node.role());
        let title = if node.has_title() {
            format!("\n<div class=\"title\">{}</div>", self.captioned_title(node))
        } else {
            String::new()
        };
        format!(
            "<div{}{}>\n<div class=\"content\">\n{img}\n</div>{title}\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr()
        )
    }

    fn listing(&mut self, node: &Node) -> String {
        let nowrap = node.has_option("nowrap") || !self.has_doc_attr("prewrap");
        let content = self.verbatim(node);
        let pre = if node.style.as_deref() == Some("source") {
            let lang = node.attr("language");
            match self.highlighter {
                Some(highlighter) => {
                    let mut opts = FormatOptions {
                        nowrap,
                        ..FormatOptions::default()
                    };
                    if highlighter.highlights() {
                        let name = highlighter.name();
                        opts.css_mode = Some(
                            self.doc_attr(&format!("{name}-css"))
                                .unwrap_or("class")
                                .to_owned(),
                        );
                        opts.style = self.doc_attr(&format!("{name}-style")).map(str::to_owned);
                    }
                    highlighter.format(node, lang, &content, &opts)
                }
                None => {
                    let code_attrs = lang
                        .map(|lang| {
                            let lang = escape_html(lang);
                            format!(r#" class="language-{lang}" data-lang="{lang}""#)
                        })
                        .unwrap_or_default();
                    let pre_class = if nowrap { "highlight nowrap" } else { "highlight" };
                    format!(r#"<pre class="{pre_class}"><code{code_attrs}>{content}</code></pre>"#)
                }
            }
        } else {
            let pre_class = if nowrap { r#" class="nowrap""# } else { "" };
            format!("<pre{pre_class}>{content}</pre>")
        };
        let classes = ClassList::base("listing").with(node.role());
        let title = self.title_div(node, true);
        format!(
            "<div{}{}>\n{title}<div class=\"content\">\n{pre}\n</div>\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr()
        )
    }

    fn literal(&mut self, node: &Node) -> String {
        let nowrap = !self.has_doc_attr("prewrap") || node.has_option("nowrap");
        let pre_class = if nowrap { r#" class="nowrap""# } else { "" };
        let classes = ClassList::base("literal").with(node.role());
        let title = self.title_div(node, false);
        let content = self.verbatim(node);
        format!(
            "<div{}{}>\n{title}<div class=\"content\">\n<pre{pre_class}>{content}</pre>\n</div>\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr()
        )
    }

    fn stem(&mut self, node: &Node) -> String {
        let style = match node.style.as_deref() {
            Some("stem") | None => self.doc_attr("stem").filter(|s| !s.is_empty()).unwrap_or("asciimath"),
            Some(style) => style,
        };
        let (open, close) = if style == "latexmath" {
            (r"\[", r"\]")
        } else {
            (r"\$", r"\$")
        };
        let mut equation = self.verbatim(node);
        if !equation.is_empty() {
            if style == "asciimath" && equation.contains('\n') {
                equation = STEM_BREAK
                    .replace_all(&equation, |caps: &Captures| {
                        let breaks = caps[0].matches('\n').count().saturating_sub(1);
                        format!("{close}{}\n{open}", "\n<br>".repeat(breaks))
                    })
                    .into_owned();
            }
            if !(equation.starts_with(open) && equation.ends_with(close)) {
                equation = format!("{open}{equation}{close}");
            }
        }
        let classes = ClassList::base("stem").with(node.role());
        let title = self.title_div(node, false);
        format!(
            "<div{}{}>\n{title}<div class=\"content\">\n{equation}\n</div>\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr()
        )
    }

    fn open(&mut self, node: &Node, parent: Option<&Node>) -> String {
        let style = node.style.as_deref();
        let book = self.doc.doctype() == "book";
        if style == Some("abstract") {
            let at_root = parent.is_none_or(|p| p.kind == NodeKind::Document);
            if at_root && book {
                tracing::warn!("Abstract block at the root of a book, excluding its content");
                self.warn("abstract block cannot be used in a document without a doctitle when doctype is book; excluding block content");
                return String::new();
            }
            let classes = ClassList::base("quote").with(Some("abstract")).with(node.role());
            let title = self.title_div(node, false);
            let content = self.content(node);
            return format!(
                "<div{}{}>\n{title}<blockquote>\n{content}\n</blockquote>\n</div>",
                id_attr(node.id.as_deref()),
                classes.attr()
            );
        }
        if style == Some("partintro") {
            let in_part = parent.is_some_and(|p| p.kind == NodeKind::Section && p.level == 0);
            if !(in_part && book) {
                tracing::error!("Partintro block outside a book part, excluding its content");
                self.warn("partintro block can only be used when doctype is book and must be a child of a book part; excluding block content");
                return String::new();
            }
        }
        let classes = ClassList::base("open")
            .with(style.filter(|s| *s != "open"))
            .with(node.role());
        let title = self.title_div(node, false);
        let content = self.content(node);
        format!(
            "<div{}{}>\n{title}<div class=\"content\">\n{content}\n</div>\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr()
        )
    }

    /// `<div class="attribution">` block of quotes and verses.
    fn attribution(node: &Node) -> String {
        let attribution = node.attr("attribution");
        let citetitle = node.attr("citetitle");
        if attribution.is_none() && citetitle.is_none() {
            return String::new();
        }
        let cite = citetitle
            .map(|c| format!("<cite>{}</cite>", escape_text(c)))
            .unwrap_or_default();
        let text = attribution
            .map(|a| {
                let br = if citetitle.is_some() { "<br>\n" } else { "" };
                format!("&#8212; {}{br}", escape_text(a))
            })
            .unwrap_or_default();
        format!("\n<div class=\"attribution\">\n{text}{cite}\n</div>")
    }

    fn quote(&mut self, node: &Node) -> String {
        let classes = ClassList::base("quoteblock").with(node.role());
        let title = if node.has_title() {
            format!("\n<div class=\"title\">{}</div>", self.title(node))
        } else {
            String::new()
        };
        let content = self.content(node);
        format!(
            "<div{}{}>{title}\n<blockquote>\n{content}\n</blockquote>{}\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr(),
            Self::attribution(node)
        )
    }

    fn verse(&mut self, node: &Node) -> String {
        let classes = ClassList::base("verse").with(node.role());
        let title = if node.has_title() {
            format!("\n<div class=\"title\">{}</div>", self.title(node))
        } else {
            String::new()
        };
        let content = self.verbatim(node);
        format!(
            "<div{}{}>{title}\n<pre class=\"content\">{content}</pre>{}\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr(),
            Self::attribution(node)
        )
    }

    fn sidebar(&mut self, node: &Node) -> String {
        let classes = ClassList::base("sidebar").with(node.role());
        let title = self.title_div(node, false);
        let content = self.content(node);
        format!(
            "<div{}{}>\n<div class=\"content\">\n{title}{content}\n</div>\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr()
        )
    }

    fn video(&mut self, node: &Node) -> String {
        let classes = ClassList::base("videoblock")
            .with(node.attr("float"))
            .with(node.attr("align").map(|a| format!("text-{a}")))
            .with(node.role());
        let title = if node.has_title() {
            format!("\n<div class=\"title\">{}</div>", self.title(node))
        } else {
            String::new()
        };
        let dimensions = format!(
            "{}{}",
            opt_attr("width", node.attr("width")),
            opt_attr("height", node.attr("height"))
        );
        let target = node.target.as_deref().unwrap_or_default();
        let player = match node.attr("poster") {
            Some("vimeo") => {
                let (video, hash) = match target.split_once('/') {
                    Some((video, hash)) => (video, Some(hash)),
                    None => (target, node.attr("hash")),
                };
                let mut params = Vec::new();
                if let Some(hash) = hash {
                    params.push(format!("h={}", escape_html(hash)));
                }
                for option in ["autoplay", "loop", "muted"] {
                    if node.has_option(option) {
                        params.push(format!("{option}=1"));
                    }
                }
                let query = if params.is_empty() {
                    String::new()
                } else {
                    format!("?{}", params.join("&amp;"))
                };
                let start = node
                    .attr("start")
                    .map(|s| format!("#at={}", escape_html(s)))
                    .unwrap_or_default();
                format!(
                    r#"<iframe{dimensions} src="{}//player.vimeo.com/video/{}{query}{start}" frameborder="0"{}></iframe>"#,
                    self.asset_uri_scheme(),
                    escape_html(video),
                    boolean_attr("allowfullscreen", !node.has_option("nofullscreen"))
                )
            }
            Some("youtube") => self.youtube_player(node, target, &dimensions),
            poster => {
                let poster = poster
                    .filter(|p| !p.is_empty())
                    .map(|p| format!(r#" poster="{}""#, escape_html(&self.media_uri(p))))
                    .unwrap_or_default();
                let preload = opt_attr("preload", node.attr("preload").filter(|p| !p.is_empty()));
                format!(
                    "<video src=\"{}{}\"{dimensions}{poster}{}{}{}{}{preload}>\nYour browser does not support the video tag.\n</video>",
                    escape_html(&self.media_uri(target)),
                    time_anchor(node),
                    boolean_attr("autoplay", node.has_option("autoplay")),
                    boolean_attr("controls", !node.has_option("nocontrols")),
                    boolean_attr("loop", node.has_option("loop")),
                    boolean_attr("muted", node.has_option("muted")),
                )
            }
        };
        format!(
            "<div{}{}>{title}\n<div class=\"content\">\n{player}\n</div>\n</div>",
            id_attr(node.id.as_deref()),
            classes.attr()
        )
    }

    fn youtube_player(&self, node: &Node, target: &str, dimensions: &str) -> String {
        let mut params = vec![format!("rel={}", u8::from(node.has_option("related")))];
        for (attr, param) in [("start", "start"), ("end", "end")] {
            if let Some(value) = node.attr(attr) {
                params.push(format!("{param}={}", escape_html(value)));
            }
        }
        for (option, param) in [("autoplay", "autoplay=1"), ("loop", "loop=1"), ("muted", "mute=1"), ("nocontrols", "controls=0")] {
            if node.has_option(option) {
                params.push(param.to_owned());
            }
        }
        let (video, list) = match target.split_once('/') {
            Some((video, list)) => (video, Some(list)),
            None => (target, node.attr("list")),
        };
        let video = if let Some(list) = list {
            params.push(format!("list={}", escape_html(list)));
            video
        } else {
            let (video, playlist) = match video.split_once(',') {
                Some((video, playlist)) => (video, Some(playlist)),
                None => (video, node.attr("playlist")),
            };
            if let Some(playlist) = playlist {
                params.push(format!("playlist={},{}", escape_html(video), escape_html(playlist)));
            } else if node.has_option("loop") {
                params.push(format!("playlist={}", escape_html(video)));
            }
            video
        };
        let fullscreen = !node.has_option("nofullscreen");
        if !fullscreen {
            params.push("fs=0".to_owned());
        }
        if node.has_option("modest") {
            params.push("modestbranding=1".to_owned());
        }
        if let Some(theme) = node.attr("theme") {
            params.push(format!("theme={}", escape_html(theme)));
        }
        if let Some(lang) = node.attr("lang") {
            params.push(format!("hl={}", escape_html(lang)));
        }
        format!(
            r#"<iframe{dimensions} src="{}//www.youtube.com/embed/{}?{}" frameborder="0"{}></iframe>"#,
            self.asset_uri_scheme(),
            escape_html(video),
            params.join("&amp;"),
            boolean_attr("allowfullscreen", fullscreen)
        )
    }
}
