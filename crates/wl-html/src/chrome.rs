//! Static page chrome: head assets, site navigation and footer.
//!
//! Navigation and footer markup can be replaced per language through the
//! `[chrome]` section of `wl.toml`; the built-in site chrome is used
//! otherwise.

use std::fmt::Write;

use wl_config::NavLink;

use crate::attrs::escape_html;

/// Font preconnects, web fonts and the site stylesheet.
pub(crate) const HEAD_ASSETS: &str = r#"<link rel="preconnect" href="https://fonts.googleapis.com">
<link rel="preconnect" href="https://fonts.gstatic.com" crossorigin="">
<link href="https://fonts.googleapis.com/css2?family=Oxygen:wght@400;700&amp;display=swap" rel="stylesheet">
<link href="https://fonts.googleapis.com/css2?family=Noto+Serif+SC:wght@400;700&amp;display=swap" rel="stylesheet">
<link href="https://fonts.googleapis.com/css2?family=Noto+Sans+SC:wght@400;700&amp;display=swap" rel="stylesheet">
<link href="https://cdn.jsdelivr.net/npm/hack-font@3/build/web/hack.css" rel="stylesheet">
<link rel="stylesheet" href="/style.css">"#;

/// KaTeX auto-render and mermaid runtime, loaded when `stem` is set.
pub(crate) const STEM_ASSETS: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.css" integrity="sha384-nB0miv6/jRmo5UMMR1wu3Gz6NLsoTkbqJghGIsx//Rlm+ZU03BU6SQNC66uf4l5+" crossorigin="anonymous">
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.js" integrity="sha384-7zkQWkzuo3B5mTepMUcHkMB5jZaolc2xDwL6VFqjFALcbeS9Ggm/Yr2r3Dy4lfFg" crossorigin="anonymous"></script>
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/contrib/auto-render.min.js" integrity="sha384-43gviWU0YVjaDtb/GhzOouOXtZMP/7XUzwPTstBeZFe/+rCMvRwr4yROQP43s0Xk" crossorigin="anonymous" onload="renderMathInElement(document.body);"></script>
<script src="https://cdn.jsdelivr.net/npm/mermaid@11.0.2/dist/mermaid.min.js" onload="mermaid.initialize({ startOnLoad: true });"></script>"#;

pub(crate) const FONT_AWESOME_VERSION: &str = "4.7.0";

const NAV_ZH: &[(&str, &str)] = &[
    ("主页", "/zh/index.html"),
    ("文章", "/zh/posts.html"),
    ("关于", "/zh/about.html"),
    ("English", "/index.html"),
    ("Github", "https://github.com/waterlens"),
];

const NAV_EN: &[(&str, &str)] = &[
    ("Home", "/index.html"),
    ("Posts", "/posts.html"),
    ("About", "/about.html"),
    ("中文", "/zh/index.html"),
    ("Github", "https://github.com/waterlens"),
];

const LICENSE_BADGES: &str = r#"<img alt="" style="height:22px!important;margin-left:3px;vertical-align:text-bottom;" src="https://mirrors.creativecommons.org/presskit/icons/cc.svg?ref=chooser-v1">
        <img alt="" style="height:22px!important;margin-left:3px;vertical-align:text-bottom;" src="https://mirrors.creativecommons.org/presskit/icons/by.svg?ref=chooser-v1">
        <img alt="" style="height:22px!important;margin-left:3px;vertical-align:text-bottom;" src="https://mirrors.creativecommons.org/presskit/icons/sa.svg?ref=chooser-v1">"#;

const LICENSE_LINK: &str = r#"<a href="http://creativecommons.org/licenses/by-sa/4.0/?ref=chooser-v1" target="_blank" rel="license noopener noreferrer" style="display:inline-block;">"#;

/// `<nav>` block for `lang`.
pub(crate) fn navigation(configured: Option<&[NavLink]>, lang: &str) -> String {
    let mut html = String::from("<nav>\n");
    match configured {
        Some(links) => {
            for link in links {
                write_nav_link(&mut html, &link.title, &link.href);
            }
        }
        None => {
            let links = if lang == "zh-hans" { NAV_ZH } else { NAV_EN };
            for (title, href) in links {
                write_nav_link(&mut html, title, href);
            }
        }
    }
    html.push_str("</nav>");
    html
}

fn write_nav_link(html: &mut String, title: &str, href: &str) {
    let _ = writeln!(
        html,
        "  <a href=\"{}\">{}</a>",
        escape_html(href),
        escape_html(title)
    );
}

/// `<footer>` block for `lang`.
pub(crate) fn footer(configured: Option<&str>, lang: &str) -> String {
    if let Some(footer) = configured {
        return footer.to_owned();
    }
    let mut html = String::from("<footer>\n  <p>\n");
    if lang == "zh-hans" {
        html.push_str(
            "    <a property=\"dct:title\" rel=\"cc:attributionURL\" href=\"/zh/index.html\">本站</a>\n",
        );
        html.push_str("    由 <span property=\"cc:attributionName\">Waterlens</span>\n");
        html.push_str("    创作的一切内容 © 2021 - 2024 在\n");
        let _ = writeln!(html, "    {LICENSE_LINK}");
        let _ = writeln!(html, "        知识共享 署名 - 相同方式共享 4.0 协议 {LICENSE_BADGES}");
        html.push_str("    </a>\n");
        html.push_str("    之条款下提供。\n");
    } else {
        html.push_str(
            "    The content on <a property=\"dct:title\" rel=\"cc:attributionURL\" href=\"/\">this website</a>\n",
        );
        html.push_str("    © 2021 - 2024 by <span property=\"cc:attributionName\">Waterlens</span>\n");
        html.push_str("    is licensed under\n");
        let _ = writeln!(html, "    {LICENSE_LINK}");
        let _ = writeln!(html, "        CC BY-SA 4.0 {LICENSE_BADGES}");
        html.push_str("    </a>\n");
    }
    html.push_str("  </p>\n</footer>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_navigation_by_lang() {
        let en = navigation(None, "en");
        assert!(en.starts_with("<nav>\n  <a href=\"/index.html\">Home</a>\n"));
        assert!(en.ends_with("  <a href=\"https://github.com/waterlens\">Github</a>\n</nav>"));
        let zh = navigation(None, "zh-hans");
        assert!(zh.contains("<a href=\"/zh/index.html\">主页</a>"));
    }

    #[test]
    fn test_configured_navigation() {
        let links = [NavLink::new("Docs & API", "/docs/")];
        assert_eq!(
            navigation(Some(&links), "en"),
            "<nav>\n  <a href=\"/docs/\">Docs &amp; API</a>\n</nav>"
        );
    }

    #[test]
    fn test_footer_by_lang() {
        let en = footer(None, "en");
        assert!(en.starts_with("<footer>\n  <p>\n    The content on"));
        assert!(en.contains("© 2021 - 2024 by"));
        assert!(en.ends_with("  </p>\n</footer>"));
        assert!(footer(None, "zh-hans").contains("之条款下提供。"));
        assert_eq!(footer(Some("<footer>x</footer>"), "en"), "<footer>x</footer>");
    }
}
