// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

/// 摘要允许的标签
pub const ALLOWED_TAGS: &[&str] = &["p", "b", "ol", "li"];

/// 有序列表中允许的最大条目数
pub const MAX_LIST_ITEMS: usize = 10;

static SCRIPT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static BLOCK_END_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</\s*(p|li|ol)\s*>|<\s*br\s*/?>").unwrap());
static LIST_ITEM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*li\b[^>]*>").unwrap());
static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)\b[^>]*>").unwrap());

/// 把标签名映射到允许的词汇表，`None` 表示丢弃标签但保留其文本
fn canonical_tag(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some("p"),
        "b" | "strong" => Some("b"),
        "ol" | "ul" => Some("ol"),
        "li" => Some("li"),
        _ => None,
    }
}

/// 按白名单清理摘要 HTML
///
/// - `script`、`style` 和注释连同内容一起删除
/// - 标题映射为 `p`，`strong` 映射为 `b`，`ul` 映射为 `ol`
/// - 其余标签删除但保留文本，属性一律丢弃
/// - 每个列表最多保留 `MAX_LIST_ITEMS` 个条目
/// - 文本中的 `<`、`>` 被转义
pub fn sanitize_summary_html(html: &str) -> String {
    let html = SCRIPT_REGEX.replace_all(html, "");
    let html = STYLE_REGEX.replace_all(&html, "");
    let html = COMMENT_REGEX.replace_all(&html, "");

    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    // item counts of the currently open lists, innermost last
    let mut list_items: Vec<usize> = Vec::new();
    // li nesting depth inside a dropped item, 0 when not dropping
    let mut dropping = 0usize;

    for caps in TAG_REGEX.captures_iter(&html) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        if dropping == 0 {
            push_text(&mut out, &html[cursor..whole.start]);
        }
        cursor = whole.end;

        let closing = !caps[1].is_empty();
        let Some(tag) = canonical_tag(&caps[2]) else {
            continue;
        };

        if dropping > 0 {
            if tag == "li" {
                if closing {
                    dropping -= 1;
                } else {
                    dropping += 1;
                }
            }
            continue;
        }

        match (tag, closing) {
            ("ol", false) => list_items.push(0),
            ("ol", true) => {
                if list_items.pop().is_none() {
                    continue;
                }
            }
            ("li", false) => {
                if let Some(count) = list_items.last_mut() {
                    if *count >= MAX_LIST_ITEMS {
                        dropping = 1;
                        continue;
                    }
                    *count += 1;
                }
            }
            _ => {}
        }

        if closing {
            out.push_str("</");
        } else {
            out.push('<');
        }
        out.push_str(tag);
        out.push('>');
    }

    if dropping == 0 {
        push_text(&mut out, &html[cursor..]);
    }

    out.trim().to_string()
}

fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// 检查 HTML 是否只使用允许的标签
pub fn uses_only_allowed_tags(html: &str) -> bool {
    TAG_REGEX
        .captures_iter(html)
        .all(|caps| ALLOWED_TAGS.contains(&caps[2].to_ascii_lowercase().as_str()))
}

/// 把摘要 HTML 转为适合保存为 `.txt` 的纯文本
///
/// 段落和列表项各占一行，列表项以 `- ` 开头，实体被解码
pub fn summary_to_plain_text(html: &str) -> String {
    let html = LIST_ITEM_REGEX.replace_all(html, "- ");
    let html = BLOCK_END_REGEX.replace_all(&html, "\n");
    let text = TAG_REGEX.replace_all(&html, "");
    let text = html_escape::decode_html_entities(&text);

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
