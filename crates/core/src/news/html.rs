// Anchor extraction from search result markup.
// Deliberately small: scans for <a ...>...</a> blocks instead of building a DOM. Tag and
// attribute names are matched ASCII case-insensitively.

/// An `<a>` element: its raw `href` (entities decoded) and visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

/// Every anchor that carries an `href`, in document order.
pub fn anchors(html: &str) -> Vec<Anchor> {
    let lc = to_lowercase_ascii(html);
    let mut out = Vec::new();
    let mut from = 0;

    while let Some(start) = find_tag(&lc, from, "<a") {
        let Some(open_end_rel) = lc[start..].find('>') else {
            break;
        };
        let open_end = start + open_end_rel;
        let open_tag = &html[start..=open_end];

        let Some(inner_end) = find_tag(&lc, open_end + 1, "</a") else {
            break;
        };

        if let Some(href) = attr_value(open_tag, "href") {
            out.push(Anchor {
                href: decode_entities(&href),
                text: visible_text(&html[open_end + 1..inner_end]),
            });
        }

        from = inner_end + 3;
    }

    out
}

// Position of `prefix` where the tag name ends right after it, so `<a` never matches
// `<abbr>` or `<area>` and `</a` never matches `</abbr>` or `</aside>`.
fn find_tag(lc: &str, mut from: usize, prefix: &str) -> Option<usize> {
    while let Some(rel) = lc[from..].find(prefix) {
        let at = from + rel;
        let after = at + prefix.len();
        if matches!(lc.as_bytes().get(after), Some(b) if b.is_ascii_whitespace() || *b == b'>') {
            return Some(at);
        }
        from = after;
    }
    None
}

/// Reads `name=...` from an opening tag. Handles double, single and unquoted values.
///
/// Attributes are walked in order, so text inside another attribute's quoted value is never
/// mistaken for an attribute name.
pub fn attr_value(open_tag: &str, name: &str) -> Option<String> {
    let bytes = open_tag.as_bytes();
    let len = bytes.len();
    let is_ws = |i: usize| i < len && bytes[i].is_ascii_whitespace();

    // Skip `<` and the tag name.
    let mut i = usize::from(bytes.first() == Some(&b'<'));
    while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'>' | b'/') {
        i += 1;
    }

    loop {
        while is_ws(i) || (i < len && bytes[i] == b'/') {
            i += 1;
        }
        if i >= len || bytes[i] == b'>' {
            return None;
        }

        let name_start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'>' | b'/') {
            i += 1;
        }
        if i == name_start {
            // Stray `=`.
            i += 1;
            continue;
        }
        let attr_name = &open_tag[name_start..i];

        let mut j = i;
        while is_ws(j) {
            j += 1;
        }
        if j >= len || bytes[j] != b'=' {
            // Valueless attribute such as `download`.
            continue;
        }
        j += 1;
        while is_ws(j) {
            j += 1;
        }

        let value = match bytes.get(j) {
            Some(&q @ (b'"' | b'\'')) => {
                let body = j + 1;
                let end = body + open_tag[body..].find(char::from(q))?;
                i = end + 1;
                &open_tag[body..end]
            }
            _ => {
                let start = j;
                while j < len && !bytes[j].is_ascii_whitespace() && bytes[j] != b'>' {
                    j += 1;
                }
                i = j;
                &open_tag[start..j]
            }
        };

        if attr_name.eq_ignore_ascii_case(name) {
            return Some(value.to_string());
        }
    }
}

/// Strips tags, decodes common entities and collapses whitespace.
pub fn visible_text(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&decode_entities(&out))
}

pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ASCII-only lowercasing keeps byte offsets aligned with the input.
fn to_lowercase_ascii(s: &str) -> String {
    s.chars().map(|c| c.to_ascii_lowercase()).collect()
}
