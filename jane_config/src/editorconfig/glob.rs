//! Glob patterns used as `.editorconfig` section names.
//!
//! Supported syntax: `*` (anything but `/`), `**` (anything), `?`,
//! `[abc]`, `[a-z]`, `[!abc]`, `{a,b}` (nestable), `{n1..n2}` integer
//! ranges and `\` escapes.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Char(char),
    Any,
    Star,
    DoubleStar,
    Class { negated: bool, ranges: Vec<(char, char)> },
    Range(i64, i64),
}

#[derive(Debug, Clone)]
struct Alternative {
    /// Contains a `/`: matched against the path relative to the
    /// `.editorconfig` directory instead of the bare file name
    anchored: bool,
    tokens: Vec<Token>,
}

/// A compiled section pattern.
#[derive(Debug, Clone)]
pub struct Glob {
    alternatives: Vec<Alternative>,
}

impl Glob {
    pub fn new(pattern: &str) -> Glob {
        let alternatives = expand_braces(pattern)
            .into_iter()
            .map(|expanded| {
                let anchored = expanded.contains('/');
                let body = expanded.strip_prefix('/').unwrap_or(&expanded);
                Alternative { anchored, tokens: tokenize(body) }
            })
            .collect();
        Glob { alternatives }
    }

    /// Match a `/`-separated path relative to the directory holding the
    /// pattern.
    pub fn matches(&self, relative_path: &str) -> bool {
        let path: Vec<char> = relative_path.chars().collect();
        let name_start = path.iter().rposition(|&c| c == '/').map_or(0, |i| i + 1);

        self.alternatives.iter().any(|alt| {
            let target = if alt.anchored { &path[..] } else { &path[name_start..] };
            match_tokens(&alt.tokens, target)
        })
    }
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

/// Index of the `}` closing the `{` at `open`, honouring nesting and escapes.
fn find_closing(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split brace contents on commas that are not nested or escaped.
fn split_top_level(inner: &[char]) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0;
    let mut start = 0;
    let mut i = 0;
    while i < inner.len() {
        match inner[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(collect(&inner[start..i]));
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(collect(&inner[start.min(inner.len())..]));
    parts
}

fn parse_range(inner: &str) -> Option<(i64, i64)> {
    let (lo, hi) = inner.split_once("..")?;
    let valid = |s: &str| {
        let digits = s.strip_prefix('-').unwrap_or(s);
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    };
    if !valid(lo) || !valid(hi) {
        return None;
    }
    let (lo, hi) = (lo.parse::<i64>().ok()?, hi.parse::<i64>().ok()?);
    Some((lo.min(hi), lo.max(hi)))
}

/// Expand `{a,b}` alternatives into separate patterns. Numeric ranges stay
/// in place; braces without a comma become literal text.
fn expand_braces(pattern: &str) -> Vec<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '{' => {
                let prefix = collect(&chars[..i]);
                let Some(close) = find_closing(&chars, i) else {
                    return expand_braces(&format!("{}\\{{{}", prefix, collect(&chars[i + 1..])));
                };
                let inner = &chars[i + 1..close];
                let suffix = collect(&chars[close + 1..]);

                let alternatives = split_top_level(inner);
                if alternatives.len() > 1 {
                    return alternatives
                        .iter()
                        .flat_map(|alt| expand_braces(&format!("{}{}{}", prefix, alt, suffix)))
                        .collect();
                }
                if parse_range(&collect(inner)).is_some() {
                    i = close + 1;
                    continue;
                }
                return expand_braces(&format!("{}\\{{{}\\}}{}", prefix, collect(inner), suffix));
            }
            _ => i += 1,
        }
    }

    vec![pattern.to_string()]
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                tokens.push(Token::Char(chars[i + 1]));
                i += 2;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::DoubleStar);
                i += 2;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '?' => {
                tokens.push(Token::Any);
                i += 1;
            }
            '[' => match parse_class(&chars, i) {
                Some((token, next)) => {
                    tokens.push(token);
                    i = next;
                }
                None => {
                    tokens.push(Token::Char('['));
                    i += 1;
                }
            },
            '{' => {
                let range = chars[i + 1..]
                    .iter()
                    .position(|&c| c == '}')
                    .and_then(|len| parse_range(&collect(&chars[i + 1..i + 1 + len])).map(|r| (r, len)));
                match range {
                    Some(((lo, hi), len)) => {
                        tokens.push(Token::Range(lo, hi));
                        i += len + 2;
                    }
                    None => {
                        tokens.push(Token::Char('{'));
                        i += 1;
                    }
                }
            }
            c => {
                tokens.push(Token::Char(c));
                i += 1;
            }
        }
    }

    tokens
}

/// Parse `[...]` starting at `open`; returns the token and the index after
/// the closing bracket. Classes containing `/` are not classes.
fn parse_class(chars: &[char], open: usize) -> Option<(Token, usize)> {
    let mut i = open + 1;
    let negated = matches!(chars.get(i), Some('!') | Some('^'));
    if negated {
        i += 1;
    }

    let mut ranges = Vec::new();
    let mut first = true;
    while i < chars.len() {
        let mut c = chars[i];
        if c == ']' && !first {
            return Some((Token::Class { negated, ranges }, i + 1));
        }
        if c == '/' {
            return None;
        }
        if c == '\\' && i + 1 < chars.len() {
            i += 1;
            c = chars[i];
        }
        if chars.get(i + 1) == Some(&'-') && chars.get(i + 2).is_some_and(|&e| e != ']') {
            ranges.push((c, chars[i + 2]));
            i += 3;
        } else {
            ranges.push((c, c));
            i += 1;
        }
        first = false;
    }
    None
}

fn match_tokens(tokens: &[Token], text: &[char]) -> bool {
    let Some((token, rest)) = tokens.split_first() else {
        return text.is_empty();
    };

    match token {
        Token::Char(c) => text.first() == Some(c) && match_tokens(rest, &text[1..]),
        Token::Any => matches!(text.first(), Some(&c) if c != '/') && match_tokens(rest, &text[1..]),
        Token::Class { negated, ranges } => match text.first() {
            Some(&c) if c != '/' => {
                let hit = ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
                hit != *negated && match_tokens(rest, &text[1..])
            }
            _ => false,
        },
        Token::Star => {
            for i in 0..=text.len() {
                if match_tokens(rest, &text[i..]) {
                    return true;
                }
                if i < text.len() && text[i] == '/' {
                    break;
                }
            }
            false
        }
        Token::DoubleStar => (0..=text.len()).any(|i| match_tokens(rest, &text[i..])),
        Token::Range(lo, hi) => {
            let sign = usize::from(text.first() == Some(&'-'));
            let digits = text[sign..].iter().take_while(|c| c.is_ascii_digit()).count();
            (1..=digits).rev().any(|len| {
                let number: String = text[..sign + len].iter().collect();
                number
                    .parse::<i64>()
                    .is_ok_and(|n| *lo <= n && n <= *hi)
                    && match_tokens(rest, &text[sign + len..])
            })
        }
    }
}
