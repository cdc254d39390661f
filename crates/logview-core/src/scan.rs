//! Lexical JSON role scanner
//!
//! Classifies each character of serialized JSON as key text, value text,
//! structural punctuation or plain whitespace in a single left-to-right
//! pass. No tree is built, so the original key order and spacing survive
//! untouched.
//!
//! Besides the in-quotes and key-expected bits, the scanner tracks whether
//! the previous character was a backslash, so `\"` inside a string does not
//! end it, and keeps a container stack so that keys of nested objects are
//! still recognised as keys and array elements as values.

/// Display role of a span of JSON text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Object key, quotes included
    Key,
    /// String, number, boolean or null value
    Value,
    /// `{ } [ ] : ,`
    Bracket,
    /// Whitespace between tokens
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object { expect_key: bool },
    Array,
}

/// Character-at-a-time role classifier
#[derive(Debug, Clone, Default)]
pub struct JsonScanner {
    inside_quotes: bool,
    escaped: bool,
    /// Role of the string currently being scanned
    string_role: Option<Role>,
    stack: Vec<Container>,
}

impl JsonScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inside_quotes(&self) -> bool {
        self.inside_quotes
    }

    /// True at the start of an object and after each `,` inside one
    pub fn parsing_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Container::Object { expect_key: true })
        )
    }

    /// Classify `c` and advance the state
    pub fn next_role(&mut self, c: char) -> Role {
        if self.inside_quotes {
            let role = self.string_role.unwrap_or(Role::Value);
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.inside_quotes = false;
                self.string_role = None;
            }
            return role;
        }

        match c {
            '"' => {
                let role = if self.parsing_key() {
                    Role::Key
                } else {
                    Role::Value
                };
                self.inside_quotes = true;
                self.string_role = Some(role);
                role
            }
            '{' => {
                self.stack.push(Container::Object { expect_key: true });
                Role::Bracket
            }
            '[' => {
                self.stack.push(Container::Array);
                Role::Bracket
            }
            '}' | ']' => {
                self.stack.pop();
                Role::Bracket
            }
            ':' => {
                if let Some(Container::Object { expect_key }) = self.stack.last_mut() {
                    *expect_key = false;
                }
                Role::Bracket
            }
            ',' => {
                if let Some(Container::Object { expect_key }) = self.stack.last_mut() {
                    *expect_key = true;
                }
                Role::Bracket
            }
            c if c.is_whitespace() => Role::Plain,
            _ => Role::Value,
        }
    }
}

/// Split `input` into maximal runs of equal role
///
/// Concatenating the returned slices always reproduces `input`.
pub fn segments(input: &str) -> Vec<(Role, &str)> {
    let mut scanner = JsonScanner::new();
    let mut out: Vec<(Role, &str)> = Vec::new();
    let mut run_start = 0;
    let mut run_role: Option<Role> = None;

    for (i, c) in input.char_indices() {
        let role = scanner.next_role(c);
        match run_role {
            Some(current) if current == role => {}
            Some(current) => {
                out.push((current, &input[run_start..i]));
                run_start = i;
                run_role = Some(role);
            }
            None => run_role = Some(role),
        }
    }

    if let Some(role) = run_role {
        out.push((role, &input[run_start..]));
    }

    out
}

/// Re-indent serialized JSON, one member per line
///
/// Works on the text alone: strings, numbers and escapes are copied
/// through exactly as written, so values no parser would accept as a
/// number (`1e400`) or could not hold (a 30-digit integer) survive.
/// Whitespace between tokens is dropped and replaced by the layout
/// `serde_json`'s pretty printer uses; empty containers stay `{}` / `[]`.
pub fn reindent(input: &str, indent: &str) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    let mut depth = 0usize;
    let mut inside_quotes = false;
    let mut escaped = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if inside_quotes {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                inside_quotes = false;
            }
            continue;
        }

        match c {
            '"' => {
                inside_quotes = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                while chars.next_if(|next| next.is_whitespace()).is_some() {}
                if let Some(close) = chars.next_if(|next| matches!(next, '}' | ']')) {
                    out.push(close);
                } else {
                    depth += 1;
                    newline(&mut out, depth, indent);
                }
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth, indent);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, depth, indent);
            }
            ':' => out.push_str(": "),
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }

    out
}

fn newline(out: &mut String, depth: usize, indent: &str) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(indent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text_of(segments: &[(Role, &str)], role: Role) -> String {
        segments
            .iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, s)| *s)
            .collect()
    }

    #[test]
    fn test_flat_object_roles() {
        let segs = segments(r#"{"level":"info","msg":"ok"}"#);
        assert_eq!(
            segs,
            vec![
                (Role::Bracket, "{"),
                (Role::Key, r#""level""#),
                (Role::Bracket, ":"),
                (Role::Value, r#""info""#),
                (Role::Bracket, ","),
                (Role::Key, r#""msg""#),
                (Role::Bracket, ":"),
                (Role::Value, r#""ok""#),
                (Role::Bracket, "}"),
            ]
        );
    }

    #[test]
    fn test_numbers_and_literals_are_values() {
        let segs = segments(r#"{"code":500,"ok":true,"gone":null}"#);
        assert_eq!(text_of(&segs, Role::Value), "500truenull");
    }

    #[test]
    fn test_punctuation_inside_strings_is_not_structural() {
        let segs = segments(r#"{"url":"http://x/a,b{c}"}"#);
        assert_eq!(text_of(&segs, Role::Value), r#""http://x/a,b{c}""#);
        assert_eq!(text_of(&segs, Role::Bracket), "{:}");
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let segs = segments(r#"{"msg":"say \"hi\", then:go","n":1}"#);
        assert_eq!(text_of(&segs, Role::Value), r#""say \"hi\", then:go"1"#);
        assert_eq!(text_of(&segs, Role::Key), r#""msg""n""#);
    }

    #[test]
    fn test_escaped_backslash_before_quote_ends_string() {
        let segs = segments(r#"{"path":"C:\\","next":"v"}"#);
        assert_eq!(text_of(&segs, Role::Key), r#""path""next""#);
    }

    #[test]
    fn test_nested_objects_and_arrays() {
        let segs = segments(r#"{"req":{"method":"GET","tags":["a","b"]},"after":1}"#);
        assert_eq!(
            text_of(&segs, Role::Key),
            r#""req""method""tags""after""#
        );
        assert_eq!(text_of(&segs, Role::Value), r#""GET""a""b"1"#);
    }

    #[test]
    fn test_pretty_whitespace_is_plain() {
        let segs = segments("{\n \"a\": 1\n}");
        assert_eq!(text_of(&segs, Role::Plain), "\n  \n");
    }

    #[test]
    fn test_scanner_state_bits() {
        let mut scanner = JsonScanner::new();
        assert!(!scanner.parsing_key());
        scanner.next_role('{');
        assert!(scanner.parsing_key());
        scanner.next_role('"');
        assert!(scanner.inside_quotes());
        scanner.next_role('\\');
        scanner.next_role('"');
        assert!(scanner.inside_quotes());
        scanner.next_role('"');
        assert!(!scanner.inside_quotes());
        scanner.next_role(':');
        assert!(!scanner.parsing_key());
        scanner.next_role('1');
        scanner.next_role(',');
        assert!(scanner.parsing_key());
    }

    #[test]
    fn test_empty_input() {
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_reindent_layout() {
        assert_eq!(
            reindent(r#"{"a":1,"b":{"c":[true,null]},"d":{},"e":[ ]}"#, " "),
            "{\n \"a\": 1,\n \"b\": {\n  \"c\": [\n   true,\n   null\n  ]\n },\n \"d\": {},\n \"e\": []\n}"
        );
    }

    #[test]
    fn test_reindent_copies_values_verbatim() {
        let json = r#"{"n":1e400,"id":123456789012345678901234567890,"s":"a\"b{,}:[","u":"\u00e9"}"#;
        let pretty = reindent(json, " ");
        assert!(pretty.contains(r#" "n": 1e400,"#));
        assert!(pretty.contains(r#" "id": 123456789012345678901234567890,"#));
        assert!(pretty.contains(r#" "s": "a\"b{,}:[","#));
        assert!(pretty.contains(r#" "u": "\u00e9""#));
    }

    #[test]
    fn test_reindent_drops_existing_whitespace() {
        assert_eq!(
            reindent("{ \"a\" :  [ 1 , 2 ] }", " "),
            reindent(r#"{"a":[1,2]}"#, " ")
        );
    }

    proptest! {
        #[test]
        fn prop_segments_are_lossless(pairs in proptest::collection::vec((".{0,6}", ".{0,6}"), 0..6)) {
            let mut map = serde_json::Map::new();
            for (k, v) in &pairs {
                map.insert(k.clone(), serde_json::Value::String(v.clone()));
            }
            let json = serde_json::Value::Object(map).to_string();
            let joined: String = segments(&json).iter().map(|(_, s)| *s).collect();
            prop_assert_eq!(joined, json);
        }

        #[test]
        fn prop_reindent_matches_pretty_printer(
            pairs in proptest::collection::vec(("[ -~]{0,6}", "[ -~]{0,6}", 0u8..3), 0..6)
        ) {
            let mut map = serde_json::Map::new();
            for (k, v, shape) in &pairs {
                let value = match shape {
                    0 => serde_json::Value::String(v.clone()),
                    1 => serde_json::json!([v, v.len(), null]),
                    _ => serde_json::json!({ "inner": v, "empty": {} }),
                };
                map.insert(k.clone(), value);
            }
            let value = serde_json::Value::Object(map);
            let pretty = serde_json::to_string_pretty(&value).unwrap();
            prop_assert_eq!(reindent(&value.to_string(), "  "), pretty);
        }

        #[test]
        fn prop_keys_survive_escapes(pairs in proptest::collection::vec(("[a-z\"\\\\,:{}]{1,6}", "[a-z\"\\\\,:{}]{0,6}"), 1..6)) {
            let mut map = serde_json::Map::new();
            for (k, v) in &pairs {
                map.insert(k.clone(), serde_json::Value::String(v.clone()));
            }
            let expected_keys: String = map
                .keys()
                .map(|k| serde_json::to_string(k).unwrap())
                .collect();
            let json = serde_json::Value::Object(map).to_string();
            prop_assert_eq!(text_of(&segments(&json), Role::Key), expected_keys);
        }
    }
}
