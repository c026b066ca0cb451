//! Command-line tokenizer: one keyword followed by double-quoted literals.

use super::COMMANDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Command,
    StringLiteral,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Byte offset into the trimmed input.
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }
}

/// Splits a command line into tokens, always ending with `Eof`.
///
/// Input without a recognized keyword yields only `Eof`. Text outside quotes
/// after the keyword is ignored.
pub fn tokenize(input: &str) -> Vec<Token> {
    let input = input.trim();
    let mut tokens = Vec::new();

    if let Some(keyword) = match_keyword(input) {
        tokens.push(Token::new(TokenKind::Command, keyword, 0));
        scan_literals(input, keyword.len(), &mut tokens);
    }

    tokens.push(Token::new(TokenKind::Eof, "", input.len()));
    tokens
}

fn match_keyword(input: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|spec| spec.keyword)
        .filter(|keyword| starts_with_keyword(input, keyword))
        .max_by_key(|keyword| keyword.len())
}

fn starts_with_keyword(input: &str, keyword: &str) -> bool {
    let bytes = input.as_bytes();
    if bytes.len() < keyword.len() || !bytes[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
    {
        return false;
    }
    // Keywords are ASCII, so `keyword.len()` is a char boundary here.
    input[keyword.len()..]
        .chars()
        .next()
        .map_or(true, |next| next.is_whitespace() || next == '"')
}

fn scan_literals(input: &str, start: usize, tokens: &mut Vec<Token>) {
    let mut cursor = start;
    while let Some(open) = input[cursor..].find('"').map(|offset| cursor + offset) {
        let Some(close) = input[open + 1..].find('"').map(|offset| open + 1 + offset) else {
            break;
        };
        tokens.push(Token::new(
            TokenKind::StringLiteral,
            &input[open + 1..close],
            open,
        ));
        cursor = close + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{tokenize, TokenKind};

    fn kinds_and_values(input: &str) -> Vec<(TokenKind, String)> {
        tokenize(input)
            .into_iter()
            .map(|token| (token.kind, token.value))
            .collect()
    }

    #[test]
    fn longest_keyword_wins() {
        let tokens = kinds_and_values(r#"Add Item List "a" "b""#);
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Command, "add item list".to_string()),
                (TokenKind::StringLiteral, "a".to_string()),
                (TokenKind::StringLiteral, "b".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn keyword_needs_word_boundary() {
        let tokens = tokenize("logoutnow");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn unterminated_quote_stops_scanning() {
        let tokens = kinds_and_values(r#"color palette "red" "blue"#);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], (TokenKind::StringLiteral, "red".to_string()));
    }

    #[test]
    fn literal_positions_are_byte_offsets() {
        let tokens = tokenize(r#"add item "Mascara""#);
        assert_eq!(tokens[1].position, 9);
    }
}
