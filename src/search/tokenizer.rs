use once_cell::sync::Lazy;
use regex::Regex;
use tantivy::tokenizer::{Token, TokenStream, Tokenizer};

/// Tokenizer name registered for raw-text indexing
pub const CJK_UNIGRAM: &str = "cjk_unigram";
/// Tokenizer name registered for precomputed-token indexing
pub const WHITESPACE_LOWER: &str = "whitespace_lower";

// One CJK ideograph, or one run of ASCII letters/digits
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{4E00}-\x{9FFF}]|[A-Za-z0-9]+").unwrap());

/// How every field of one index is tokenized. Chosen once per corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// Notes carry `search_tokens` from an upstream segmenter; split on whitespace only
    Precomputed,
    /// Raw text; CJK unigrams plus ASCII words
    Fallback,
}

impl IndexMode {
    pub fn tokenizer_name(self) -> &'static str {
        match self {
            IndexMode::Precomputed => WHITESPACE_LOWER,
            IndexMode::Fallback => CJK_UNIGRAM,
        }
    }

    /// Tokenize text exactly as the index for this mode does
    pub fn tokenize(self, text: &str) -> Vec<String> {
        let tokens = match self {
            IndexMode::Precomputed => whitespace_tokens(text),
            IndexMode::Fallback => cjk_unigram_tokens(text),
        };
        tokens.into_iter().map(|t| t.text).collect()
    }
}

struct TokenData {
    text: String,
    offset_from: usize,
    offset_to: usize,
}

fn cjk_unigram_tokens(text: &str) -> Vec<TokenData> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| TokenData {
            text: m.as_str().to_lowercase(),
            offset_from: m.start(),
            offset_to: m.end(),
        })
        .collect()
}

fn whitespace_tokens(text: &str) -> Vec<TokenData> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (pos, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(from) = start.take() {
                tokens.push(TokenData {
                    text: text[from..pos].to_lowercase(),
                    offset_from: from,
                    offset_to: pos,
                });
            }
        } else if start.is_none() {
            start = Some(pos);
        }
    }
    if let Some(from) = start {
        tokens.push(TokenData {
            text: text[from..].to_lowercase(),
            offset_from: from,
            offset_to: text.len(),
        });
    }

    tokens
}

/// Each CJK ideograph (U+4E00..U+9FFF) is its own token; ASCII letter/digit
/// runs form words. Everything else separates tokens. Output is lowercased.
#[derive(Clone, Default)]
pub struct CjkUnigramTokenizer;

impl Tokenizer for CjkUnigramTokenizer {
    type TokenStream<'a> = PreTokenizedStream;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        PreTokenizedStream::new(cjk_unigram_tokens(text))
    }
}

/// Splits on whitespace runs only, lowercasing each token.
#[derive(Clone, Default)]
pub struct WhitespaceLowerTokenizer;

impl Tokenizer for WhitespaceLowerTokenizer {
    type TokenStream<'a> = PreTokenizedStream;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        PreTokenizedStream::new(whitespace_tokens(text))
    }
}

/// Replays tokens produced up front by one of the splitters above.
pub struct PreTokenizedStream {
    pending: std::vec::IntoIter<TokenData>,
    token: Token,
}

impl PreTokenizedStream {
    fn new(tokens: Vec<TokenData>) -> Self {
        Self {
            pending: tokens.into_iter(),
            token: Token::default(),
        }
    }
}

impl TokenStream for PreTokenizedStream {
    fn advance(&mut self) -> bool {
        let Some(data) = self.pending.next() else {
            return false;
        };
        // Token::default() starts at usize::MAX so the first token lands on 0
        self.token.position = self.token.position.wrapping_add(1);
        self.token.position_length = 1;
        self.token.offset_from = data.offset_from;
        self.token.offset_to = data.offset_to;
        self.token.text = data.text;
        true
    }

    fn token(&self) -> &Token {
        &self.token
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }
}
