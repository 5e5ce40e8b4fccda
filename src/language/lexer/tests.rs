use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).iter().map(Token::kind).collect()
}

mod scanning {
    use super::*;

    #[test]
    pub fn test_empty_input() {
        let tokens = tokenize("");

        assert_eq!(1, tokens.len());
        assert_eq!(TokenKind::Eof, tokens[0].kind());
    }

    #[test]
    pub fn test_always_ends_with_eof() {
        for source in ["1", "print 1;", "\"abc", "@#", "/* open", "// comment", "a\n\n"] {
            let tokens = tokenize(source);
            assert_eq!(Some(TokenKind::Eof), tokens.last().map(Token::kind), "source: {:?}", source);
        }
    }

    #[test]
    pub fn test_simple_sum() {
        let tokens = tokenize("1+2");

        assert_eq!(vec![TokenKind::Number, TokenKind::Plus, TokenKind::Number, TokenKind::Eof],
                   tokens.iter().map(Token::kind).collect::<Vec<_>>());

        assert_eq!(&Literal::Number(1.0), tokens[0].literal());
        assert_eq!(&Literal::Number(2.0), tokens[2].literal());

        assert_eq!(&TokenSpan::new(1, 0, 1), tokens[0].span());
        assert_eq!(&TokenSpan::new(1, 1, 2), tokens[1].span());
        assert_eq!(&TokenSpan::new(1, 2, 3), tokens[2].span());
    }

    #[test]
    pub fn test_maximal_munch() {
        assert_eq!(vec![
            TokenKind::Greater, TokenKind::GreaterEqual, TokenKind::GreaterGreater,
            TokenKind::Less, TokenKind::LessEqual, TokenKind::LessLess,
            TokenKind::Ampersand, TokenKind::AmpersandAmpersand,
            TokenKind::Pipe, TokenKind::PipePipe,
            TokenKind::Eof,
        ], kinds("> >= >> < <= << & && | ||"));

        assert_eq!(vec![
            TokenKind::Plus, TokenKind::PlusPlus, TokenKind::PlusEqual,
            TokenKind::Minus, TokenKind::MinusMinus, TokenKind::MinusEqual,
            TokenKind::Star, TokenKind::StarStar, TokenKind::StarEqual,
            TokenKind::Slash, TokenKind::SlashEqual,
            TokenKind::Equal, TokenKind::EqualEqual, TokenKind::Bang, TokenKind::BangEqual,
            TokenKind::Eof,
        ], kinds("+ ++ += - -- -= * ** *= / /= = == ! !="));

        // Without spaces the longest operator wins
        assert_eq!(vec![TokenKind::Identifier, TokenKind::PlusPlus, TokenKind::Plus, TokenKind::Identifier, TokenKind::Eof],
                   kinds("a+++b"));
    }

    #[test]
    pub fn test_punctuation() {
        assert_eq!(vec![
            TokenKind::ParenthesisLeft, TokenKind::ParenthesisRight,
            TokenKind::BraceLeft, TokenKind::BraceRight,
            TokenKind::BracketLeft, TokenKind::BracketRight,
            TokenKind::Comma, TokenKind::Dot, TokenKind::Semicolon,
            TokenKind::Question, TokenKind::Colon, TokenKind::Percent,
            TokenKind::Dollar, TokenKind::Caret, TokenKind::Tilde,
            TokenKind::Eof,
        ], kinds("(){}[],.;?:%$^~"));
    }

    #[test]
    pub fn test_numbers() {
        let tokens = tokenize("42 3.25 7.");

        assert_eq!(&Literal::Number(42.0), tokens[0].literal());
        assert_eq!(&Literal::Number(3.25), tokens[1].literal());
        assert_eq!("3.25", tokens[1].lexeme());

        // A trailing dot is not part of the number
        assert_eq!(TokenKind::Number, tokens[2].kind());
        assert_eq!(&Literal::Number(7.0), tokens[2].literal());
        assert_eq!(TokenKind::Dot, tokens[3].kind());
    }

    #[test]
    pub fn test_keywords_and_identifiers() {
        assert_eq!(vec![
            TokenKind::Var, TokenKind::Val, TokenKind::Print, TokenKind::True, TokenKind::False,
            TokenKind::Nil, TokenKind::Function, TokenKind::While, TokenKind::Identifier,
            TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof,
        ], kinds("var val print true false nil func while Print _private var2"));
    }
}

mod strings {
    use super::*;

    #[test]
    pub fn test_string_literal() {
        let tokens = tokenize("\"hello world\"");

        assert_eq!(TokenKind::String, tokens[0].kind());
        assert_eq!("\"hello world\"", tokens[0].lexeme());
        assert_eq!(&Literal::String(String::from("hello world")), tokens[0].literal());
    }

    #[test]
    pub fn test_multiline_string() {
        let tokens = tokenize("\"ab\ncd\" x");

        assert_eq!(&Literal::String(String::from("abcd")), tokens[0].literal());
        assert_eq!(1, tokens[0].line());

        // The identifier after the string sits on the second line
        assert_eq!(TokenKind::Identifier, tokens[1].kind());
        assert_eq!(&TokenSpan::new(2, 4, 5), tokens[1].span());
    }

    #[test]
    pub fn test_unterminated_string() {
        let tokens = tokenize("\"abc");

        assert_eq!(vec![TokenKind::Error, TokenKind::Eof], tokens.iter().map(Token::kind).collect::<Vec<_>>());
        assert!(tokens[0].lexeme().contains("Unterminated string"));
    }
}

mod comments {
    use super::*;

    #[test]
    pub fn test_line_comment() {
        let tokens = tokenize("1 // one\n2");

        assert_eq!(vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof],
                   tokens.iter().map(Token::kind).collect::<Vec<_>>());
        assert_eq!(&TokenSpan::new(2, 0, 1), tokens[1].span());
    }

    #[test]
    pub fn test_block_comment_tracks_lines() {
        let tokens = tokenize("/* one\ntwo\n*/ x");

        assert_eq!(TokenKind::Identifier, tokens[0].kind());
        assert_eq!(&TokenSpan::new(3, 3, 4), tokens[0].span());
    }

    #[test]
    pub fn test_unterminated_block_comment() {
        let tokens = tokenize("1 /* never closed");

        assert_eq!(vec![TokenKind::Number, TokenKind::Error, TokenKind::Eof],
                   tokens.iter().map(Token::kind).collect::<Vec<_>>());
        assert!(tokens[1].lexeme().contains("Unterminated block comment"));
    }
}

mod errors {
    use super::*;

    #[test]
    pub fn test_unexpected_character_continues() {
        let tokens = tokenize("1 @ 2");

        assert_eq!(vec![TokenKind::Number, TokenKind::Error, TokenKind::Number, TokenKind::Eof],
                   tokens.iter().map(Token::kind).collect::<Vec<_>>());
        assert_eq!("[line 1, column 2] Unexpected character '@'", tokens[1].lexeme());
        assert_eq!(&Literal::String(String::from("[line 1, column 2] Unexpected character '@'")), tokens[1].literal());
    }

    #[test]
    pub fn test_token_display() {
        let tokens = tokenize("12");
        assert_eq!("Token(NUMBER, `12`, 12, [line 1(0:2)])", tokens[0].to_string());
    }
}

mod literals {
    use super::*;

    #[test]
    pub fn test_predicates_and_accessors() {
        let tokens = tokenize("\"text\" 2.5 true nil");

        let string = tokens[0].literal();
        assert!(string.is_string() && !string.is_number());
        assert_eq!(Some("text"), string.as_str());
        assert_eq!(None, string.as_number());

        let number = tokens[1].literal();
        assert!(number.is_number() && !number.is_bool());
        assert_eq!(Some(2.5), number.as_number());
        assert_eq!(None, number.as_str());

        // Keyword tokens carry no payload, the parser builds their values
        assert!(tokens[2].literal().is_nil());

        let boolean = Literal::Boolean(true);
        assert!(boolean.is_bool() && !boolean.is_nil());
        assert_eq!(Some(true), boolean.as_bool());
        assert_eq!(None, Literal::Nil.as_bool());
    }

    #[test]
    pub fn test_renderings() {
        let string = Literal::String(String::from("a b"));
        assert_eq!("\"a b\"", string.stringify());
        assert_eq!("a b", string.to_string());
        assert_eq!("3", Literal::Number(3.0).stringify());
    }

    #[test]
    pub fn test_invalid_number_message() {
        let error = LexerError::InvalidNumber { pos: TokenPos::new(2, 4), text: String::from("1e") };
        assert_eq!("[line 2, column 4] Invalid number literal '1e'", error.to_string());
    }
}
