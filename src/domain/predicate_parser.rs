//! Predicate DSL parser.
//!
//! Recursive descent over the textual strategy descriptor, producing the
//! predicate AST. Errors carry the character offset of the failure so the
//! CLI can point a caret at it.
//!
//! Grammar sketch:
//!
//! ```text
//! predicate  := GT(p, p) | LT(p, p)
//!             | CROSS_OVER(p, p) | CROSS_UNDER(p, p)
//!             | TREND_UP(p, n) | TREND_DOWN(p, n)
//!             | CHANGE(p, pct, n)
//!             | INTRABAR_CHANGE(high_low | open_close, pct)
//!             | FIB(level, up | down, n)
//!             | AND(predicate, predicate, ...) | OR(predicate, predicate, ...)
//!             | AFTER(predicate, n)
//! p          := open | high | low | close | volume | number
//!             | SMA(n) | EMA(n) | WMA(n) | RSI(n) | ROC(n) | MFI(n)
//! ```

use crate::domain::error::ParseError;
use crate::domain::indicator::IndicatorType;
use crate::domain::predicate::{FibLevel, IntraBarBasis, Predicate, TrendDirection};
use crate::domain::provider::{PriceField, Provider};

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            position: self.pos,
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{expected}', found '{ch}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn peek_word(&self) -> String {
        let word: String = self
            .remaining()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if word.is_empty() {
            self.peek()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "end of input".to_string())
        } else {
            word
        }
    }

    fn consume_word(&mut self) -> String {
        self.skip_whitespace();
        let word: String = self
            .remaining()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        self.pos += word.len();
        word
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut has_dot = false;
        let mut digits = 0;

        if self.peek() == Some('-') {
            self.advance();
        }

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits += 1;
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        if digits == 0 {
            return Err(ParseError {
                message: "expected number".to_string(),
                position: start,
            });
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<f64>().map_err(|_| ParseError {
            message: format!("invalid number: {num_str}"),
            position: start,
        })
    }

    fn parse_integer(&mut self) -> Result<usize, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut digits = 0;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits += 1;
                self.advance();
            } else {
                break;
            }
        }

        if digits == 0 {
            return Err(ParseError {
                message: "expected integer".to_string(),
                position: start,
            });
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<usize>().map_err(|_| ParseError {
            message: format!("invalid integer: {num_str}"),
            position: start,
        })
    }

    fn parse_provider(&mut self) -> Result<Provider, ParseError> {
        self.skip_whitespace();

        if self
            .peek()
            .is_some_and(|ch| ch.is_ascii_digit() || ch == '-' || ch == '.')
        {
            return Ok(Provider::Constant(self.parse_number()?));
        }

        let word_start = self.pos;
        let word = self.consume_word();

        let field = match word.as_str() {
            "open" => Some(PriceField::Open),
            "high" => Some(PriceField::High),
            "low" => Some(PriceField::Low),
            "close" => Some(PriceField::Close),
            "volume" => Some(PriceField::Volume),
            _ => None,
        };
        if let Some(field) = field {
            return Ok(Provider::Field(field));
        }

        let make_indicator: Option<fn(usize) -> IndicatorType> = match word.as_str() {
            "SMA" => Some(IndicatorType::Sma),
            "EMA" => Some(IndicatorType::Ema),
            "WMA" => Some(IndicatorType::Wma),
            "RSI" => Some(IndicatorType::Rsi),
            "ROC" => Some(IndicatorType::Roc),
            "MFI" => Some(IndicatorType::Mfi),
            _ => None,
        };

        match make_indicator {
            Some(make) => {
                self.expect_char('(')?;
                let period = self.parse_integer()?;
                self.expect_char(')')?;
                Ok(Provider::Indicator(make(period)))
            }
            None => Err(ParseError {
                message: format!(
                    "expected price field, indicator, or number, found '{word}'",
                    word = if word.is_empty() {
                        self.peek_word()
                    } else {
                        word
                    }
                ),
                position: word_start,
            }),
        }
    }

    fn parse_provider_pair(&mut self) -> Result<(Provider, Provider), ParseError> {
        self.expect_char('(')?;
        let left = self.parse_provider()?;
        self.expect_char(',')?;
        let right = self.parse_provider()?;
        self.expect_char(')')?;
        Ok((left, right))
    }

    fn parse_trend(&mut self, direction: TrendDirection) -> Result<Predicate, ParseError> {
        self.expect_char('(')?;
        let provider = self.parse_provider()?;
        self.expect_char(',')?;
        let days = self.parse_integer()?;
        self.expect_char(')')?;
        Ok(Predicate::Trend {
            provider,
            direction,
            days,
        })
    }

    fn parse_change(&mut self) -> Result<Predicate, ParseError> {
        self.expect_char('(')?;
        let provider = self.parse_provider()?;
        self.expect_char(',')?;
        let percent = self.parse_number()?;
        self.expect_char(',')?;
        let days = self.parse_integer()?;
        self.expect_char(')')?;
        Ok(Predicate::ChangePercent {
            provider,
            percent,
            days,
        })
    }

    fn parse_intrabar_change(&mut self) -> Result<Predicate, ParseError> {
        self.expect_char('(')?;
        self.skip_whitespace();
        let basis_start = self.pos;
        let basis = match self.consume_word().as_str() {
            "high_low" => IntraBarBasis::HighLow,
            "open_close" => IntraBarBasis::OpenClose,
            other => {
                return Err(ParseError {
                    message: format!("expected 'high_low' or 'open_close', found '{other}'"),
                    position: basis_start,
                });
            }
        };
        self.expect_char(',')?;
        let percent = self.parse_number()?;
        self.expect_char(')')?;
        Ok(Predicate::IntraBarChange { basis, percent })
    }

    fn parse_fib(&mut self) -> Result<Predicate, ParseError> {
        self.expect_char('(')?;
        self.skip_whitespace();
        let level_start = self.pos;
        let level_value = self.parse_number()?;
        let level = FibLevel::from_percent(level_value).ok_or_else(|| ParseError {
            message: format!(
                "invalid retracement level {level_value} (expected 0, 23.6, 38.2, 50, 61.8 or 100)"
            ),
            position: level_start,
        })?;
        self.expect_char(',')?;
        self.skip_whitespace();
        let dir_start = self.pos;
        let direction = match self.consume_word().as_str() {
            "up" => TrendDirection::Up,
            "down" => TrendDirection::Down,
            other => {
                return Err(ParseError {
                    message: format!("expected 'up' or 'down', found '{other}'"),
                    position: dir_start,
                });
            }
        };
        self.expect_char(',')?;
        let lookback = self.parse_integer()?;
        self.expect_char(')')?;
        Ok(Predicate::Fibonacci {
            level,
            direction,
            lookback,
        })
    }

    fn parse_variadic(&mut self, keyword: &str) -> Result<Vec<Predicate>, ParseError> {
        self.expect_char('(')?;
        let mut children = vec![self.parse_predicate()?];

        loop {
            self.skip_whitespace();
            if self.peek() == Some(')') {
                self.advance();
                break;
            }
            self.expect_char(',')?;
            children.push(self.parse_predicate()?);
        }

        if children.len() < 2 {
            return Err(self.error(format!("{keyword} requires at least 2 predicates")));
        }
        Ok(children)
    }

    fn parse_after(&mut self) -> Result<Predicate, ParseError> {
        self.expect_char('(')?;
        let inner = self.parse_predicate()?;
        self.expect_char(',')?;
        let days = self.parse_integer()?;
        self.expect_char(')')?;
        Ok(Predicate::After {
            inner: Box::new(inner),
            days,
        })
    }

    fn parse_predicate(&mut self) -> Result<Predicate, ParseError> {
        self.skip_whitespace();
        let keyword_start = self.pos;
        let keyword = self.consume_word();

        match keyword.as_str() {
            "GT" => {
                let (left, right) = self.parse_provider_pair()?;
                Ok(Predicate::GreaterThan { left, right })
            }
            "LT" => {
                let (left, right) = self.parse_provider_pair()?;
                Ok(Predicate::LessThan { left, right })
            }
            "CROSS_OVER" => {
                let (left, right) = self.parse_provider_pair()?;
                Ok(Predicate::CrossOver { left, right })
            }
            "CROSS_UNDER" => {
                let (left, right) = self.parse_provider_pair()?;
                Ok(Predicate::CrossUnder { left, right })
            }
            "TREND_UP" => self.parse_trend(TrendDirection::Up),
            "TREND_DOWN" => self.parse_trend(TrendDirection::Down),
            "CHANGE" => self.parse_change(),
            "INTRABAR_CHANGE" => self.parse_intrabar_change(),
            "FIB" => self.parse_fib(),
            "AND" => Ok(Predicate::And(self.parse_variadic("AND")?)),
            "OR" => Ok(Predicate::Or(self.parse_variadic("OR")?)),
            "AFTER" => self.parse_after(),
            other => Err(ParseError {
                message: format!(
                    "expected predicate, found '{found}'",
                    found = if other.is_empty() {
                        self.peek_word()
                    } else {
                        other.to_string()
                    }
                ),
                position: keyword_start,
            }),
        }
    }

    fn parse(&mut self) -> Result<Predicate, ParseError> {
        let predicate = self.parse_predicate()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.error(format!(
                "unexpected input after predicate: '{}'",
                self.remaining()
            )));
        }
        Ok(predicate)
    }
}

pub fn parse(input: &str) -> Result<Predicate, ParseError> {
    Parser::new(input).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_gt_with_constant() {
        let p = parse("GT(close, 100)").unwrap();
        assert!(matches!(
            p,
            Predicate::GreaterThan {
                left: Provider::Field(PriceField::Close),
                right: Provider::Constant(100.0),
            }
        ));
    }

    #[test]
    fn parse_lt_with_indicators() {
        let p = parse("LT(SMA(20), SMA(50))").unwrap();
        match p {
            Predicate::LessThan { left, right } => {
                assert_eq!(left, Provider::Indicator(IndicatorType::Sma(20)));
                assert_eq!(right, Provider::Indicator(IndicatorType::Sma(50)));
            }
            _ => panic!("expected LessThan"),
        }
    }

    #[test]
    fn parse_cross_over_and_under() {
        assert!(matches!(
            parse("CROSS_OVER(SMA(20), SMA(50))").unwrap(),
            Predicate::CrossOver { .. }
        ));
        assert!(matches!(
            parse("CROSS_UNDER(close, EMA(200))").unwrap(),
            Predicate::CrossUnder { .. }
        ));
    }

    #[test]
    fn parse_all_indicators() {
        parse("GT(SMA(20), 100)").unwrap();
        parse("GT(EMA(20), 100)").unwrap();
        parse("GT(WMA(20), 100)").unwrap();
        parse("GT(RSI(14), 70)").unwrap();
        parse("GT(ROC(10), 0)").unwrap();
        parse("GT(MFI(14), 80)").unwrap();
    }

    #[test]
    fn parse_price_fields() {
        for (input, field) in [
            ("GT(open, 1)", PriceField::Open),
            ("GT(high, 1)", PriceField::High),
            ("GT(low, 1)", PriceField::Low),
            ("GT(close, 1)", PriceField::Close),
            ("GT(volume, 1)", PriceField::Volume),
        ] {
            match parse(input).unwrap() {
                Predicate::GreaterThan { left, .. } => {
                    assert_eq!(left, Provider::Field(field));
                }
                _ => panic!("expected GreaterThan"),
            }
        }
    }

    #[test]
    fn parse_trend() {
        let p = parse("TREND_UP(close, 5)").unwrap();
        assert_eq!(
            p,
            Predicate::Trend {
                provider: Provider::Field(PriceField::Close),
                direction: TrendDirection::Up,
                days: 5,
            }
        );
        assert!(matches!(
            parse("TREND_DOWN(RSI(14), 3)").unwrap(),
            Predicate::Trend {
                direction: TrendDirection::Down,
                days: 3,
                ..
            }
        ));
    }

    #[test]
    fn parse_change() {
        let p = parse("CHANGE(close, 7.5, 10)").unwrap();
        match p {
            Predicate::ChangePercent {
                percent, days, ..
            } => {
                assert!((percent - 7.5).abs() < f64::EPSILON);
                assert_eq!(days, 10);
            }
            _ => panic!("expected ChangePercent"),
        }
    }

    #[test]
    fn parse_intrabar_change() {
        assert_eq!(
            parse("INTRABAR_CHANGE(high_low, 2.5)").unwrap(),
            Predicate::IntraBarChange {
                basis: IntraBarBasis::HighLow,
                percent: 2.5,
            }
        );
        assert_eq!(
            parse("INTRABAR_CHANGE(open_close, 1)").unwrap(),
            Predicate::IntraBarChange {
                basis: IntraBarBasis::OpenClose,
                percent: 1.0,
            }
        );
    }

    #[test]
    fn parse_fib() {
        let p = parse("FIB(38.2, up, 30)").unwrap();
        assert_eq!(
            p,
            Predicate::Fibonacci {
                level: FibLevel::L382,
                direction: TrendDirection::Up,
                lookback: 30,
            }
        );
        assert!(matches!(
            parse("FIB(61.8, down, 20)").unwrap(),
            Predicate::Fibonacci {
                level: FibLevel::L618,
                direction: TrendDirection::Down,
                ..
            }
        ));
    }

    #[test]
    fn error_invalid_fib_level() {
        let err = parse("FIB(42, up, 30)").unwrap_err();
        assert!(err.message.contains("invalid retracement level"));
    }

    #[test]
    fn parse_and_or_variadic() {
        match parse("AND(GT(close, 100), LT(close, 150), GT(volume, 0))").unwrap() {
            Predicate::And(children) => assert_eq!(children.len(), 3),
            _ => panic!("expected And"),
        }
        match parse("OR(GT(close, 150), LT(close, 50))").unwrap() {
            Predicate::Or(children) => assert_eq!(children.len(), 2),
            _ => panic!("expected Or"),
        }
    }

    #[test]
    fn parse_after() {
        match parse("AFTER(CROSS_OVER(SMA(20), SMA(50)), 2)").unwrap() {
            Predicate::After { days, .. } => assert_eq!(days, 2),
            _ => panic!("expected After"),
        }
    }

    #[test]
    fn parse_deeply_nested() {
        let p = parse(
            "AND(OR(GT(close, 100), FIB(50, up, 30)), AFTER(TREND_UP(SMA(10), 4), 1))",
        )
        .unwrap();
        assert!(matches!(p, Predicate::And(_)));
    }

    #[test]
    fn parse_whitespace_tolerant() {
        parse("  GT  (  close  ,  100  )  ").unwrap();
        parse("AND( GT(close, 1) , LT(close, 2) )").unwrap();
    }

    #[test]
    fn parse_negative_constant() {
        match parse("GT(ROC(10), -2.5)").unwrap() {
            Predicate::GreaterThan {
                right: Provider::Constant(v),
                ..
            } => assert!((v - (-2.5)).abs() < f64::EPSILON),
            _ => panic!("expected GreaterThan with constant"),
        }
    }

    #[test]
    fn error_unknown_predicate() {
        let err = parse("BOGUS(close, 1)").unwrap_err();
        assert!(err.message.contains("expected predicate"));
        assert_eq!(err.position, 0);
    }

    #[test]
    fn error_unknown_provider() {
        let err = parse("GT(closing, 1)").unwrap_err();
        assert!(err.message.contains("expected price field"));
    }

    #[test]
    fn error_missing_paren() {
        let err = parse("GT(close, 100").unwrap_err();
        assert!(err.message.contains("expected ')'"));
    }

    #[test]
    fn error_missing_comma() {
        let err = parse("GT(close 100)").unwrap_err();
        assert!(err.message.contains("expected ','"));
    }

    #[test]
    fn error_single_child_and() {
        let err = parse("AND(GT(close, 1))").unwrap_err();
        assert!(err.message.contains("AND requires at least 2 predicates"));
    }

    #[test]
    fn error_trailing_input() {
        let err = parse("GT(close, 100) garbage").unwrap_err();
        assert!(err.message.contains("unexpected input"));
    }

    #[test]
    fn error_empty_input() {
        let err = parse("").unwrap_err();
        assert!(err.message.contains("expected predicate"));
        assert_eq!(err.position, 0);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert!(parse("gt(close, 100)").is_err());
        assert!(parse("GT(CLOSE, 100)").is_err());
    }
}
