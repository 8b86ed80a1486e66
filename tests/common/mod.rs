#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use tradesig::domain::bar::Bar;
use tradesig::domain::error::TradesigError;
use tradesig::domain::overlay::Overlays;
use tradesig::domain::predicate::Predicate;
use tradesig::domain::provider::{PriceField, Provider};
use tradesig::domain::strategy::Strategy;
use tradesig::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, TradesigError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TradesigError::Data {
                reason: reason.clone(),
            });
        }
        let mut bars = self.data.get(symbol).cloned().unwrap_or_default();
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TradesigError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradesigError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TradesigError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date: &str, close: f64) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// Bars from explicit closes, one per consecutive calendar day.
pub fn bars_from_closes(symbol: &str, closes: &[f64]) -> Vec<Bar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            symbol: symbol.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn make_threshold_strategy(buy_above: f64, sell_below: f64) -> Strategy {
    Strategy {
        name: "Threshold".into(),
        description: "Buy above / sell below fixed levels".into(),
        buy: Predicate::GreaterThan {
            left: Provider::Field(PriceField::Close),
            right: Provider::Constant(buy_above),
        },
        sell: Predicate::LessThan {
            left: Provider::Field(PriceField::Close),
            right: Provider::Constant(sell_below),
        },
        overlays: Overlays::default(),
    }
}
