use crate::provider::errors::ProviderError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One normalized observation: UTC minute timestamp plus close price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinuteBar {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Envelope of the v8 chart endpoint
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteBlock {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// Converts a raw chart payload into normalized minute bars.
/// Minutes without a traded close come back as null and are dropped.
pub fn bars_from_chart(
    symbol: &str,
    response: ChartResponse,
) -> Result<Vec<MinuteBar>, ProviderError> {
    if let Some(err) = response.chart.error {
        let description = err.description.unwrap_or_default();
        // Unknown symbols come back as "Not Found" / "symbol may be delisted"
        if err.code == "Not Found" || description.contains("delisted") {
            return Err(ProviderError::SymbolNotFound(symbol.to_string()));
        }
        return Err(ProviderError::Upstream {
            message: format!("{}: {}", err.code, description),
        });
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| {
            if results.is_empty() {
                None
            } else {
                Some(results.remove(0))
            }
        })
        .ok_or_else(|| ProviderError::NoData {
            symbol: symbol.to_string(),
        })?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|block| block.close)
        .unwrap_or_default();

    let bars = result
        .timestamp
        .into_iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = close?;
            let timestamp = DateTime::<Utc>::from_timestamp(ts, 0)?;
            Some(MinuteBar { timestamp, close })
        })
        .collect();

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ChartResponse {
        serde_json::from_str(raw).expect("chart payload must parse")
    }

    #[test]
    fn test_bars_from_chart_converts_timestamps_and_closes() {
        let response = parse(
            r#"{"chart":{"result":[{"meta":{"symbol":"AAPL"},
                "timestamp":[1714656060,1714656120],
                "indicators":{"quote":[{"close":[182.401,182.55]}]}}],"error":null}}"#,
        );

        let bars = bars_from_chart("AAPL", response).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.timestamp(), 1714656060);
        assert_eq!(bars[0].close, 182.401);
        assert_eq!(bars[1].close, 182.55);
    }

    #[test]
    fn test_bars_from_chart_drops_null_closes() {
        let response = parse(
            r#"{"chart":{"result":[{"timestamp":[1714656060,1714656120,1714656180],
                "indicators":{"quote":[{"close":[182.4,null,183.1]}]}}],"error":null}}"#,
        );

        let bars = bars_from_chart("AAPL", response).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].timestamp.timestamp(), 1714656180);
    }

    #[test]
    fn test_bars_from_chart_maps_unknown_symbol() {
        let response = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found",
                "description":"No data found, symbol may be delisted"}}}"#,
        );

        match bars_from_chart("ZZZZ", response) {
            Err(ProviderError::SymbolNotFound(symbol)) => assert_eq!(symbol, "ZZZZ"),
            other => panic!("Expected SymbolNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_bars_from_chart_missing_result_is_no_data() {
        let response = parse(r#"{"chart":{"result":null,"error":null}}"#);

        assert!(matches!(
            bars_from_chart("AAPL", response),
            Err(ProviderError::NoData { .. })
        ));
    }

    #[test]
    fn test_bars_from_chart_empty_window_yields_no_bars() {
        let response = parse(
            r#"{"chart":{"result":[{"timestamp":[],
                "indicators":{"quote":[{"close":[]}]}}],"error":null}}"#,
        );

        let bars = bars_from_chart("AAPL", response).unwrap();
        assert!(bars.is_empty());
    }
}
