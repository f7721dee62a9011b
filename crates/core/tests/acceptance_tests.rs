//! End-to-end scenarios through the public API.

use chrono::{DateTime, Duration, TimeZone, Utc};
use folio_analytics_core::fx::{combine_exchange_rates, convert_series, CurrencyConverter, ExchangeRate};
use folio_analytics_core::utils::ChartFrequency;
use folio_analytics_core::{
    BreakEvenCalculator, BreakEvenCalculatorTrait, ChartGenerator, ChartMetric, ChartPoint,
    ChartRequest, DateRange, InstrumentPrice, PerformanceCalculator, PerformanceCalculatorTrait,
    PortfolioPositionsPriceListData, PositionPriceListData, StatisticsCalculator, Transaction,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

#[test]
fn irr_of_single_buy_matches_reference() {
    let data = PositionPriceListData {
        position_id: "POS-IRR".to_string(),
        prices: vec![
            InstrumentPrice::new("INS", date(2021, 12, 25), dec!(100)),
            InstrumentPrice::new("INS", date(2022, 3, 1), dec!(125)),
        ],
        transactions: vec![Transaction::new("POS-IRR", date(2022, 2, 1), dec!(1), dec!(113))],
    };
    let from = date(2021, 12, 25);
    let to = date(2022, 3, 1);

    let performance = PerformanceCalculator::default().calculate_performance(
        &[data.range_data(from, to)],
        from,
        to,
    );

    assert!((performance - dec!(0.106)).abs() < dec!(0.01), "got {}", performance);
}

#[test]
fn break_even_of_partial_sell_matches_reference() {
    let start = date(2023, 5, 2);
    let transactions = vec![
        Transaction::new("POS-BE", start, dec!(3), dec!(100)),
        Transaction::new("POS-BE", start + Duration::days(1), dec!(-2), dec!(105)),
        Transaction::new("POS-BE", start + Duration::days(2), dec!(3), dec!(110)),
    ];

    assert_eq!(BreakEvenCalculator.calculate_break_even(&transactions), dec!(105));
}

#[test]
fn statistics_without_transactions_are_zero() {
    let data = PortfolioPositionsPriceListData {
        portfolio_id: "PF-EMPTY".to_string(),
        positions: vec![PositionPriceListData {
            position_id: "POS".to_string(),
            prices: vec![InstrumentPrice::new("INS", date(2024, 1, 1), dec!(10))],
            transactions: vec![],
        }],
    };

    let stats = StatisticsCalculator::default().calculate_portfolio_statistics(&data, date(2024, 6, 1));
    let r = &stats.returns;

    for value in [
        r.total_profit,
        r.last_month_profit,
        r.last_week_profit,
        r.last_day_profit,
        r.total_performance,
        r.last_month_performance,
        r.last_week_performance,
        r.last_day_performance,
    ] {
        assert_eq!(value, Decimal::ZERO);
    }
}

#[test]
fn portfolio_chart_in_foreign_currency() {
    let portfolio = PortfolioPositionsPriceListData {
        portfolio_id: "PF-1".to_string(),
        positions: vec![PositionPriceListData {
            position_id: "POS-1".to_string(),
            prices: vec![
                InstrumentPrice::new("INS", date(2024, 1, 10), dec!(10)),
                InstrumentPrice::new("INS", date(2024, 2, 10), dec!(20)),
            ],
            transactions: vec![Transaction::new("POS-1", date(2024, 1, 10), dec!(3), dec!(10))],
        }],
    };
    let converter = CurrencyConverter::new(vec![
        ExchangeRate::new("EUR", "USD", dec!(1.10), date(2023, 12, 1)),
        ExchangeRate::new("PLN", "USD", dec!(0.25), date(2023, 12, 1)),
    ]);
    let eur_to_pln = converter.rates_between("EUR", "PLN", "USD").unwrap();

    let request = ChartRequest::cumulative(
        ChartMetric::Value,
        DateRange::new(date(2024, 1, 1), date(2024, 3, 31)).unwrap(),
        ChartFrequency::Month,
    );
    let chart = ChartGenerator::default()
        .generate_in_currency(&portfolio, &request, &eur_to_pln)
        .unwrap();

    // Clipped to Jan 10, then monthly: Jan 10, Feb 10, Mar 10.
    let times: Vec<_> = chart.iter().map(|p| p.timestamp).collect();
    assert_eq!(times, vec![date(2024, 1, 10), date(2024, 2, 10), date(2024, 3, 10)]);
    assert_eq!(chart[0].value, dec!(132));
    assert_eq!(chart[2].value, dec!(264));
}

#[test]
fn currency_round_trip_restores_values() {
    let rates_there = vec![
        ExchangeRate::new("USD", "JPY", dec!(149.37), date(2024, 1, 1)),
        ExchangeRate::new("USD", "JPY", dec!(151.02), date(2024, 1, 15)),
    ];
    let rates_back: Vec<ExchangeRate> = rates_there.iter().map(|r| r.inverse().unwrap()).collect();
    let points = vec![
        ChartPoint::new(date(2024, 1, 3), dec!(1234.56)),
        ChartPoint::new(date(2024, 1, 20), dec!(99.99)),
    ];

    let there = convert_series(&points, &rates_there).unwrap();
    let back = convert_series(&there, &rates_back).unwrap();

    for (original, restored) in points.iter().zip(back.iter()) {
        assert!((original.value - restored.value).abs() < dec!(0.000001));
        assert_eq!(original.timestamp, restored.timestamp);
    }
}

#[test]
fn combined_rates_follow_second_series_timestamps() {
    let first = vec![
        ExchangeRate::new("CHF", "EUR", dec!(1.05), date(2024, 1, 1)),
        ExchangeRate::new("CHF", "EUR", dec!(1.06), date(2024, 1, 9)),
    ];
    let second = vec![
        ExchangeRate::new("EUR", "GBP", dec!(0.86), date(2024, 1, 2)),
        ExchangeRate::new("EUR", "GBP", dec!(0.87), date(2024, 1, 10)),
    ];

    let combined = combine_exchange_rates(&first, &second).unwrap();

    assert_eq!(combined.len(), second.len());
    for (c, s) in combined.iter().zip(second.iter()) {
        assert_eq!(c.timestamp, s.timestamp);
    }
    assert_eq!(combined[0].rate, dec!(1.05) * dec!(0.86));
    assert_eq!(combined[1].rate, dec!(1.06) * dec!(0.87));
}
