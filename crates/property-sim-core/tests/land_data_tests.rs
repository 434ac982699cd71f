use std::path::PathBuf;

use property_sim_core::input::normalize;
use property_sim_core::land_data::matching::similarity;
use property_sim_core::land_data::table::{LandPriceTable, NO_DATA_SOURCE, NO_MATCH_SOURCE};
use property_sim_core::simulation::config::SimulatorConfig;
use property_sim_core::simulation::model::{demo_request, simulate, SimulationContext};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/land_prices.csv")
}

fn fixture_table() -> LandPriceTable {
    LandPriceTable::from_csv_path(&fixture_path()).unwrap()
}

// ===========================================================================
// Table loading
// ===========================================================================

#[test]
fn test_csv_with_japanese_headers_loads() {
    let table = fixture_table();
    assert_eq!(table.len(), 4);
    assert_eq!(table.records()[1].location, "那覇市おもろまち4丁目");
    assert_eq!(table.records()[1].price_per_sqm, dec!(1210000));
}

#[test]
fn test_csv_with_english_headers_loads() {
    let csv = "location,price\nABC,1000\n";
    let table = LandPriceTable::from_csv_reader(csv.as_bytes()).unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn test_config_loads_fixture_once() {
    let config = SimulatorConfig {
        land_data_path: Some(fixture_path()),
        ..Default::default()
    };
    let table = config.load_table();
    assert_eq!(table.len(), 4);
}

// ===========================================================================
// Lookup
// ===========================================================================

#[test]
fn test_nearest_location_wins() {
    let table = fixture_table();
    let ctx = SimulationContext::new(&table);
    let quote = table.lookup("沖縄市泡瀬4丁目", ctx.matcher, ctx.similarity_cutoff);
    assert_eq!(quote.matched_location.as_deref(), Some("沖縄市泡瀬3丁目"));
    // Duplicate names resolve to the first listed price
    assert_eq!(quote.price_per_sqm, dec!(78000));
    assert_eq!(quote.source, "近傍基準地: 沖縄市泡瀬3丁目 (25万円/坪)");
}

#[test]
fn test_blank_address_reports_no_data() {
    let table = fixture_table();
    let ctx = SimulationContext::new(&table);
    assert_eq!(table.lookup("", ctx.matcher, 0.1).source, NO_DATA_SOURCE);
}

#[test]
fn test_dissimilar_address_reports_no_match() {
    let table = fixture_table();
    let ctx = SimulationContext::new(&table).with_cutoff(0.9);
    let quote = table.lookup("東京都千代田区", ctx.matcher, ctx.similarity_cutoff);
    assert_eq!(quote.source, NO_MATCH_SOURCE);
    assert_eq!(quote.price_per_sqm, Decimal::ZERO);
}

#[test]
fn test_similarity_of_near_addresses() {
    // 7 of 8 characters line up
    assert_eq!(similarity("沖縄市泡瀬4丁目", "沖縄市泡瀬3丁目"), 0.875);
}

// ===========================================================================
// Simulation against the reference table
// ===========================================================================

#[test]
fn test_demo_with_reference_land_price() {
    let table = fixture_table();
    let input = normalize(&demo_request()).unwrap();
    let out = simulate(&input, &SimulationContext::new(&table))
        .unwrap()
        .result;
    // 78000 yen/m2 x 600 m2 = 4680 (ten-thousand yen)
    assert_eq!(out.cost_approach_breakdown.land, dec!(4680));
    assert_eq!(out.cost_approach_value, dec!(25820));
    assert_eq!(out.land_price_source, "近傍基準地: 沖縄市泡瀬3丁目 (25万円/坪)");
    // Land value lifts collateral above the no-data case
    assert!(out.collateral_value > dec!(19473));
}
