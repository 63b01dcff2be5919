#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Demo entry point for the care map engine.
//!
//! Loads the embedded dataset, runs one filter submission (or the
//! default home-postcode view), and prints every section the dashboard
//! would render: locality, weather, KPIs, the ranked practice list, the
//! trend datasets, and the hint line.

use clap::Parser;

use care_map_engine::format::{format_integer, format_km, format_percent, format_rating};
use care_map_engine::map::MarkerLayer;
use care_map_engine::{DashboardEngine, DashboardView};
use care_map_weather::{WeatherLookup, display};

/// Command-line filters, mirroring the dashboard's filter form.
#[derive(Debug, Parser)]
#[command(name = "care_map_cli")]
struct Args {
    /// Postcode to centre on; empty restores the patient's home area.
    #[arg(long, default_value = "")]
    postcode: String,

    /// Search radius in kilometres.
    #[arg(long, default_value_t = care_map_engine::DEFAULT_RADIUS_KM)]
    radius_km: f64,

    /// Minimum practice rating (0-5).
    #[arg(long, default_value_t = care_map_engine::DEFAULT_MIN_RATING)]
    min_rating: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let dataset = care_map_data::load()?;
    let weather = WeatherLookup::from_raw(&dataset.weather_lookup);
    let mut engine = DashboardEngine::new(
        dataset.practices,
        dataset.sample_localities,
        dataset.patient_summary,
        weather,
        dataset.weather_today,
    );

    let view = engine.submit(&args.postcode, args.radius_km, args.min_rating);
    print_view(&view);
    Ok(())
}

fn print_view(view: &DashboardView) {
    println!("{}", view.area_label);
    println!();

    match &view.weather {
        Some(weather) => {
            let condition = weather
                .condition
                .as_deref()
                .map(display::format_condition)
                .unwrap_or_default();
            let temperature = display::rounded_temperature(weather)
                .map_or_else(|| "—".to_string(), |t| format!("{t}°C"));
            println!(
                "Weather: {} {temperature} {condition}",
                display::select_icon(weather)
            );
            println!("  {}", display::build_meta(weather));
            println!("  {}", display::advice_text(weather));
        }
        None => println!("Weather: unavailable"),
    }
    println!();

    let kpis = &view.summary.kpis;
    println!(
        "Practices: {} · Avg rating: {} · Avg intervention: {}",
        kpis.practice_count,
        format_rating(kpis.average_rating),
        format_percent(kpis.average_intervention, 1)
    );
    println!("{}", view.top_practice_banner);
    println!();

    for (position, ranked) in view.practices.iter().enumerate() {
        let practice = &ranked.practice;
        println!(
            "{}. {} · {} · {} achievement · {} register",
            position + 1,
            practice.name.as_deref().unwrap_or("GP"),
            format_km(ranked.distance_km),
            format_percent(practice.achievement_percent, 1),
            format_integer(practice.register)
        );
    }
    println!();

    let mut markers = MarkerLayer::new();
    markers.init();
    log::info!("prepared {} map markers", markers.render(&view.practices).len());

    print_chart("Achievement", &view.charts.achievement);
    print_chart("Intervention", &view.charts.intervention);
    print_chart("Review", &view.charts.review);

    println!();
    println!("{}", view.hint);
}

fn print_chart(title: &str, series: &care_map_engine::ChartSeries) {
    println!("{title}:");
    for (label, value) in series.labels.iter().zip(&series.values) {
        println!("  {label}: {value}");
    }
}
