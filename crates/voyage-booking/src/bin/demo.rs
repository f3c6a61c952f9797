//! # Booking Demo
//!
//! Runs every booking flow end to end against the mock supplier.
//!
//! ## Usage
//! ```bash
//! # Realistic supplier delays
//! cargo run -p voyage-booking --bin demo
//!
//! # No delays, verbose logs
//! VOYAGE_LATENCY=none RUST_LOG=debug cargo run -p voyage-booking --bin demo
//!
//! # Custom config file
//! cargo run -p voyage-booking --bin demo -- --config ./booking.toml
//! ```

use std::env;
use std::path::PathBuf;

use chrono::{Days, Utc};
use tracing_subscriber::EnvFilter;
use voyage_booking::{BookingConfig, BookingServices};
use voyage_core::money::Money;
use voyage_core::{
    FareDetail, FlightOffer, Hotel, HotelSearchParams, OfferPrice, RoomOccupancy, Tour, TourSearchParams,
    TravelerPricing, VisaSearchParams, VisaService,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,voyage=debug")))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Voyage Booking Demo");
                println!();
                println!("Usage: demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Booking config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let services = BookingServices::new(BookingConfig::load_or_default(config_path))?;

    // ── Sign in ──────────────────────────────────────────────────────────────
    services.auth.login("ada@example.com", "secret").await?;
    services.sync_account();
    println!("Signed in as {}", services.auth.display_name());

    // ── Flight ───────────────────────────────────────────────────────────────
    let offer = FlightOffer {
        id: "1".to_string(),
        price: OfferPrice {
            total: "245.50".to_string(),
            currency: Some("USD".to_string()),
        },
        traveler_pricings: vec![TravelerPricing {
            fare_details_by_segment: vec![FareDetail {
                cabin: Some("ECONOMY".to_string()),
            }],
        }],
        ..Default::default()
    };
    let flights = &services.flights;
    flights.set_contact("ada@example.com", "+234 802 000 0001");
    flights.select_offer(offer, 2)?;
    flights.update_passenger(0, |p| {
        p.first_name = "Adaeze".to_string();
        p.last_name = "Okafor".to_string();
    })?;
    let price = flights.price_breakdown();
    let reference = flights.confirm_booking().await?;
    println!(
        "Flight {}: {} ({})",
        reference,
        price.total.format(voyage_core::Currency::Usd),
        flights.format_ngn(price.total)
    );

    // ── Hotel ────────────────────────────────────────────────────────────────
    let check_in = Utc::now().date_naive() + Days::new(14);
    let mut params = HotelSearchParams {
        city: "Lagos".to_string(),
        check_in_start: Some(check_in),
        check_in_end: Some(check_in + Days::new(3)),
        nationality: "NG".to_string(),
        ..Default::default()
    };
    params.set_rooms(vec![RoomOccupancy {
        adults: 2,
        children: 0,
        infants: 0,
    }]);
    let hotels = &services.hotels;
    hotels.set_hotel(
        Hotel {
            id: "HTL-LOS-001".to_string(),
            name: "Eko Hotel & Suites".to_string(),
            city: "Lagos".to_string(),
            ..Default::default()
        },
        params,
    )?;
    let rooms = hotels.fetch_rooms().await?;
    if let Some(room) = rooms.into_iter().nth(1) {
        hotels.select_room(room)?;
        let reference = hotels.confirm_booking().await?;
        println!(
            "Hotel {}: {} nights, {}",
            reference,
            hotels.nights(),
            hotels.format_ngn(hotels.price_breakdown().total)
        );
    }

    // ── Tour ─────────────────────────────────────────────────────────────────
    let tours = &services.tours;
    tours.set_tour(
        Tour {
            id: "TR-DXB-7".to_string(),
            name: "Desert Safari".to_string(),
            ..Default::default()
        },
        TourSearchParams {
            city: "Dubai".to_string(),
            country: "United Arab Emirates".to_string(),
            date: Some(check_in),
            adults: 2,
            children: 1,
            infants: 0,
        },
    )?;
    let packages = tours.fetch_packages().await?;
    if let Some(package) = packages.into_iter().next() {
        tours.select_package(package)?;
        let reference = tours.confirm_booking().await?;
        println!(
            "Tour {}: {} people, {}",
            reference,
            tours.total_participants(),
            tours.format_ngn(tours.price_breakdown().total)
        );
    }

    // ── Visa ─────────────────────────────────────────────────────────────────
    let visas = &services.visas;
    visas.set_visa(
        VisaService {
            id: 12,
            country: "United Kingdom".to_string(),
            nationality: "Nigerian".to_string(),
            visa_type: "Tourist".to_string(),
            validity: "6 Months".to_string(),
            entry_type: "Multiple".to_string(),
            processing_time: "15 working days".to_string(),
            price: Money::from_major(120_000),
            requirements: Vec::new(),
            success_rate: 92,
        },
        VisaSearchParams {
            country: "United Kingdom".to_string(),
            nationality: "Nigerian".to_string(),
            adults: 2,
            children: 0,
        },
    );
    if let Some(pricing) = visas.pricing() {
        let invoice = visas.generate_invoice();
        println!("Visa invoice {}: {}", invoice.number, visas.format_ngn(pricing.total));
    }

    services.auth.logout()?;
    Ok(())
}
