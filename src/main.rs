use campus_rent::core::assistant::Suggestion;
use campus_rent::core::search::MatchSource;
use campus_rent::domain::model::Listing;
use campus_rent::domain::ports::ConfigProvider;
use campus_rent::domain::seed::{demo_catalog, demo_users};
use campus_rent::utils::error::{ErrorSeverity, MarketError};
use campus_rent::utils::{logger, validation::Validate};
use campus_rent::{AppConfig, CliConfig, ConfiguredGenerator, FilePreferences, Marketplace};
use clap::Parser;

fn print_listing(index: usize, listing: &Listing) {
    println!(
        "{}. {} [{}] ₹{}/day, deposit ₹{}",
        index + 1,
        listing.title,
        listing.id,
        listing.price_per_day,
        listing.security_deposit()
    );
    println!(
        "   {} · {} · {}{}",
        listing.category,
        listing.condition,
        listing.location,
        if listing.is_available { "" } else { " · Rented" }
    );
}

fn exit_with(e: &MarketError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match &cli.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    logger::init_from_config(&config.logging.level, config.logging.json, cli.verbose);
    tracing::info!("🚀 Starting campus-rent");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate().and_then(|_| cli.validate()) {
        exit_with(&e);
    }

    let generator = ConfiguredGenerator::from_config(&config);
    let preferences = FilePreferences::new(config.preferences_path());
    let market = Marketplace::open(
        demo_catalog(),
        demo_users(),
        preferences,
        generator,
        config.assistant_settings(),
    )
    .await
    .with_email_domain(config.email_domain());

    if let Some(user) = market.state().user() {
        println!("👋 Signed in as {} ({})", user.name, user.email);
    }

    let filter = cli.filter();
    let listings = match (&cli.query, cli.smart) {
        (Some(query), true) => {
            let outcome = market.smart_search(&filter, query).await;
            if outcome.source == MatchSource::SubstringFallback {
                println!("🔎 No smart matches, showing text matches for \"{}\"", query);
            }
            outcome.listings
        }
        _ => market.browse(&filter),
    };

    println!("📦 {} item(s)", listings.len());
    for (i, listing) in listings.iter().enumerate() {
        print_listing(i, listing);
    }

    if let Some(listing_id) = &cli.listing {
        let days = match cli.rental_days() {
            Ok(days) => days,
            Err(e) => exit_with(&e),
        };
        let quote = match market.quote(listing_id, days) {
            Ok(quote) => quote,
            Err(e) => exit_with(&e),
        };
        println!();
        println!("🧾 Quote for {} ({} day(s))", listing_id, quote.days);
        println!("   Rent:     ₹{}", quote.subtotal);
        println!("   Deposit:  ₹{} (refundable)", quote.deposit);
        println!("   Total:    ₹{}", quote.grand_total);

        let tips = market.safety_tips(listing_id).await?;
        let label = match &tips {
            Suggestion::Generated(_) => "Safety tips",
            Suggestion::Fallback(_) => "Safety tips (default)",
        };
        println!("🛡️  {}:", label);
        for tip in tips.value() {
            println!("   - {}", tip);
        }
    }

    Ok(())
}
