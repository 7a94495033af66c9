//! Message rendering for the chat surface.
//!
//! Pure string builders; everything here is deterministic and tested
//! without any bot plumbing.

use crate::domain::filter::{FilterCriteria, SaleWindow};
use crate::domain::session::PageView;
use crate::domain::trend::TrendForecast;
use crate::domain::vehicle::{ValuationReport, VehicleQuery};

/// Transactions shown inline in the report summary.
pub const RECENT_TRANSACTIONS_SHOWN: usize = 3;

/// Telegram's hard per-message limit.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

pub const START_TEXT: &str = "Welcome to Vehicle Auction Bot!\n\n\
Use the following commands:\n\
/vin [VIN] - Get auction data for a specific VIN\n\
/vin [VIN] [Subseries] - Get auction data with subseries specification\n\
/vin [VIN] [Subseries] [Transmission] - Get auction data with subseries and transmission\n\
/vin [VIN] color=COLOR grade=GRADE odometer=MILES region=REGION - Get auction data with specific parameters\n\
/ymm [Year] [Make] [Model] - Get auction data for a Year/Make/Model\n\
/filter [field=value ...] - Narrow the loaded transactions\n\
/page - Browse the transaction list page by page\n\
/trend [months] - Project the price trend\n\
/history - Show your recent queries\n\n\
Type /help for more detailed examples";

pub const HELP_TEXT: &str = "Vehicle Auction Bot commands:\n\n\
1️⃣ Basic VIN lookup:\n\
/vin 1HGCM82633A123456\n\n\
2️⃣ VIN lookup with subseries:\n\
/vin 1HGCM82633A123456 SE\n\n\
3️⃣ VIN lookup with subseries and transmission:\n\
/vin 1HGCM82633A123456 SE AUTO\n\n\
4️⃣ VIN lookup with additional parameters:\n\
/vin WBA3C1C5XFP853102 color=WHITE grade=3.5 odometer=20000 region=NE\n\n\
Available parameters:\n\
• color - Vehicle color (e.g., WHITE, BLACK, SILVER)\n\
• grade - Vehicle condition grade (e.g., 1.0, 3.5, 4.5) on a 0-5 scale\n\
• odometer - Vehicle mileage in miles\n\
• region - Geographic region (NE, SE, MW, SW, W)\n\n\
5️⃣ Year/Make/Model lookup:\n\
/ymm 2020 Honda Accord\n\
/ymm 2020 Honda Accord trim=Sport\n\n\
6️⃣ Filter the loaded transactions:\n\
/filter grade=4.0 odometer=80000\n\
/filter months=6 region=NE,SE\n\
/filter clear\n\n\
7️⃣ Page through the transaction list:\n\
/page, /page prev, /page first\n\n\
8️⃣ Price trend projection:\n\
/trend (3 months ahead) or /trend 6\n\n\
9️⃣ Recent queries:\n\
/history\n\n\
📊 For testing in the UAT environment, you can use this example VIN:\n\
WBA3C1C5XFP853102\n\n\
After a basic search, you can also use the interactive 'Refine Valuation' button to specify additional parameters without typing.";

/// Formats a full valuation report into the summary message.
pub fn report_summary(report: &ValuationReport) -> String {
    let mut message = String::from("🚗 Vehicle Auction Data:\n\n");

    let mut vehicle_lines = String::new();
    if let Some(title) = report.description.title() {
        vehicle_lines.push_str(&format!("- {}\n", title));
    }
    if let Some(vin) = &report.description.vin {
        vehicle_lines.push_str(&format!("- VIN: {}\n", vin));
    }
    if let Some(style) = &report.description.style {
        vehicle_lines.push_str(&format!("- Style: {}\n", style));
    }
    if let Some(engine) = &report.description.engine_size {
        vehicle_lines.push_str(&format!("- Engine: {}\n", engine));
    }
    if let Some(transmission) = &report.description.transmission {
        vehicle_lines.push_str(&format!("- Transmission: {}\n", transmission));
    }
    if let Some(drivetrain) = &report.description.drivetrain {
        vehicle_lines.push_str(&format!("- Drivetrain: {}\n", drivetrain));
    }
    if !vehicle_lines.is_empty() {
        message.push_str("📋 Vehicle Info:\n");
        message.push_str(&vehicle_lines);
        message.push('\n');
    }

    if let Some(wholesale) = &report.wholesale {
        message.push_str("💰 Wholesale Values:\n");
        if let Some(band) = &wholesale.aggregate {
            if let Some(average) = band.average {
                message.push_str(&format!(
                    "- Aggregate Average: {}\n",
                    format_money(average)
                ));
            }
            if let (Some(rough), Some(clean)) = (band.rough, band.clean) {
                message.push_str(&format!(
                    "  Range: {} - {}\n",
                    format_money(rough),
                    format_money(clean)
                ));
            }
        }
        if let Some(band) = &wholesale.adjusted_mmr {
            if let Some(average) = band.average {
                message.push_str(&format!("- Adjusted MMR: {}\n", format_money(average)));
            }
            if let (Some(rough), Some(clean)) = (band.rough, band.clean) {
                message.push_str(&format!(
                    "  Range: {} - {}\n",
                    format_money(rough),
                    format_money(clean)
                ));
            }
        }
        if let Some(band) = &wholesale.base_mmr {
            if let Some(average) = band.average {
                message.push_str(&format!("- Base MMR: {}\n", format_money(average)));
            }
        }
        message.push('\n');
    }

    if !report.transactions.is_empty() {
        let total = report.transactions.len();
        message.push_str(&format!("🔄 Recent Transactions ({} total):\n", total));
        for (i, tx) in report
            .transactions
            .iter()
            .take(RECENT_TRANSACTIONS_SHOWN)
            .enumerate()
        {
            message.push_str(&format!("{}. {}", i + 1, format_money(tx.price)));
            if let Some(date) = tx.sale_date {
                message.push_str(&format!(" on {}", date.format("%Y-%m-%d")));
            }
            message.push('\n');
            if let Some(odometer) = tx.odometer {
                message.push_str(&format!(
                    "   Mileage: {} miles\n",
                    group_thousands(odometer.miles() as u64)
                ));
            }
            if let Some(grade) = tx.condition_grade {
                message.push_str(&format!("   Condition: {}/5.0\n", grade));
            }
            if let Some(location) = &tx.location {
                message.push_str(&format!("   Location: {}\n", location));
            }
            message.push('\n');
        }
        if total > RECENT_TRANSACTIONS_SHOWN {
            message.push_str(&format!(
                "... and {} more transactions. Use the View All button or /page to browse them.\n\n",
                total - RECENT_TRANSACTIONS_SHOWN
            ));
        }
    }

    if let Some(stats) = &report.statistics {
        message.push_str("📊 Market Summary:\n");
        if let Some(average) = stats.average_price {
            message.push_str(&format!("- Average Price: {}\n", format_money(average)));
        }
        if let Some(odometer) = stats.average_odometer {
            message.push_str(&format!(
                "- Average Mileage: {} miles\n",
                group_thousands(odometer as u64)
            ));
        }
        if let Some(grade) = stats.average_condition_grade {
            message.push_str(&format!("- Average Condition: {:.1}/5.0\n", grade));
        }
        if let Some(count) = stats.transaction_count {
            message.push_str(&format!("- Total Transactions: {}\n", count));
        }
    }

    message
}

/// Formats one page of the filtered transaction list. Numbering runs
/// across pages so entry 11 on page two follows entry 10 on page one.
pub fn transaction_page(page: &PageView) -> String {
    if page.total_items == 0 {
        return "No transactions match the current filter.".to_string();
    }

    let mut message = format!(
        "📋 Transactions - page {} of {} ({} matching):\n\n",
        page.page_index + 1,
        page.page_count,
        page.total_items
    );

    for (offset, tx) in page.items.iter().enumerate() {
        message.push_str(&format!("Transaction #{}:\n", page.start_index + offset + 1));
        message.push_str(&format!("• Price: {}\n", format_money(tx.price)));
        if let Some(date) = tx.sale_date {
            message.push_str(&format!("• Date: {}\n", date.format("%Y-%m-%d")));
        }
        if let Some(odometer) = tx.odometer {
            message.push_str(&format!(
                "• Mileage: {} miles\n",
                group_thousands(odometer.miles() as u64)
            ));
        }
        if let Some(grade) = tx.condition_grade {
            message.push_str(&format!("• Condition: {}/5.0\n", grade));
        }
        if let Some(region) = tx.region {
            message.push_str(&format!("• Region: {} ({})\n", region.label(), region.code()));
        }
        if let Some(color) = &tx.color {
            message.push_str(&format!("• Color: {}\n", color));
        }
        if let Some(location) = &tx.location {
            message.push_str(&format!("• Location: {}\n", location));
        }
        if let Some(lane) = &tx.lane {
            message.push_str(&format!("• Lane: {}\n", lane));
        }
        if let Some(seller) = &tx.seller_name {
            message.push_str(&format!("• Seller: {}\n", seller));
        }
        message.push('\n');
    }

    message
}

/// Formats a trend forecast: monthly history, then the projection.
pub fn forecast_text(forecast: &TrendForecast) -> String {
    let mut message = String::from("📈 Price Trend:\n\n");

    for stats in &forecast.history {
        message.push_str(&format!(
            "- {}: {}",
            stats.period,
            format_money(stats.average_price)
        ));
        let sales = if stats.sample_count == 1 {
            "1 sale".to_string()
        } else {
            format!("{} sales", stats.sample_count)
        };
        match stats.average_mileage {
            Some(mileage) => message.push_str(&format!(
                " ({}, avg {} miles)\n",
                sales,
                group_thousands(mileage.round() as u64)
            )),
            None => message.push_str(&format!(" ({})\n", sales)),
        }
    }

    message.push_str(&format!(
        "\n🔮 Projection ({} months ahead):\n",
        forecast.projection.len()
    ));
    for point in &forecast.projection {
        message.push_str(&format!(
            "- {}: {}\n",
            point.period,
            format_money(point.predicted_price)
        ));
    }

    if forecast.projection.iter().any(|p| p.predicted_price < 0.0) {
        message.push_str(
            "\nNote: the fitted trend goes negative, so confidence in this projection is low.\n",
        );
    }

    message
}

/// Formats the active query and recent history.
pub fn history_text(active: Option<&VehicleQuery>, past: &[VehicleQuery]) -> String {
    if active.is_none() && past.is_empty() {
        return "No queries yet. Start with /vin or /ymm.".to_string();
    }

    let mut message = String::from("📜 Query History:\n\n");
    if let Some(query) = active {
        message.push_str(&format!("Current: {}\n", query));
    }
    if !past.is_empty() {
        if active.is_some() {
            message.push('\n');
        }
        message.push_str("Previous:\n");
        for (i, query) in past.iter().enumerate() {
            message.push_str(&format!("{}. {}\n", i + 1, query));
        }
    }
    message
}

/// Human-readable summary of filter criteria, for confirmation messages.
pub fn filter_description(criteria: &FilterCriteria) -> String {
    if criteria.is_empty() {
        return "none".to_string();
    }

    let mut parts = Vec::new();
    if let Some(grade) = criteria.min_grade {
        parts.push(format!("grade >= {}", grade));
    }
    if let Some(odometer) = criteria.max_odometer {
        parts.push(format!(
            "odometer <= {} miles",
            group_thousands(odometer.miles() as u64)
        ));
    }
    match criteria.sale_window {
        Some(SaleWindow::LastMonths(months)) => {
            parts.push(format!("sold in the last {} months", months));
        }
        Some(SaleWindow::Since(date)) => {
            parts.push(format!("sold since {}", date.format("%Y-%m-%d")));
        }
        None => {}
    }
    if !criteria.regions.is_empty() {
        let codes: Vec<&str> = criteria.regions.iter().map(|r| r.code()).collect();
        parts.push(format!("region in {}", codes.join(", ")));
    }
    parts.join(", ")
}

/// Dollar amount with thousands separators and cents, "$18,500.00".
pub fn format_money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    if negative {
        format!("-${}.{:02}", whole, cents % 100)
    } else {
        format!("${}.{:02}", whole, cents % 100)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Splits a message into chunks under the Telegram length limit,
/// preferring newline boundaries.
pub fn chunk_message(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        if current.len() + line.len() > MAX_MESSAGE_LENGTH {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            if line.len() > MAX_MESSAGE_LENGTH {
                current = split_oversized(line, &mut chunks);
                continue;
            }
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// A single line longer than the limit is cut at character boundaries;
// returns the trailing remainder.
fn split_oversized(line: &str, chunks: &mut Vec<String>) -> String {
    let mut rest = line;
    while rest.len() > MAX_MESSAGE_LENGTH {
        let mut cut = MAX_MESSAGE_LENGTH;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let (head, tail) = rest.split_at(cut);
        chunks.push(head.to_string());
        rest = tail;
    }
    rest.to_string()
}
