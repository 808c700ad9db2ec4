use pos_engine::pricing::{DiscountMode, validate_discount};
use pos_engine::reports::{DateFilter, SalesReport};
use pos_engine::{RedbDocumentStore, SessionContext, quote, setup_environment};
use serde::Deserialize;
use shared::models::{Product, Variant};
use shared::order::{Addon, Cart};

const USAGE: &str = "usage:
  pos-engine quote <cart.json> [discount]
  pos-engine report [today|yesterday|last7|last30|all]";

/// One line of a cart file
#[derive(Debug, Deserialize)]
struct CartLine {
    product: Product,
    #[serde(default = "one")]
    quantity: u32,
    #[serde(default)]
    variant: Option<Variant>,
    #[serde(default)]
    addons: Vec<Addon>,
}

fn one() -> u32 {
    1
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("quote") => {
            let path = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("missing cart file\n{}", USAGE))?;
            let discount = args.get(2).map_or("0", String::as_str);
            let session = SessionContext::new(config.currency_code.clone(), config.country.clone());
            print_quote(path, discount, &session)
        }
        Some("report") => {
            let filter: DateFilter = match args.get(1) {
                Some(raw) => raw.parse().map_err(|e: String| anyhow::anyhow!(e))?,
                None => DateFilter::default(),
            };
            let store = RedbDocumentStore::open(config.db_path())?;
            let report = SalesReport::load(&store, filter).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

fn print_quote(path: &str, discount: &str, session: &SessionContext) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path, e))?;
    let lines: Vec<CartLine> = serde_json::from_str(&raw)?;

    let mut cart = Cart::new();
    for line in lines {
        cart.add(line.product, line.quantity, line.variant, line.addons);
    }
    if cart.is_empty() {
        anyhow::bail!("cart is empty");
    }

    let subtotal = cart.subtotal();
    let discount = validate_discount(discount, DiscountMode::Fixed, subtotal)?;
    let quote = quote(&cart, discount);
    let pricing = &quote.pricing;

    for (_, entry) in cart.iter() {
        println!(
            "{:<28} x{:<4} {:>12}",
            entry.product.title,
            entry.quantity,
            session.format_amount(entry.line_subtotal())
        );
    }
    println!("{:-<46}", "");
    println!("{:<34} {:>12}", "Subtotal", session.format_amount(pricing.subtotal));
    if pricing.discount > 0.0 {
        println!("{:<34} {:>12}", "Discount", session.format_amount(-pricing.discount));
    }
    for charge in &pricing.calculated_charges {
        let label = if charge.is_inclusive {
            format!("{} (incl.)", charge.display_name)
        } else {
            charge.display_name.clone()
        };
        println!("{:<34} {:>12}", label, session.format_amount(charge.calculated_amount));
    }
    println!("{:<34} {:>12}", "Total", session.format_amount(pricing.final_amount));
    Ok(())
}
