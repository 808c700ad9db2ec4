//! Currency symbol table

use crate::money;

/// Supported currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

const fn currency(code: &'static str, name: &'static str, symbol: &'static str) -> Currency {
    Currency { code, name, symbol }
}

/// The first entry is the fallback for unknown codes
pub const CURRENCIES: [Currency; 34] = [
    currency("INR", "Indian Rupee", "₹"),
    currency("USD", "US Dollar", "$"),
    currency("EUR", "Euro", "€"),
    currency("GBP", "British Pound", "£"),
    currency("JPY", "Japanese Yen", "¥"),
    currency("CNY", "Chinese Yuan", "¥"),
    currency("AUD", "Australian Dollar", "A$"),
    currency("CAD", "Canadian Dollar", "C$"),
    currency("SGD", "Singapore Dollar", "S$"),
    currency("CHF", "Swiss Franc", "CHF"),
    currency("MYR", "Malaysian Ringgit", "RM"),
    currency("THB", "Thai Baht", "฿"),
    currency("AED", "UAE Dirham", "د.إ"),
    currency("SAR", "Saudi Riyal", "﷼"),
    currency("NZD", "New Zealand Dollar", "NZ$"),
    currency("HKD", "Hong Kong Dollar", "HK$"),
    currency("SEK", "Swedish Krona", "kr"),
    currency("ZAR", "South African Rand", "R"),
    currency("RUB", "Russian Ruble", "₽"),
    currency("BRL", "Brazilian Real", "R$"),
    currency("MXN", "Mexican Peso", "$"),
    currency("IDR", "Indonesian Rupiah", "Rp"),
    currency("TRY", "Turkish Lira", "₺"),
    currency("KRW", "South Korean Won", "₩"),
    currency("PLN", "Polish Złoty", "zł"),
    currency("PHP", "Philippine Peso", "₱"),
    currency("ILS", "Israeli New Shekel", "₪"),
    currency("EGP", "Egyptian Pound", "E£"),
    currency("NGN", "Nigerian Naira", "₦"),
    currency("VND", "Vietnamese Đồng", "₫"),
    currency("BDT", "Bangladeshi Taka", "৳"),
    currency("PKR", "Pakistani Rupee", "₨"),
    currency("NPR", "Nepalese Rupee", "रू"),
    currency("LKR", "Sri Lankan Rupee", "රු"),
];

/// Look up a currency, falling back to INR
pub fn lookup(code: &str) -> &'static Currency {
    CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
        .unwrap_or(&CURRENCIES[0])
}

pub fn symbol_for(code: &str) -> &'static str {
    lookup(code).symbol
}

/// `"₹ 1,235"`: whole units with thousands grouping
pub fn format_with_symbol(amount: f64, code: &str) -> String {
    format!("{} {}", symbol_for(code), money::format_grouped(amount, 0))
}
