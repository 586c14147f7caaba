//! The currencies that amounts can be displayed in.

use serde::Serialize;

/// The currency that subscription costs and exchange rates are stored in.
pub const BASE_CURRENCY: &str = "USD";

/// A currency that can be selected as the display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    /// The ISO 4217 code, e.g. "USD".
    pub code: &'static str,
    /// The English name, e.g. "US Dollar".
    pub name: &'static str,
    /// The symbol placed before amounts, e.g. "$".
    pub symbol: &'static str,
}

const fn currency(code: &'static str, name: &'static str, symbol: &'static str) -> Currency {
    Currency { code, name, symbol }
}

/// Every supported currency, the base currency first.
pub const SUPPORTED_CURRENCIES: [Currency; 29] = [
    currency("USD", "US Dollar", "$"),
    currency("EUR", "Euro", "€"),
    currency("GBP", "British Pound", "£"),
    currency("JPY", "Japanese Yen", "¥"),
    currency("CAD", "Canadian Dollar", "CA$"),
    currency("AUD", "Australian Dollar", "A$"),
    currency("CHF", "Swiss Franc", "CHF"),
    currency("CNY", "Chinese Yuan", "¥"),
    currency("INR", "Indian Rupee", "₹"),
    currency("MXN", "Mexican Peso", "MX$"),
    currency("BRL", "Brazilian Real", "R$"),
    currency("KRW", "South Korean Won", "₩"),
    currency("SGD", "Singapore Dollar", "S$"),
    currency("HKD", "Hong Kong Dollar", "HK$"),
    currency("NOK", "Norwegian Krone", "kr"),
    currency("SEK", "Swedish Krona", "kr"),
    currency("DKK", "Danish Krone", "kr"),
    currency("NZD", "New Zealand Dollar", "NZ$"),
    currency("ZAR", "South African Rand", "R"),
    currency("RUB", "Russian Ruble", "₽"),
    currency("TRY", "Turkish Lira", "₺"),
    currency("PLN", "Polish Zloty", "zł"),
    currency("THB", "Thai Baht", "฿"),
    currency("IDR", "Indonesian Rupiah", "Rp"),
    currency("CZK", "Czech Koruna", "Kč"),
    currency("ILS", "Israeli Shekel", "₪"),
    currency("PHP", "Philippine Peso", "₱"),
    currency("RON", "Romanian Leu", "lei"),
    currency("HUF", "Hungarian Forint", "Ft"),
];

/// Look up a supported currency by its code.
pub fn currency_for(code: &str) -> Option<&'static Currency> {
    SUPPORTED_CURRENCIES
        .iter()
        .find(|currency| currency.code == code)
}
