//! Output formatting for the CLI.

use console::style;
use gomarket_cart::CartItem;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Override JSON mode.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize + ?Sized>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print the cart, as a table or as the stored JSON array.
    pub fn cart(&self, items: &[CartItem]) {
        if self.json {
            self.json(items);
            return;
        }

        if items.is_empty() {
            self.info("Cart is empty.");
            return;
        }

        let widths = column_widths(items);
        self.table_row(&["ID", "TITLE", "PRICE", "QTY"], &widths);
        for item in items {
            let price = format_price(item.price);
            let quantity = quantity_badge(item.quantity, widths[3]);
            self.table_row(
                &[item.id.as_str(), &item.title, &price, &quantity],
                &widths,
            );
        }
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn column_widths(items: &[CartItem]) -> [usize; 4] {
    items.iter().fold([2, 5, 5, 3], |[id, title, price, qty], item| {
        [
            id.max(item.id.as_str().chars().count()),
            title.max(item.title.chars().count()),
            price.max(format_price(item.price).len()),
            qty.max(item.quantity.to_string().len()),
        ]
    })
}

/// Format a unit price with two decimals.
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Quantity padded to `width`, dimmed at zero and red below.
///
/// Padding happens before styling so escape codes don't count toward width.
pub fn quantity_badge(quantity: i64, width: usize) -> String {
    let cell = format!("{:width$}", quantity, width = width);
    match quantity {
        q if q < 0 => style(cell).red().to_string(),
        0 => style(cell).dim().to_string(),
        _ => cell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomarket_cart::NewCartItem;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(10.0), "10.00");
        assert_eq!(format_price(0.5), "0.50");
    }

    #[test]
    fn test_column_widths_fit_longest_value() {
        let items = vec![
            CartItem::from_candidate(NewCartItem::new("p1", "Running Shoe", "u", 1234.5), 12),
            CartItem::from_candidate(NewCartItem::new("product-2", "Hat", "u", 1.0), -1),
        ];
        assert_eq!(column_widths(&items), [9, 12, 7, 3]);
    }

    #[test]
    fn test_quantity_badge_pads_before_styling() {
        console::set_colors_enabled(true);
        for quantity in [-1, 0, 7] {
            let badge = quantity_badge(quantity, 4);
            assert_eq!(console::measure_text_width(&badge), 4);
            assert_eq!(console::strip_ansi_codes(&badge).trim(), quantity.to_string());
        }
        assert_ne!(quantity_badge(-1, 4), console::strip_ansi_codes(&quantity_badge(-1, 4)));
    }
}
